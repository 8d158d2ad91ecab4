//! Text and shape style values with their default constructors.
//!
//! Defaults are used whenever a parser or the command engine must
//! synthesize an element without explicit source data.

use serde::{Deserialize, Serialize};

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
    Justify,
}

/// Vertical text alignment inside the element box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    Top,
    Middle,
    Bottom,
}

/// Style of a text element or of text embedded in a shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    /// Font size in points
    pub font_size: f64,
    /// Derived font size in render pixels
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub font_size_px: Option<f64>,
    /// Font family name
    pub font_family: String,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub underline: bool,
    #[serde(default)]
    pub strikethrough: bool,
    /// Text color as a hex string, e.g. "#000000"
    pub color: String,
    /// Horizontal alignment
    pub align: TextAlign,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub vertical_align: Option<VerticalAlign>,
    /// Line-height multiplier
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub line_height: Option<f64>,
}

impl TextStyle {
    /// Derive the pixel size for a point size at the render DPI.
    #[inline]
    pub fn px_for_pt(pt: f64) -> f64 {
        pt / 72.0 * crate::common::unit::RENDER_DPI
    }

    /// Set the point size and refresh the derived pixel size.
    pub fn set_font_size(&mut self, pt: f64) {
        self.font_size = pt;
        self.font_size_px = Some(Self::px_for_pt(pt));
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: 18.0,
            font_size_px: None,
            font_family: "Arial".to_string(),
            bold: false,
            italic: false,
            underline: false,
            strikethrough: false,
            color: "#000000".to_string(),
            align: TextAlign::Left,
            vertical_align: None,
            line_height: None,
        }
    }
}

/// Drop-shadow descriptor for shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shadow {
    pub color: String,
    /// Blur radius in pixels
    pub blur: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

/// Style of a geometric shape element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeStyle {
    /// Fill color as a hex string, or "transparent"
    pub fill: String,
    /// Outline color as a hex string
    pub stroke: String,
    /// Outline width in points
    pub stroke_width: f64,
    /// Opacity in [0, 1]
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub shadow: Option<Shadow>,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            fill: "#4F46E5".to_string(),
            stroke: "#3730A3".to_string(),
            stroke_width: 1.0,
            opacity: None,
            shadow: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_text_style() {
        let style = TextStyle::default();
        assert_eq!(style.font_size, 18.0);
        assert_eq!(style.color, "#000000");
        assert_eq!(style.align, TextAlign::Left);
        assert!(!style.bold);
    }

    #[test]
    fn test_set_font_size_derives_pixels() {
        let mut style = TextStyle::default();
        style.set_font_size(36.0);
        assert_eq!(style.font_size_px, Some(48.0));
    }

    #[test]
    fn test_default_shape_style() {
        let style = ShapeStyle::default();
        assert_eq!(style.fill, "#4F46E5");
        assert_eq!(style.stroke, "#3730A3");
    }

    #[test]
    fn test_align_serde() {
        let json = serde_json::to_string(&TextAlign::Center).unwrap();
        assert_eq!(json, "\"center\"");
    }
}
