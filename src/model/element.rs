//! Slide element variants: text, image, and geometric shape.

use crate::model::geometry::{Position, Size};
use crate::model::style::{ShapeStyle, TextStyle};
use base64::Engine as _;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Fields shared by every element variant.
///
/// Ids are unique within their slide. `z_index` is the paint/selection
/// order; duplicates are allowed and ties are broken by the order elements
/// were discovered in (the element sequence is only ever re-sorted stably).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementCommon {
    pub id: String,
    pub position: Position,
    pub size: Size,
    /// Rotation in degrees
    pub rotation: f64,
    pub z_index: i64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub locked: Option<bool>,
    /// Human-readable name used for free-text reference resolution
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
}

/// A contiguous run of identically formatted text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub style: Option<TextStyle>,
}

/// One paragraph of a text element's optional run breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    pub runs: Vec<TextRun>,
}

/// A text element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextElement {
    #[serde(flatten)]
    pub common: ElementCommon,
    pub text: String,
    pub style: TextStyle,
    /// Optional paragraph/run breakdown for mixed formatting. When absent,
    /// `style` governs the whole text.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub paragraphs: Option<Vec<Paragraph>>,
}

/// Where an image element's pixels come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ImageSource {
    /// Media bytes extracted from the package
    Embedded { data: Bytes, mime: String },
    /// A reference the host resolves (URL or path)
    External { url: String },
}

impl ImageSource {
    /// Render embedded media as a `data:` URL. External sources return
    /// their reference unchanged.
    pub fn data_url(&self) -> String {
        match self {
            ImageSource::Embedded { data, mime } => {
                let encoded = base64::engine::general_purpose::STANDARD.encode(data);
                format!("data:{};base64,{}", mime, encoded)
            },
            ImageSource::External { url } => url.clone(),
        }
    }
}

/// Crop rectangle as fractions of the source image, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

/// Filter adjustments applied when rendering an image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ImageFilters {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub brightness: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub contrast: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub grayscale: Option<bool>,
}

/// An image element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageElement {
    #[serde(flatten)]
    pub common: ElementCommon,
    pub src: ImageSource,
    /// Original pixel width of the source image, when known
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub original_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub original_height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub crop: Option<CropRect>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub filters: Option<ImageFilters>,
}

/// The closed set of geometric shape kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShapeKind {
    Rect,
    RoundRect,
    Ellipse,
    Triangle,
    Diamond,
    Pentagon,
    Hexagon,
    Arrow,
    Line,
    Star5,
    Star6,
    Callout,
    Custom,
}

impl ShapeKind {
    /// Name used in synthesized element names and type-index references.
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::Rect => "rect",
            ShapeKind::RoundRect => "roundRect",
            ShapeKind::Ellipse => "ellipse",
            ShapeKind::Triangle => "triangle",
            ShapeKind::Diamond => "diamond",
            ShapeKind::Pentagon => "pentagon",
            ShapeKind::Hexagon => "hexagon",
            ShapeKind::Arrow => "arrow",
            ShapeKind::Line => "line",
            ShapeKind::Star5 => "star5",
            ShapeKind::Star6 => "star6",
            ShapeKind::Callout => "callout",
            ShapeKind::Custom => "custom",
        }
    }
}

/// One point of a custom shape path, in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathPoint {
    pub x: f64,
    pub y: f64,
}

/// A geometric shape element, optionally carrying embedded text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeElement {
    #[serde(flatten)]
    pub common: ElementCommon,
    pub shape_kind: ShapeKind,
    pub style: ShapeStyle,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub text_style: Option<TextStyle>,
    /// Custom point path for `ShapeKind::Custom`
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub path: Option<Vec<PathPoint>>,
}

/// Any element that can appear on a slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SlideElement {
    Text(TextElement),
    Image(ImageElement),
    Shape(ShapeElement),
}

impl SlideElement {
    /// The shared element core.
    pub fn common(&self) -> &ElementCommon {
        match self {
            SlideElement::Text(e) => &e.common,
            SlideElement::Image(e) => &e.common,
            SlideElement::Shape(e) => &e.common,
        }
    }

    /// Mutable access to the shared element core.
    pub fn common_mut(&mut self) -> &mut ElementCommon {
        match self {
            SlideElement::Text(e) => &mut e.common,
            SlideElement::Image(e) => &mut e.common,
            SlideElement::Shape(e) => &mut e.common,
        }
    }

    /// Element id.
    #[inline]
    pub fn id(&self) -> &str {
        &self.common().id
    }

    /// The element's type tag: "text", "image", or "shape".
    pub fn kind_name(&self) -> &'static str {
        match self {
            SlideElement::Text(_) => "text",
            SlideElement::Image(_) => "image",
            SlideElement::Shape(_) => "shape",
        }
    }

    /// Name to show in user-facing messages: the human-readable name when
    /// present, the id otherwise.
    pub fn display_name(&self) -> &str {
        self.common().name.as_deref().unwrap_or(self.id())
    }

    /// Text content, for text elements only.
    pub fn text(&self) -> Option<&str> {
        match self {
            SlideElement::Text(e) => Some(&e.text),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fresh_id;

    fn common(id: &str) -> ElementCommon {
        ElementCommon {
            id: id.to_string(),
            position: Position::from_emu(0, 0),
            size: Size::from_emu(914_400, 457_200),
            rotation: 0.0,
            z_index: 0,
            locked: None,
            name: None,
        }
    }

    #[test]
    fn test_data_url() {
        let src = ImageSource::Embedded {
            data: Bytes::from_static(b"abc"),
            mime: "image/png".to_string(),
        };
        assert_eq!(src.data_url(), "data:image/png;base64,YWJj");

        let ext = ImageSource::External {
            url: "https://example.com/a.png".to_string(),
        };
        assert_eq!(ext.data_url(), "https://example.com/a.png");
    }

    #[test]
    fn test_element_tagging() {
        let el = SlideElement::Text(TextElement {
            common: common("text-1"),
            text: "Hello".to_string(),
            style: TextStyle::default(),
            paragraphs: None,
        });

        let json = serde_json::to_value(&el).unwrap();
        assert_eq!(json["type"], "text");
        assert_eq!(json["id"], "text-1");
        assert_eq!(json["zIndex"], 0);
    }

    #[test]
    fn test_display_name_falls_back_to_id() {
        let mut el = SlideElement::Shape(ShapeElement {
            common: common("shape-1"),
            shape_kind: ShapeKind::Rect,
            style: ShapeStyle::default(),
            text: None,
            text_style: None,
            path: None,
        });
        assert_eq!(el.display_name(), "shape-1");

        el.common_mut().name = Some("Banner".to_string());
        assert_eq!(el.display_name(), "Banner");
    }

    #[test]
    fn test_fresh_ids_are_distinct() {
        let a = fresh_id("text");
        let b = fresh_id("text");
        assert!(a.starts_with("text-"));
        assert_ne!(a, b);
    }
}
