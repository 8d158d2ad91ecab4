//! Slides, presentations, and their deck-level accessories.

use crate::model::element::{ImageSource, SlideElement};
use crate::model::id::fresh_id;
use serde::{Deserialize, Serialize};

/// One stop of a gradient background.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    /// Offset along the gradient in [0, 1]
    pub offset: f64,
    pub color: String,
}

/// Slide background fill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Background {
    Solid { color: String },
    Gradient { stops: Vec<GradientStop> },
    Image { src: ImageSource },
}

/// A single slide: an ordered sequence of elements plus accessories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    pub id: String,
    /// Zero-based index within the deck
    pub index: usize,
    pub elements: Vec<SlideElement>,
    /// Absent means the caller renders a blank canvas
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub background: Option<Background>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub notes: Option<String>,
    /// Transition tag, e.g. "fade"
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub transition: Option<String>,
}

impl Slide {
    /// Create an empty slide at the given deck index.
    pub fn blank(index: usize) -> Self {
        Self {
            id: fresh_id("slide"),
            index,
            elements: Vec::new(),
            background: None,
            notes: None,
            transition: None,
        }
    }
}

/// Deck theme: a color palette plus heading/body font names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    /// Hex colors in scheme order
    pub palette: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub heading_font: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub body_font: Option<String>,
}

/// Deck metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub author: Option<String>,
    /// Native page width in EMU, as declared by the package
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub page_width: Option<i64>,
    /// Native page height in EMU
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub page_height: Option<i64>,
}

/// A complete presentation value.
///
/// Produced once by a parser (or constructed empty); every subsequent edit
/// through the command engine yields a new value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Presentation {
    pub title: String,
    pub slides: Vec<Slide>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub theme: Option<Theme>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub metadata: Option<Metadata>,
}

impl Presentation {
    /// Create a presentation with a single blank slide.
    pub fn empty(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            slides: vec![Slide::blank(0)],
            theme: None,
            metadata: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_presentation() {
        let pres = Presentation::empty("Untitled");
        assert_eq!(pres.title, "Untitled");
        assert_eq!(pres.slides.len(), 1);
        assert!(pres.slides[0].elements.is_empty());
        assert_eq!(pres.slides[0].index, 0);
    }

    #[test]
    fn test_background_tagging() {
        let bg = Background::Solid {
            color: "#FFFFFF".to_string(),
        };
        let json = serde_json::to_value(&bg).unwrap();
        assert_eq!(json["type"], "solid");
        assert_eq!(json["color"], "#FFFFFF");
    }
}
