//! The normalized document model.
//!
//! A [`Presentation`] is a plain value: parsers produce one, the command
//! engine consumes one and returns a new one. Nothing here validates ids or
//! invariants; correctness is the responsibility of whichever component
//! constructs or mutates values. Undo/redo is the caller's concern via
//! retained snapshots.

mod element;
mod geometry;
mod id;
mod slide;
mod style;

pub use element::{
    CropRect, ElementCommon, ImageElement, ImageFilters, ImageSource, Paragraph, PathPoint,
    ShapeElement, ShapeKind, SlideElement, TextElement, TextRun,
};
pub use geometry::{Position, Size};
pub use id::fresh_id;
pub use slide::{Background, GradientStop, Metadata, Presentation, Slide, Theme};
pub use style::{Shadow, ShapeStyle, TextAlign, TextStyle, VerticalAlign};
