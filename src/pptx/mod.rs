//! PPTX package parsing.
//!
//! The entry point is [`parse_presentation`], which opens the zip
//! container, walks `ppt/slides/slideN.xml` in numeric order, resolves
//! picture relationships against the extracted media, and folds in the
//! optional theme, notes, and core-property parts.
//!
//! The parser is deliberately forgiving: only an unreadable archive
//! fails. Everything below that level degrades element by element so one
//! malformed shape never costs a whole deck.

mod color;
mod media;
mod package;
mod rels;
mod shape;
mod slide;
mod theme;
mod xml;

pub use color::resolve_scheme_color;
pub use media::mime_for_filename;
pub use package::parse_presentation;
