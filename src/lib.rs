//! Rambutan - a slide document engine
//!
//! This library ingests packaged presentation documents (.pptx-style ZIP
//! containers) and paginated page-image documents into a single normalized
//! document model, and exposes a fixed vocabulary of structured mutation
//! commands over that model.
//!
//! # Features
//!
//! - **PPTX Parser**: Extract positioned text, picture, and shape elements
//!   from packaged XML presentations, degrading to documented defaults at
//!   every partial or missing field
//! - **Page-image Ingester**: Turn rasterized pages (e.g. PDF pages) into
//!   one full-bleed image slide each, with an optional OCR collaborator
//! - **Command Engine**: Resolve free-text element references and apply
//!   typed mutations (move, resize, restyle, reorder, ...) producing a new
//!   presentation value on every edit
//!
//! # Example - Parsing a presentation
//!
//! ```no_run
//! use rambutan::pptx::parse_presentation;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let data = std::fs::read("deck.pptx")?;
//! let pres = parse_presentation(&data)?;
//!
//! println!("{}: {} slides", pres.title, pres.slides.len());
//! for slide in &pres.slides {
//!     println!("slide {} has {} elements", slide.index, slide.elements.len());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Applying an edit command
//!
//! ```no_run
//! use rambutan::command::{execute_command, Command, CommandKind, CommandParams};
//! use rambutan::model::Presentation;
//!
//! let pres = Presentation::empty("Demo");
//! let command = Command {
//!     kind: CommandKind::Add,
//!     target: None,
//!     params: CommandParams {
//!         element_type: Some("text".to_string()),
//!         text: Some("Hello".to_string()),
//!         ..Default::default()
//!     },
//! };
//!
//! let outcome = execute_command(&pres, 0, &command);
//! assert!(outcome.success);
//! ```

/// Shared leaf utilities: error types and the unit/geometry model.
pub mod common;

/// The normalized document model: presentations, slides, and elements.
pub mod model;

/// Parser for packaged XML presentation documents.
pub mod pptx;

/// Ingester for paginated page-image documents.
pub mod paged;

/// The structured edit-command engine.
pub mod command;

// Re-export commonly used types for convenience
pub use common::{Error, Result};
pub use model::{Presentation, Slide, SlideElement};
