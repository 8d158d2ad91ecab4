//! Common utilities shared across the crate.

pub mod error;
pub mod unit;

pub use error::{Error, Result};
