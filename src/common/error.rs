//! Unified error types for the Rambutan library.
//!
//! Errors cover only container-level ingestion failures: an archive that
//! cannot be opened or a required part that is entirely unreadable.
//! Field-level parse gaps never surface here (the parser resolves them via
//! documented defaults), and command-level conditions such as an unmatched
//! target reference are reported through `CommandOutcome`, never raised.
use thiserror::Error;

/// Main error type for Rambutan operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP archive error
    #[error("ZIP error: {0}")]
    Zip(String),

    /// XML parsing error
    #[error("XML error: {0}")]
    Xml(String),

    /// Package part not found
    #[error("Part not found: {0}")]
    PartNotFound(String),

    /// Invalid file format
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Result type for Rambutan operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::Zip(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Xml(err.to_string())
    }
}
