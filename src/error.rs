//! Unified error types for the converter.
//!
//! Only the package boundary (ZIP container, XML well-formedness) produces
//! errors. Style resolution and shape translation always degrade to a
//! visually plausible fallback instead of failing.

use thiserror::Error;

/// Main error type for conversion operations.
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

    /// Invalid file format
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Stream or package part not found
    #[error("Component not found: {0}")]
    ComponentNotFound(String),
}

/// Result type for conversion operations.
pub type Result<T> = std::result::Result<T, Error>;
