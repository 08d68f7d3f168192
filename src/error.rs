//! Error types for sonascore
//!
//! Defines module-specific error types using thiserror for clear error propagation.

use thiserror::Error;

/// Main error type for sonascore
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file loading errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP server errors
    #[error("HTTP server error: {0}")]
    Http(String),

    /// Audio decoding errors
    #[error("Audio decode error: {0}")]
    Decode(String),

    /// Feature extraction errors
    ///
    /// All failures between "file handed to the extractor" and "scores
    /// produced" collapse into this variant; the API surfaces them as a
    /// single generic 500. No finer-grained categories are exposed.
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid request
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Other errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience Result type using sonascore Error
pub type Result<T> = std::result::Result<T, Error>;
