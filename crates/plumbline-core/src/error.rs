//! Error types for plumbline.
//!
//! Every fallible operation in this crate returns [`PlumbError`]. Empty
//! results (no tables, no words, no matches) are never errors.

use thiserror::Error;

/// Fatal error raised synchronously by settings resolution or geometry operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlumbError {
    /// Table or text settings failed validation (unknown strategy or option,
    /// negative tolerance, too few explicit lines, invalid search pattern).
    #[error("configuration error: {0}")]
    ConfigurationError(String),
    /// A bounding box is inverted or degenerate for the requested operation.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),
    /// An argument outside its accepted set, such as an orientation other than `h`/`v`.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl PlumbError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        PlumbError::ConfigurationError(msg.into())
    }

    pub(crate) fn geometry(msg: impl Into<String>) -> Self {
        PlumbError::InvalidGeometry(msg.into())
    }
}

/// Result alias used throughout plumbline-core.
pub type Result<T> = std::result::Result<T, PlumbError>;
