//! Errors raised while loading or addressing documents.

use plumbline_core::PlumbError;
use thiserror::Error;

/// Error from the document layer.
///
/// Algorithm failures pass through unchanged as [`DocumentError::Plumb`].
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error(transparent)]
    Plumb(#[from] PlumbError),
    /// A page dump could not be decoded.
    #[cfg(feature = "serde")]
    #[error("malformed page dump: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to read page dump: {0}")]
    Io(#[from] std::io::Error),
    /// A 0-based page index past the end of the document.
    #[error("page index {index} out of range (document has {count} pages)")]
    PageOutOfRange { index: usize, count: usize },
}
