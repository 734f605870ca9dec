//! Memory error types.

use thiserror::Error;

/// Errors that can occur during embedding or reference store operations.
#[derive(Debug, Error)]
pub enum MemoryError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Embedding generation failed.
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Reference store error.
    #[error("Store error: {0}")]
    Store(String),

    /// A stored document could not be mapped to a reference set.
    #[error("Malformed reference record for '{label}': {reason}")]
    MalformedRecord { label: String, reason: String },

    /// Vectors from different sources do not share a dimension.
    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl MemoryError {
    /// Create a malformed record error.
    pub fn malformed(label: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            label: label.into(),
            reason: reason.into(),
        }
    }
}
