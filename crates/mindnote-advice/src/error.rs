//! Advice error types.

use mindnote_memory::MemoryError;
use mindnote_providers::ProviderError;
use thiserror::Error;

/// Backend failures that abort an advice request.
///
/// Missing reference data and unmet quality are not errors; they resolve to
/// the fallback message.
#[derive(Debug, Error)]
pub enum AdviceError {
    /// The reference store failed or returned a malformed record.
    #[error("Reference store error: {0}")]
    Store(MemoryError),

    /// The embedding backend failed.
    #[error("Embedding backend error: {0}")]
    Embedding(MemoryError),

    /// The language model backend failed.
    #[error("Generation backend error: {0}")]
    Generation(#[from] ProviderError),

    /// Candidate and reference embeddings have different dimensions.
    #[error("Embedding dimension mismatch: references have {expected}, provider produced {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

impl AdviceError {
    /// Map an embedding-side error, lifting dimension mismatches.
    pub(crate) fn from_embedding(err: MemoryError) -> Self {
        match err {
            MemoryError::DimensionMismatch { expected, actual } => {
                Self::DimensionMismatch { expected, actual }
            }
            other => Self::Embedding(other),
        }
    }
}
