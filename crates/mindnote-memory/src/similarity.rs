//! Cosine similarity scoring.

use crate::error::MemoryError;
use crate::Result;

/// Compute cosine similarity between two vectors of equal length.
///
/// Returns `0.0` when either vector has zero magnitude. Callers must check
/// dimensions first; use [`max_similarity`] for checked scoring.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "cosine_similarity on unequal dimensions");

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

/// Highest cosine similarity between `query` and any of `references`.
///
/// Fails with [`MemoryError::DimensionMismatch`] instead of scoring vectors
/// of different lengths. An empty reference list scores `0.0`.
pub fn max_similarity(query: &[f32], references: &[Vec<f32>]) -> Result<f32> {
    let mut best = f32::NEG_INFINITY;
    for reference in references {
        if reference.len() != query.len() {
            return Err(MemoryError::DimensionMismatch {
                expected: reference.len(),
                actual: query.len(),
            });
        }
        best = best.max(cosine_similarity(query, reference));
    }

    if best.is_finite() {
        Ok(best)
    } else {
        Ok(0.0)
    }
}
