//! Typed reference sets and the loosely typed documents they are read from.

use crate::error::MemoryError;
use crate::Result;
use serde::{Deserialize, Serialize};

/// A stored document as it arrives from the persistence layer.
///
/// Every field is optional here; [`ReferenceSet::try_from`] decides whether
/// the document is usable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReferenceDocument {
    /// Category key.
    #[serde(rename = "class", default)]
    pub class: Option<String>,

    /// Example suggestions for the category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,

    /// Precomputed embeddings, one per suggestion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embeddings: Option<Vec<Vec<f32>>>,
}

/// Example suggestions for one category with their precomputed embeddings.
///
/// `suggestions[i]` always corresponds to `embeddings[i]`, and every
/// embedding has the same non-zero dimension.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceSet {
    label: String,
    suggestions: Vec<String>,
    embeddings: Vec<Vec<f32>>,
}

impl ReferenceSet {
    /// Build a reference set, validating positional correspondence.
    pub fn new(
        label: impl Into<String>,
        suggestions: Vec<String>,
        embeddings: Vec<Vec<f32>>,
    ) -> Result<Self> {
        let label = label.into();

        if suggestions.is_empty() {
            return Err(MemoryError::malformed(label, "no suggestions"));
        }
        if suggestions.len() != embeddings.len() {
            return Err(MemoryError::malformed(
                label,
                format!(
                    "{} suggestions but {} embeddings",
                    suggestions.len(),
                    embeddings.len()
                ),
            ));
        }

        let dimension = embeddings[0].len();
        if dimension == 0 {
            return Err(MemoryError::malformed(label, "empty embedding vector"));
        }
        if let Some((i, e)) = embeddings
            .iter()
            .enumerate()
            .find(|(_, e)| e.len() != dimension)
        {
            return Err(MemoryError::malformed(
                label,
                format!(
                    "embedding {} has dimension {}, expected {}",
                    i,
                    e.len(),
                    dimension
                ),
            ));
        }

        Ok(Self {
            label,
            suggestions,
            embeddings,
        })
    }

    /// Category key this set belongs to.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Suggestions in stored order.
    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    /// Embeddings in stored order.
    pub fn embeddings(&self) -> &[Vec<f32>] {
        &self.embeddings
    }

    /// Dimension shared by every embedding.
    pub fn dimension(&self) -> usize {
        self.embeddings[0].len()
    }

    /// Number of suggestion/embedding pairs.
    pub fn len(&self) -> usize {
        self.suggestions.len()
    }

    /// Always false; a valid set holds at least one suggestion.
    pub fn is_empty(&self) -> bool {
        self.suggestions.is_empty()
    }
}

impl TryFrom<ReferenceDocument> for ReferenceSet {
    type Error = MemoryError;

    fn try_from(doc: ReferenceDocument) -> Result<Self> {
        let label = doc
            .class
            .ok_or_else(|| MemoryError::malformed("<unknown>", "missing class"))?;
        let suggestions = doc
            .suggestions
            .ok_or_else(|| MemoryError::malformed(label.clone(), "missing suggestions"))?;
        let embeddings = doc
            .embeddings
            .ok_or_else(|| MemoryError::malformed(label.clone(), "missing embeddings"))?;

        ReferenceSet::new(label, suggestions, embeddings)
    }
}

impl From<ReferenceSet> for ReferenceDocument {
    fn from(set: ReferenceSet) -> Self {
        Self {
            class: Some(set.label),
            suggestions: Some(set.suggestions),
            embeddings: Some(set.embeddings),
        }
    }
}
