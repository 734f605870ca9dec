//! Classifier output consumed by the advice layer.

use super::Category;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Result of classifying a diary entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classification {
    /// Predicted label, as reported by the classifier.
    pub label: String,

    /// Predicted class number, when the classifier reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_number: Option<usize>,

    /// Confidence of the predicted label (0.0 - 1.0).
    pub confidence: f32,

    /// Per-label probabilities.
    #[serde(default)]
    pub scores: HashMap<String, f32>,
}

impl Classification {
    /// Create a classification with no per-class scores.
    pub fn new(label: impl Into<String>, confidence: f32) -> Self {
        Self {
            label: label.into(),
            class_number: None,
            confidence,
            scores: HashMap::new(),
        }
    }

    /// Set the class number.
    pub fn with_class_number(mut self, n: usize) -> Self {
        self.class_number = Some(n);
        self
    }

    /// Add a per-class score.
    pub fn with_score(mut self, label: impl Into<String>, score: f32) -> Self {
        self.scores.insert(label.into(), score);
        self
    }

    /// The category, resolved from the class number first and the label second.
    pub fn category(&self) -> Option<Category> {
        self.class_number
            .and_then(Category::from_class_number)
            .or_else(|| Category::from_label(&self.label))
    }

    /// Whether this classification targets the no-signal category.
    pub fn is_no_signal(&self) -> bool {
        self.category().map(|c| c.is_no_signal()).unwrap_or(false)
    }

    /// Whether the confidence meets `gate` (inclusive).
    pub fn meets(&self, gate: f32) -> bool {
        self.confidence >= gate
    }
}
