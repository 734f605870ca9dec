//! Mental-health category labels produced by the diary classifier.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A category the classifier can assign to a diary entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Anxiety,
    SuicideWatch,
    Bipolar,
    Depression,
    /// Catch-all for entries without a clinical signal.
    OffMyChest,
}

impl Category {
    /// All categories, ordered by classifier class number.
    pub const ALL: [Category; 5] = [
        Category::Anxiety,
        Category::SuicideWatch,
        Category::Bipolar,
        Category::Depression,
        Category::OffMyChest,
    ];

    /// Class number emitted by the classifier.
    pub fn class_number(&self) -> usize {
        match self {
            Self::Anxiety => 0,
            Self::SuicideWatch => 1,
            Self::Bipolar => 2,
            Self::Depression => 3,
            Self::OffMyChest => 4,
        }
    }

    /// Look up a category by class number.
    pub fn from_class_number(n: usize) -> Option<Self> {
        Self::ALL.get(n).copied()
    }

    /// Human-readable label, as the classifier reports it.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Anxiety => "Anxiety",
            Self::SuicideWatch => "Suicide Watch",
            Self::Bipolar => "Bipolar",
            Self::Depression => "Depression",
            Self::OffMyChest => "Off My Chest",
        }
    }

    /// Key under which the reference set for this category is stored.
    pub fn store_key(&self) -> String {
        normalize_label(self.label())
    }

    /// Whether this is the catch-all category handled by sentiment analysis.
    pub fn is_no_signal(&self) -> bool {
        matches!(self, Self::OffMyChest)
    }

    /// Parse a label leniently: case, surrounding whitespace, and
    /// `_`/`-`/space separators are ignored.
    pub fn from_label(label: &str) -> Option<Self> {
        let squashed: String = label
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();

        match squashed.as_str() {
            "anxiety" => Some(Self::Anxiety),
            "suicidewatch" => Some(Self::SuicideWatch),
            "bipolar" => Some(Self::Bipolar),
            "depression" => Some(Self::Depression),
            "offmychest" => Some(Self::OffMyChest),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Normalize a label for matching: trimmed and lower-cased.
pub fn normalize_label(label: &str) -> String {
    label.trim().to_lowercase()
}
