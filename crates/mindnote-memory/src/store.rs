//! Reference store implementations.

use crate::reference::{ReferenceDocument, ReferenceSet};
use crate::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::RwLock;
use tracing::debug;

/// Trait for reference stores keyed by category label.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Fetch the reference set stored under exactly `label`.
    ///
    /// A missing label is `Ok(None)`. A stored but malformed document is an
    /// error.
    async fn lookup(&self, label: &str) -> Result<Option<ReferenceSet>>;

    /// Count stored documents.
    async fn count(&self) -> Result<usize>;
}

/// In-memory reference store.
pub struct MemoryVectorStore {
    sets: RwLock<HashMap<String, ReferenceSet>>,
}

impl Default for MemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryVectorStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            sets: RwLock::new(HashMap::new()),
        }
    }

    /// Create a store pre-populated with `sets`.
    pub fn with_sets(sets: impl IntoIterator<Item = ReferenceSet>) -> Self {
        let sets = sets
            .into_iter()
            .map(|s| (s.label().to_string(), s))
            .collect();
        Self {
            sets: RwLock::new(sets),
        }
    }

    /// Insert or replace a reference set.
    pub async fn insert(&self, set: ReferenceSet) {
        let mut sets = self.sets.write().await;
        sets.insert(set.label().to_string(), set);
    }
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    async fn lookup(&self, label: &str) -> Result<Option<ReferenceSet>> {
        let sets = self.sets.read().await;
        Ok(sets.get(label).cloned())
    }

    async fn count(&self) -> Result<usize> {
        let sets = self.sets.read().await;
        Ok(sets.len())
    }
}

/// File-backed reference store.
///
/// The file holds a JSON array of documents shaped like
/// `{"class": ..., "suggestions": [...], "embeddings": [[...], ...]}`.
/// Documents are kept as read and validated on lookup, so one bad record
/// does not make the other categories unavailable.
pub struct FileVectorStore {
    path: PathBuf,
    documents: RwLock<Vec<ReferenceDocument>>,
}

impl FileVectorStore {
    /// Open a file-backed store.
    ///
    /// If the file at `path` exists, its contents are deserialized into memory.
    /// If the file does not exist, the store starts empty.
    pub fn new(path: PathBuf) -> Result<Self> {
        let documents = if path.exists() {
            let data = std::fs::read_to_string(&path)?;
            serde_json::from_str(&data)?
        } else {
            Vec::new()
        };

        Ok(Self {
            path,
            documents: RwLock::new(documents),
        })
    }

    /// Insert or replace the document for `set.label()` and persist.
    pub async fn insert(&self, set: ReferenceSet) -> Result<()> {
        let mut documents = self.documents.write().await;
        let label = set.label().to_string();
        documents.retain(|d| d.class.as_deref() != Some(label.as_str()));
        documents.push(set.into());
        self.save(&documents)
    }

    /// Atomically persist the current documents to disk.
    ///
    /// Writes to a temporary file first, then renames to the target path
    /// to avoid partial writes on crash.
    fn save(&self, documents: &[ReferenceDocument]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp_path = self.path.with_extension("tmp");
        let data = serde_json::to_string_pretty(documents)?;
        std::fs::write(&tmp_path, data)?;
        std::fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

#[async_trait]
impl VectorStore for FileVectorStore {
    async fn lookup(&self, label: &str) -> Result<Option<ReferenceSet>> {
        let documents = self.documents.read().await;
        match documents
            .iter()
            .find(|d| d.class.as_deref() == Some(label))
        {
            Some(doc) => {
                debug!(label, path = %self.path.display(), "reference document found");
                ReferenceSet::try_from(doc.clone()).map(Some)
            }
            None => Ok(None),
        }
    }

    async fn count(&self) -> Result<usize> {
        let documents = self.documents.read().await;
        Ok(documents.len())
    }
}
