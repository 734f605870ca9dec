//! Reference vector store and embeddings for Mindnote.
//!
//! This crate provides:
//! - Embedding generation via the OpenAI embeddings API
//! - Per-category reference sets with precomputed embeddings
//! - Reference stores backed by memory, a JSON file, or the Astra DB Data API
//! - Cosine similarity scoring

pub mod error;
pub mod embeddings;
pub mod reference;
pub mod similarity;
pub mod store;
pub mod astra;

pub use astra::AstraVectorStore;
pub use embeddings::{EmbeddingProvider, OpenAIEmbeddings};
pub use error::MemoryError;
pub use reference::{ReferenceDocument, ReferenceSet};
pub use similarity::{cosine_similarity, max_similarity};
pub use store::{FileVectorStore, MemoryVectorStore, VectorStore};

/// Result type for memory operations.
pub type Result<T> = std::result::Result<T, MemoryError>;
