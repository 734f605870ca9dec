//! Counting fake backends shared by the integration tests.
//!
//! `FakeLlm` replies with texts of the form `score:<x>`. `FakeEmbeddings`
//! maps such a text to a unit vector whose cosine against `[1, 0]` is `x`,
//! so a test scripts candidate scores directly.

use async_trait::async_trait;
use mindnote_memory::{EmbeddingProvider, MemoryError, ReferenceSet};
use mindnote_providers::{LanguageModelClient, ProviderError};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Text whose embedding scores `score` against [`reference_set`].
pub fn candidate_text(score: f32) -> String {
    format!("score:{}", score)
}

/// Reference set whose embeddings all point along `[1, 0]`.
pub fn reference_set(label: &str) -> ReferenceSet {
    ReferenceSet::new(
        label,
        vec!["Stay positive".to_string(), "Take care of yourself".to_string()],
        vec![vec![1.0, 0.0], vec![2.0, 0.0]],
    )
    .expect("valid reference set")
}

enum LlmMode {
    Scripted,
    Failing,
    Slow(Duration),
}

/// Scripted language model that counts calls and keeps every prompt.
pub struct FakeLlm {
    replies: Mutex<VecDeque<String>>,
    mode: LlmMode,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl FakeLlm {
    /// Reply with candidates scoring `scores` in order, repeating the last.
    pub fn with_scores(scores: &[f32]) -> Self {
        Self::new(scores, LlmMode::Scripted)
    }

    /// Fail every call with a server error.
    pub fn failing() -> Self {
        Self::new(&[], LlmMode::Failing)
    }

    /// Sleep for `delay` before replying with a perfect candidate.
    pub fn slow(delay: Duration) -> Self {
        Self::new(&[1.0], LlmMode::Slow(delay))
    }

    fn new(scores: &[f32], mode: LlmMode) -> Self {
        Self {
            replies: Mutex::new(scores.iter().map(|s| candidate_text(*s)).collect()),
            mode,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    fn next_reply(&self) -> String {
        let mut replies = self.replies.lock().unwrap();
        if replies.len() > 1 {
            replies.pop_front().unwrap_or_default()
        } else {
            replies.front().cloned().unwrap_or_default()
        }
    }
}

#[async_trait]
impl LanguageModelClient for FakeLlm {
    fn name(&self) -> &str {
        "fake"
    }

    async fn generate(&self, prompt: &str, _temperature: f32) -> mindnote_providers::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        match self.mode {
            LlmMode::Scripted => Ok(self.next_reply()),
            LlmMode::Failing => Err(ProviderError::server_error(503, "service unavailable")),
            LlmMode::Slow(delay) => {
                tokio::time::sleep(delay).await;
                Ok(self.next_reply())
            }
        }
    }
}

/// Embeds `score:<x>` texts; counts calls.
pub struct FakeEmbeddings {
    dimension: usize,
    failing: bool,
    calls: AtomicUsize,
}

impl FakeEmbeddings {
    pub fn new() -> Self {
        Self {
            dimension: 2,
            failing: false,
            calls: AtomicUsize::new(0),
        }
    }

    /// Report and produce vectors of `dimension` components.
    pub fn with_dimension(dimension: usize) -> Self {
        Self {
            dimension,
            ..Self::new()
        }
    }

    /// Fail every call.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::new()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn vector_for(&self, text: &str) -> Result<Vec<f32>, MemoryError> {
        let score: f32 = text
            .strip_prefix("score:")
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| MemoryError::Embedding(format!("unexpected text: {}", text)))?;
        let mut vector = vec![0.0; self.dimension];
        vector[0] = score;
        if self.dimension > 1 {
            vector[1] = (1.0 - score * score).max(0.0).sqrt();
        }
        Ok(vector)
    }
}

impl Default for FakeEmbeddings {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbeddingProvider for FakeEmbeddings {
    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, texts: &[String]) -> mindnote_memory::Result<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(MemoryError::Embedding("API error (500): boom".to_string()));
        }
        texts.iter().map(|t| self.vector_for(t)).collect()
    }
}
