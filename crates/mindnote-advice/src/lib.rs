//! Advice generation for classified diary entries.
//!
//! The [`AdviceEngine`] retrieves the reference suggestions for a category,
//! asks a language model for candidate advice, and accepts a candidate only
//! when its embedding is close enough to one of the references. Entries in
//! the no-signal category are answered by the [`SentimentFallbackHandler`]
//! instead. [`DiaryAdvisor`] applies the classifier confidence gate in front
//! of the engine.

pub mod advisor;
pub mod engine;
pub mod error;
pub mod prompt;
pub mod sentiment;
pub mod state;

mod lexicon;

pub use advisor::DiaryAdvisor;
pub use engine::{AdviceEngine, AdviceReport, Outcome, FALLBACK_MESSAGE};
pub use error::AdviceError;
pub use sentiment::{SentimentBucket, SentimentFallbackHandler, SentimentScores};
pub use state::{CandidateScore, EngineState, GenerationAttempt};

/// Result type for advice operations.
pub type Result<T> = std::result::Result<T, AdviceError>;
