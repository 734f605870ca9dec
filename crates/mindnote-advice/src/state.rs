//! Per-call state of the generation loop.

use serde::Serialize;

/// One scored candidate.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateScore {
    /// Position of the candidate within its attempt.
    pub index: usize,

    /// Generated text.
    pub text: String,

    /// Embedding of the generated text.
    #[serde(skip)]
    pub embedding: Vec<f32>,

    /// Highest similarity against any reference embedding.
    pub max_similarity: f32,
}

/// One round of candidate generation.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationAttempt {
    /// 1-based attempt number.
    pub attempt_index: usize,

    /// Candidates in the order they were scored.
    pub candidates: Vec<CandidateScore>,
}

impl GenerationAttempt {
    /// Start an empty attempt.
    pub fn new(attempt_index: usize) -> Self {
        Self {
            attempt_index,
            candidates: Vec::new(),
        }
    }
}

/// Accumulator threaded through one `generate` call.
///
/// `best_score` never decreases. It is created per call and never shared.
#[derive(Debug, Clone)]
pub struct EngineState {
    best_response: String,
    best_score: f32,
    attempts: Vec<GenerationAttempt>,
}

impl EngineState {
    /// Fresh state whose best response is `placeholder` at score 0.
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            best_response: placeholder.into(),
            best_score: 0.0,
            attempts: Vec::new(),
        }
    }

    /// Best response seen so far.
    pub fn best_response(&self) -> &str {
        &self.best_response
    }

    /// Best score seen so far.
    pub fn best_score(&self) -> f32 {
        self.best_score
    }

    /// Number of attempts started.
    pub fn attempts_used(&self) -> usize {
        self.attempts.len()
    }

    /// Attempt history.
    pub fn attempts(&self) -> &[GenerationAttempt] {
        &self.attempts
    }

    /// Whether the best score meets `threshold`.
    pub fn reached(&self, threshold: f32) -> bool {
        self.best_score >= threshold
    }

    /// Open the next attempt and return its 1-based index.
    pub fn begin_attempt(&mut self) -> usize {
        let index = self.attempts.len() + 1;
        self.attempts.push(GenerationAttempt::new(index));
        index
    }

    /// Record a scored candidate in the current attempt.
    ///
    /// The best response is replaced only on a strictly higher score, so the
    /// earliest candidate wins ties. Returns whether it became the best.
    pub fn record(&mut self, candidate: CandidateScore) -> bool {
        let improved = candidate.max_similarity > self.best_score;
        if improved {
            self.best_score = candidate.max_similarity;
            self.best_response = candidate.text.clone();
        }
        if let Some(attempt) = self.attempts.last_mut() {
            attempt.candidates.push(candidate);
        }
        improved
    }

    /// Consume the state, returning the best response, score, and history.
    pub fn into_parts(self) -> (String, f32, Vec<GenerationAttempt>) {
        (self.best_response, self.best_score, self.attempts)
    }
}
