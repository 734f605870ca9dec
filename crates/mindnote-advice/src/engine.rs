//! Quality-gated advice generation loop.

use crate::error::AdviceError;
use crate::prompt::{build_prompt, PromptContext};
use crate::sentiment::SentimentFallbackHandler;
use crate::state::{CandidateScore, EngineState, GenerationAttempt};
use crate::Result;
use chrono::{DateTime, Utc};
use futures::stream::{FuturesUnordered, StreamExt};
use futures::TryFutureExt;
use mindnote_core::config::AdviceConfig;
use mindnote_core::{normalize_label, Category};
use mindnote_memory::{max_similarity, EmbeddingProvider, ReferenceSet, VectorStore};
use mindnote_providers::LanguageModelClient;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Returned when no reference data exists for the label or no candidate
/// reached the similarity threshold.
pub const FALLBACK_MESSAGE: &str = "I'm sorry, I couldn't find advice that fits what you shared. \
     Please consider reaching out to someone you trust.";

/// How an advice request was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// A candidate reached the similarity threshold.
    Accepted,
    /// Every attempt ran without reaching the threshold.
    QualityNotReached,
    /// The store has no reference data for the label.
    NotFound,
    /// No-signal entry answered by sentiment analysis.
    SentimentFallback,
    /// A backend call timed out or the request was cancelled.
    TimedOut,
    /// Classifier confidence was below the gate; the engine was not called.
    BelowConfidenceGate,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::QualityNotReached => "quality_not_reached",
            Self::NotFound => "not_found",
            Self::SentimentFallback => "sentiment_fallback",
            Self::TimedOut => "timed_out",
            Self::BelowConfidenceGate => "below_confidence_gate",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one advice request together with its telemetry.
#[derive(Debug, Clone, Serialize)]
pub struct AdviceReport {
    /// Identifier attached to every log line of this request.
    pub request_id: Uuid,

    /// Normalized category label.
    pub label: String,

    /// Text to show the user.
    pub advice: String,

    /// How the request was resolved.
    pub outcome: Outcome,

    /// Best similarity reached, whether or not it was accepted.
    pub best_score: f32,

    /// Attempt history.
    pub attempts: Vec<GenerationAttempt>,

    /// When the request finished.
    pub generated_at: DateTime<Utc>,
}

impl AdviceReport {
    pub(crate) fn new(
        request_id: Uuid,
        label: impl Into<String>,
        advice: impl Into<String>,
        outcome: Outcome,
    ) -> Self {
        Self {
            request_id,
            label: label.into(),
            advice: advice.into(),
            outcome,
            best_score: 0.0,
            attempts: Vec::new(),
            generated_at: Utc::now(),
        }
    }

    /// Number of generation attempts started.
    pub fn attempts_used(&self) -> usize {
        self.attempts.len()
    }

    /// Number of candidates generated and scored.
    pub fn candidates_scored(&self) -> usize {
        self.attempts.iter().map(|a| a.candidates.len()).sum()
    }
}

/// Why the loop stopped early.
enum Halt {
    /// Timeout or cancellation.
    Interrupted,
    /// Backend failure.
    Failed(AdviceError),
}

impl From<AdviceError> for Halt {
    fn from(err: AdviceError) -> Self {
        Self::Failed(err)
    }
}

type Step<T> = std::result::Result<T, Halt>;

/// Generates advice for a category label and diary text.
///
/// Each call owns its own [`EngineState`]; the engine itself holds only
/// shared handles to stateless backends, so one engine can serve concurrent
/// requests.
pub struct AdviceEngine {
    store: Arc<dyn VectorStore>,
    embeddings: Arc<dyn EmbeddingProvider>,
    llm: Arc<dyn LanguageModelClient>,
    sentiment: SentimentFallbackHandler,
    config: AdviceConfig,
}

impl AdviceEngine {
    /// Create a new engine.
    pub fn new(
        store: Arc<dyn VectorStore>,
        embeddings: Arc<dyn EmbeddingProvider>,
        llm: Arc<dyn LanguageModelClient>,
        config: AdviceConfig,
    ) -> Self {
        Self {
            store,
            embeddings,
            llm,
            sentiment: SentimentFallbackHandler::new(),
            config,
        }
    }

    /// Replace the sentiment handler used for no-signal entries.
    pub fn with_sentiment(mut self, sentiment: SentimentFallbackHandler) -> Self {
        self.sentiment = sentiment;
        self
    }

    /// Loop configuration.
    pub fn config(&self) -> &AdviceConfig {
        &self.config
    }

    /// Sentiment handler for no-signal entries.
    pub fn sentiment(&self) -> &SentimentFallbackHandler {
        &self.sentiment
    }

    /// Generate advice text for `label` and `diary_text`.
    ///
    /// Missing reference data and unmet quality both resolve to
    /// [`FALLBACK_MESSAGE`]. Only backend failures are errors.
    pub async fn generate(&self, label: &str, diary_text: &str) -> Result<String> {
        Ok(self.generate_report(label, diary_text).await?.advice)
    }

    /// Generate advice and return it with its telemetry.
    pub async fn generate_report(&self, label: &str, diary_text: &str) -> Result<AdviceReport> {
        self.generate_report_with_cancel(label, diary_text, &CancellationToken::new())
            .await
    }

    /// Generate advice, aborting with [`FALLBACK_MESSAGE`] when `cancel`
    /// fires or a backend call exceeds the request timeout.
    pub async fn generate_report_with_cancel(
        &self,
        label: &str,
        diary_text: &str,
        cancel: &CancellationToken,
    ) -> Result<AdviceReport> {
        let request_id = Uuid::new_v4();
        let label = normalize_label(label);
        let span = info_span!("advice", %request_id, label = %label);

        self.run(request_id, label, diary_text, cancel)
            .instrument(span)
            .await
    }

    async fn run(
        &self,
        request_id: Uuid,
        label: String,
        diary_text: &str,
        cancel: &CancellationToken,
    ) -> Result<AdviceReport> {
        if Category::from_label(&label).is_some_and(|c| c.is_no_signal()) {
            info!("No-signal entry answered by sentiment fallback");
            return Ok(self.sentiment.report_for(request_id, label, diary_text));
        }

        let mut state = EngineState::new(FALLBACK_MESSAGE);
        let outcome = match self.drive(&label, diary_text, cancel, &mut state).await {
            Ok(outcome) => outcome,
            Err(Halt::Interrupted) => {
                warn!(
                    attempts = state.attempts_used(),
                    best_score = state.best_score(),
                    "Advice request timed out or was cancelled"
                );
                Outcome::TimedOut
            }
            Err(Halt::Failed(err)) => {
                error!(error = %err, attempts = state.attempts_used(), "Advice generation failed");
                return Err(err);
            }
        };

        let (best_response, best_score, attempts) = state.into_parts();
        let advice = match outcome {
            Outcome::Accepted => best_response,
            _ => FALLBACK_MESSAGE.to_string(),
        };

        let mut report = AdviceReport::new(request_id, label, advice, outcome);
        report.best_score = best_score;
        report.attempts = attempts;
        Ok(report)
    }

    async fn drive(
        &self,
        label: &str,
        diary_text: &str,
        cancel: &CancellationToken,
        state: &mut EngineState,
    ) -> Step<Outcome> {
        let lookup = self.store.lookup(label).map_err(AdviceError::Store);
        let Some(refs) = self.guarded(cancel, lookup).await? else {
            warn!("No reference data for label");
            return Ok(Outcome::NotFound);
        };

        let provided = self.embeddings.dimension();
        if provided != refs.dimension() {
            return Err(Halt::Failed(AdviceError::DimensionMismatch {
                expected: refs.dimension(),
                actual: provided,
            }));
        }

        let threshold = self.config.similarity_threshold;
        while !state.reached(threshold) && state.attempts_used() < self.config.max_attempts {
            let attempt = state.begin_attempt();
            let prompt = build_prompt(&PromptContext {
                diary_text,
                label,
                suggestions: refs.suggestions(),
                threshold,
                best_score: state.best_score(),
                best_response: state.best_response(),
            });

            info!(attempt, best_score = state.best_score(), "Starting generation attempt");

            if self.config.concurrent_candidates {
                self.attempt_concurrent(attempt, &prompt, &refs, cancel, state)
                    .await?;
            } else {
                self.attempt_sequential(attempt, &prompt, &refs, cancel, state)
                    .await?;
            }
        }

        if state.reached(threshold) {
            info!(
                attempts = state.attempts_used(),
                score = state.best_score(),
                "Similarity threshold reached"
            );
            Ok(Outcome::Accepted)
        } else {
            warn!(
                attempts = state.attempts_used(),
                best_score = state.best_score(),
                threshold,
                "Similarity threshold not reached"
            );
            Ok(Outcome::QualityNotReached)
        }
    }

    /// Score candidates one after another, stopping at the first that
    /// reaches the threshold.
    async fn attempt_sequential(
        &self,
        attempt: usize,
        prompt: &str,
        refs: &ReferenceSet,
        cancel: &CancellationToken,
        state: &mut EngineState,
    ) -> Step<()> {
        for index in 0..self.config.candidates_per_attempt {
            let candidate = self.score_candidate(index, prompt, refs, cancel).await?;
            self.record(attempt, candidate, state);
            if state.reached(self.config.similarity_threshold) {
                break;
            }
        }
        Ok(())
    }

    /// Score all candidates of an attempt concurrently, checking the
    /// threshold as each finishes. Reaching it drops the rest.
    async fn attempt_concurrent(
        &self,
        attempt: usize,
        prompt: &str,
        refs: &ReferenceSet,
        cancel: &CancellationToken,
        state: &mut EngineState,
    ) -> Step<()> {
        let mut pending: FuturesUnordered<_> = (0..self.config.candidates_per_attempt)
            .map(|index| self.score_candidate(index, prompt, refs, cancel))
            .collect();

        while let Some(result) = pending.next().await {
            self.record(attempt, result?, state);
            if state.reached(self.config.similarity_threshold) {
                if !pending.is_empty() {
                    debug!(attempt, in_flight = pending.len(), "Dropping in-flight candidates");
                }
                break;
            }
        }
        Ok(())
    }

    fn record(&self, attempt: usize, candidate: CandidateScore, state: &mut EngineState) {
        let index = candidate.index;
        let score = candidate.max_similarity;
        let improved = state.record(candidate);
        info!(
            attempt,
            candidate = index,
            score,
            best_score = state.best_score(),
            improved,
            "Scored candidate"
        );
    }

    /// Generate one candidate, embed it and score it against the references.
    async fn score_candidate(
        &self,
        index: usize,
        prompt: &str,
        refs: &ReferenceSet,
        cancel: &CancellationToken,
    ) -> Step<CandidateScore> {
        let generation = self
            .llm
            .generate(prompt, self.config.temperature)
            .map_err(AdviceError::from);
        let text = self.guarded(cancel, generation).await?;

        let embedding = self
            .embeddings
            .embed_one(&text)
            .map_err(AdviceError::from_embedding);
        let embedding = self.guarded(cancel, embedding).await?;

        let score =
            max_similarity(&embedding, refs.embeddings()).map_err(AdviceError::from_embedding)?;

        Ok(CandidateScore {
            index,
            text,
            embedding,
            max_similarity: score,
        })
    }

    /// Run a backend call under the request timeout, racing `cancel`.
    async fn guarded<T, F>(&self, cancel: &CancellationToken, call: F) -> Step<T>
    where
        F: Future<Output = Result<T>>,
    {
        let limit = Duration::from_secs(self.config.request_timeout_secs);
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(Halt::Interrupted),
            result = tokio::time::timeout(limit, call) => match result {
                Ok(Ok(value)) => Ok(value),
                Ok(Err(err)) => Err(Halt::Failed(err)),
                Err(_) => {
                    debug!(timeout_secs = limit.as_secs(), "Backend call timed out");
                    Err(Halt::Interrupted)
                }
            },
        }
    }
}
