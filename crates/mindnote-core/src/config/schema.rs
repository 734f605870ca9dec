//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main Mindnote configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Advice generation loop settings.
    #[serde(default)]
    pub advice: AdviceConfig,

    /// Embedding backend settings.
    #[serde(default)]
    pub embeddings: EmbeddingsConfig,

    /// Language model settings.
    #[serde(default)]
    pub llm: LlmConfig,

    /// Reference store settings.
    #[serde(default)]
    pub store: StoreConfig,

    /// Confidence gate applied before the engine is invoked.
    #[serde(default)]
    pub gate: GateConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Advice generation loop configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdviceConfig {
    /// Minimum similarity a candidate must reach to be accepted.
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f32,

    /// Maximum number of generation rounds.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,

    /// Generations requested per round.
    #[serde(default = "default_candidates_per_attempt")]
    pub candidates_per_attempt: usize,

    /// Sampling temperature for generation.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Issue the candidates of one round concurrently.
    #[serde(default)]
    pub concurrent_candidates: bool,

    /// Timeout applied to every backend call, in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_similarity_threshold() -> f32 {
    0.6
}

fn default_max_attempts() -> usize {
    5
}

fn default_candidates_per_attempt() -> usize {
    2
}

fn default_temperature() -> f32 {
    1.5
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for AdviceConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: default_similarity_threshold(),
            max_attempts: default_max_attempts(),
            candidates_per_attempt: default_candidates_per_attempt(),
            temperature: default_temperature(),
            concurrent_candidates: false,
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Embedding backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingsConfig {
    /// Embedding model name.
    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// Expected vector dimension; must match the stored reference embeddings.
    #[serde(default = "default_embedding_dimensions")]
    pub dimensions: usize,

    /// Custom API base URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_embedding_dimensions() -> usize {
    1536
}

impl Default for EmbeddingsConfig {
    fn default() -> Self {
        Self {
            model: default_embedding_model(),
            dimensions: default_embedding_dimensions(),
            base_url: None,
        }
    }
}

/// Language model configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Chat model name.
    #[serde(default = "default_llm_model")]
    pub model: String,

    /// Completion token cap per candidate.
    #[serde(default = "default_max_completion_tokens")]
    pub max_completion_tokens: usize,

    /// Custom API base URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

fn default_llm_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_max_completion_tokens() -> usize {
    100
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: default_llm_model(),
            max_completion_tokens: default_max_completion_tokens(),
            base_url: None,
        }
    }
}

/// Reference store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Store backend.
    #[serde(default)]
    pub backend: StoreBackend,

    /// Path to the JSON reference file (file backend).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Data API endpoint (astra backend). Falls back to `ASTRA_DB_ENDPOINT`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Keyspace holding the collection (astra backend).
    #[serde(default = "default_keyspace")]
    pub keyspace: String,

    /// Collection holding one document per category.
    #[serde(default = "default_collection")]
    pub collection: String,
}

fn default_keyspace() -> String {
    "SWMH".to_string()
}

fn default_collection() -> String {
    "mental_advice".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            path: None,
            endpoint: None,
            keyspace: default_keyspace(),
            collection: default_collection(),
        }
    }
}

/// Reference store backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Memory,
    #[default]
    File,
    Astra,
}

/// Confidence gate configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    /// Minimum classifier confidence before advice is generated.
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f32,

    /// Message returned when the classifier is not confident enough.
    #[serde(default = "default_low_confidence_message")]
    pub low_confidence_message: String,
}

fn default_min_confidence() -> f32 {
    0.7
}

fn default_low_confidence_message() -> String {
    "We couldn't process your request at this time. Please try again or share more details for better advice.".to_string()
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            min_confidence: default_min_confidence(),
            low_confidence_message: default_low_confidence_message(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level.
    #[serde(default)]
    pub level: LogLevel,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

/// Log level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Directive string understood by `tracing_subscriber::EnvFilter`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}
