//! Configuration loading and persistence.

use super::{Config, StoreBackend};
use crate::error::ConfigError;
use crate::paths;
use std::fs;
use std::path::Path;

impl Config {
    /// Load configuration from the default path.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = paths::config_file()?;
        Self::load(&path)
    }

    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from a string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        json5::from_str(content).map_err(|e| ConfigError::Json5(e.to_string()))
    }

    /// Load from `path` (or the default path), falling back to defaults
    /// when no file exists. Parse errors are still reported.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        let result = match path {
            Some(path) => Self::load(path),
            None => Self::load_default(),
        };

        match result {
            Ok(config) => Ok(config),
            Err(ConfigError::NotFound(path)) => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Save configuration to a file path.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_json5()?;

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write atomically
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, &content)?;
        fs::rename(&temp_path, path)?;

        Ok(())
    }

    /// Serialize to JSON5 string.
    pub fn to_json5(&self) -> Result<String, ConfigError> {
        // json5 doesn't have a serializer, so we use serde_json with pretty print
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Validate the configuration, collecting all errors before returning.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        // 1. Advice loop
        let advice = &self.advice;
        if !(advice.similarity_threshold > 0.0 && advice.similarity_threshold <= 1.0) {
            errors.push(format!(
                "Similarity threshold must be in (0, 1], got {}",
                advice.similarity_threshold
            ));
        }
        if advice.max_attempts == 0 {
            errors.push("Max attempts must be greater than 0".to_string());
        }
        if advice.candidates_per_attempt == 0 {
            errors.push("Candidates per attempt must be greater than 0".to_string());
        }
        if !(0.0..=2.0).contains(&advice.temperature) {
            errors.push(format!(
                "Temperature must be in [0, 2], got {}",
                advice.temperature
            ));
        }
        if advice.request_timeout_secs == 0 {
            errors.push("Request timeout must be greater than 0".to_string());
        }

        // 2. Backends
        if self.embeddings.dimensions == 0 {
            errors.push("Embedding dimensions must be greater than 0".to_string());
        }
        if self.embeddings.model.trim().is_empty() {
            errors.push("Embedding model cannot be empty".to_string());
        }
        if self.llm.model.trim().is_empty() {
            errors.push("LLM model cannot be empty".to_string());
        }
        if self.llm.max_completion_tokens == 0 {
            errors.push("LLM max completion tokens must be greater than 0".to_string());
        }

        // 3. Store
        if self.store.backend == StoreBackend::Astra {
            if self.store.endpoint.is_none()
                && crate::env::get_var(crate::env::vars::ASTRA_DB_ENDPOINT).is_none()
            {
                errors.push(
                    "Astra store requires an endpoint (store.endpoint or ASTRA_DB_ENDPOINT)"
                        .to_string(),
                );
            }
            if self.store.keyspace.trim().is_empty() {
                errors.push("Astra keyspace cannot be empty".to_string());
            }
        }
        if self.store.collection.trim().is_empty() {
            errors.push("Store collection cannot be empty".to_string());
        }

        // 4. Gate
        if !(0.0..=1.0).contains(&self.gate.min_confidence) {
            errors.push(format!(
                "Gate min_confidence must be in [0, 1], got {}",
                self.gate.min_confidence
            ));
        }

        // Return collected errors
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors.join("; ")))
        }
    }
}
