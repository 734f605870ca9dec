//! Environment variable handling.

use crate::error::ConfigError;
use std::env;

/// Well-known environment variable names.
pub mod vars {
    /// API key for the OpenAI chat and embeddings endpoints.
    pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
    /// Astra DB application token.
    pub const ASTRA_DB_APPLICATION_TOKEN: &str = "ASTRA_DB_APPLICATION_TOKEN";
    /// Astra DB Data API endpoint.
    pub const ASTRA_DB_ENDPOINT: &str = "ASTRA_DB_ENDPOINT";
    /// Astra DB keyspace holding the reference collection.
    pub const ASTRA_DB_KEYSPACE: &str = "ASTRA_DB_KEYSPACE";
    /// Overrides the config file location.
    pub const MINDNOTE_CONFIG: &str = "MINDNOTE_CONFIG";
}

/// Get an environment variable, returning None if not set or empty.
pub fn get_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
pub fn get_var_or(name: &str, default: &str) -> String {
    get_var(name).unwrap_or_else(|| default.to_string())
}

/// Get a required environment variable.
pub fn require_var(name: &str) -> Result<String, ConfigError> {
    get_var(name).ok_or_else(|| ConfigError::MissingEnv(name.to_string()))
}

/// Get an environment variable as a boolean.
pub fn get_bool(name: &str) -> bool {
    get_var(name)
        .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}

/// Load environment variables from a .env file in the working directory.
///
/// Variables that are already set are left untouched.
pub fn load_dotenv() -> Result<(), std::io::Error> {
    let path = std::path::Path::new(".env");
    if path.exists() {
        let content = std::fs::read_to_string(path)?;
        for (key, value) in parse_dotenv(&content) {
            if env::var(&key).is_err() {
                env::set_var(key, value);
            }
        }
    }
    Ok(())
}

/// Parse `KEY=value` lines, skipping comments and stripping matching quotes.
fn parse_dotenv(content: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for line in content.lines() {
        let line = line.trim();

        // Skip comments and empty lines
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some((key, value)) = line.split_once('=') {
            let key = key.trim();
            let value = value.trim();

            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
                .unwrap_or(value);

            pairs.push((key.to_string(), value.to_string()));
        }
    }
    pairs
}
