//! Path resolution utilities.

use crate::error::ConfigError;
use std::path::PathBuf;

/// Get the Mindnote base directory (~/.mindnote).
pub fn base_dir() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or_else(|| {
        ConfigError::Validation("Could not determine home directory".to_string())
    })?;
    Ok(home.join(".mindnote"))
}

/// Get the main config file path (~/.mindnote/mindnote.json5).
pub fn config_file() -> Result<PathBuf, ConfigError> {
    Ok(base_dir()?.join("mindnote.json5"))
}

/// Get the default reference store path (~/.mindnote/references.json).
pub fn reference_store_file() -> Result<PathBuf, ConfigError> {
    Ok(base_dir()?.join("references.json"))
}
