//! # mindnote-core
//!
//! Core types, configuration, and utilities for Mindnote.
//!
//! This crate provides shared functionality used across all Mindnote crates:
//!
//! - **Configuration**: Loading, validation, and persistence of the json5 config file
//! - **Types**: Mental-health categories and classifier output records
//! - **Utilities**: Path resolution and environment handling

pub mod config;
pub mod types;
pub mod error;
pub mod paths;
pub mod env;

// Re-exports for convenience
pub use config::Config;
pub use error::{ConfigError, Result};
pub use types::*;
