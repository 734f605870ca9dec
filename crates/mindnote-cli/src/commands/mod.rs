//! CLI command implementations.

pub mod advise;
pub mod config;
pub mod sentiment;
