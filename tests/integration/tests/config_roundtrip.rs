//! Config save/load roundtrip integration tests.

use mindnote_core::config::{Config, StoreBackend};
use std::path::Path;
use tempfile::TempDir;

#[test]
fn test_config_save_and_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("mindnote.json5");

    let config = Config::default();
    config.save(&path).unwrap();

    let loaded = Config::load(&path).unwrap();
    assert_eq!(loaded.advice.similarity_threshold, config.advice.similarity_threshold);
    assert_eq!(loaded.advice.max_attempts, config.advice.max_attempts);
    assert_eq!(
        loaded.advice.candidates_per_attempt,
        config.advice.candidates_per_attempt
    );
    assert_eq!(loaded.embeddings.dimensions, config.embeddings.dimensions);
    assert_eq!(loaded.store.collection, "mental_advice");
    assert_eq!(loaded.gate.min_confidence, config.gate.min_confidence);
}

#[test]
fn test_config_modify_and_reload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("mindnote.json5");

    let mut config = Config::default();
    config.advice.similarity_threshold = 0.75;
    config.advice.concurrent_candidates = true;
    config.store.backend = StoreBackend::Memory;
    config.save(&path).unwrap();

    let loaded = Config::load(&path).unwrap();
    assert_eq!(loaded.advice.similarity_threshold, 0.75);
    assert!(loaded.advice.concurrent_candidates);
    assert_eq!(loaded.store.backend, StoreBackend::Memory);
}

#[test]
fn test_partial_json5_fills_defaults() {
    let config = Config::parse(
        r#"{
            // only override what differs
            advice: { temperature: 0.9 },
            store: { backend: "memory" },
        }"#,
    )
    .unwrap();

    assert_eq!(config.advice.temperature, 0.9);
    assert_eq!(config.advice.max_attempts, 5);
    assert_eq!(config.llm.model, "gpt-4o-mini");
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_load_nonexistent() {
    let result = Config::load(Path::new("/nonexistent/mindnote.json5"));
    assert!(result.is_err());
}

#[test]
fn test_config_parse_invalid() {
    let result = Config::parse("not valid json");
    assert!(result.is_err());
}
