//! End-to-end advice engine scenarios against counting fake backends.

use mindnote_advice::sentiment::{NEGATIVE_RESPONSE, SUPPORTIVE_RESPONSE};
use mindnote_advice::{AdviceEngine, AdviceError, DiaryAdvisor, Outcome, FALLBACK_MESSAGE};
use mindnote_core::config::{AdviceConfig, GateConfig};
use mindnote_core::Classification;
use mindnote_integration_tests::{candidate_text, reference_set, FakeEmbeddings, FakeLlm};
use mindnote_memory::{FileVectorStore, MemoryVectorStore, ReferenceDocument, VectorStore};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

fn depression_store() -> Arc<dyn VectorStore> {
    Arc::new(MemoryVectorStore::with_sets([reference_set("depression")]))
}

fn engine(llm: &Arc<FakeLlm>, embeddings: &Arc<FakeEmbeddings>, config: AdviceConfig) -> AdviceEngine {
    AdviceEngine::new(depression_store(), embeddings.clone(), llm.clone(), config)
}

#[tokio::test]
async fn test_first_qualifying_candidate_returns_immediately() {
    let llm = Arc::new(FakeLlm::with_scores(&[0.65, 0.99]));
    let embeddings = Arc::new(FakeEmbeddings::new());
    let engine = engine(&llm, &embeddings, AdviceConfig::default());

    let advice = engine
        .generate("depression", "I have been feeling down lately")
        .await
        .unwrap();

    assert_eq!(advice, candidate_text(0.65));
    assert_eq!(llm.calls(), 1);
    assert_eq!(embeddings.calls(), 1);
}

#[tokio::test]
async fn test_exhausted_attempts_return_exact_fallback() {
    let llm = Arc::new(FakeLlm::with_scores(&[0.1, 0.3, 0.59, 0.2]));
    let embeddings = Arc::new(FakeEmbeddings::new());
    let engine = engine(&llm, &embeddings, AdviceConfig::default());

    let report = engine
        .generate_report("depression", "I have been feeling down lately")
        .await
        .unwrap();

    assert_eq!(report.advice, FALLBACK_MESSAGE);
    assert_eq!(report.outcome, Outcome::QualityNotReached);
    assert!((report.best_score - 0.59).abs() < 1e-4);
    assert_eq!(llm.calls(), 10);
    assert_eq!(embeddings.calls(), 10);
    assert_eq!(report.attempts_used(), 5);
    assert_eq!(report.candidates_scored(), 10);
}

#[tokio::test]
async fn test_calls_bounded_and_stop_at_threshold() {
    // Attempt 1: 0.2, 0.4. Attempt 2: 0.7 stops the loop.
    let llm = Arc::new(FakeLlm::with_scores(&[0.2, 0.4, 0.7, 0.9]));
    let embeddings = Arc::new(FakeEmbeddings::new());
    let engine = engine(&llm, &embeddings, AdviceConfig::default());

    let report = engine.generate_report("depression", "text").await.unwrap();

    assert_eq!(report.outcome, Outcome::Accepted);
    assert_eq!(report.advice, candidate_text(0.7));
    assert_eq!(llm.calls(), 3);
    assert_eq!(report.attempts_used(), 2);
    assert_eq!(report.attempts[1].candidates.len(), 1);
}

#[tokio::test]
async fn test_best_score_never_decreases() {
    let llm = Arc::new(FakeLlm::with_scores(&[
        0.5, 0.1, 0.3, 0.55, -0.2, 0.4, 0.52, 0.0, 0.2, 0.1,
    ]));
    let embeddings = Arc::new(FakeEmbeddings::new());
    let engine = engine(&llm, &embeddings, AdviceConfig::default());

    let report = engine.generate_report("depression", "text").await.unwrap();

    let mut best = 0.0f32;
    let mut running = Vec::new();
    for attempt in &report.attempts {
        for candidate in &attempt.candidates {
            best = best.max(candidate.max_similarity);
            running.push(best);
        }
    }
    assert!(running.windows(2).all(|w| w[1] >= w[0]));
    assert!((report.best_score - 0.55).abs() < 1e-4);
    assert_eq!(report.advice, FALLBACK_MESSAGE);
}

#[tokio::test]
async fn test_retry_prompts_carry_progress() {
    let llm = Arc::new(FakeLlm::with_scores(&[0.45, 0.3, 0.8]));
    let embeddings = Arc::new(FakeEmbeddings::new());
    let engine = engine(&llm, &embeddings, AdviceConfig::default());

    engine.generate("depression", "text").await.unwrap();

    let prompts = llm.prompts();
    assert_eq!(prompts.len(), 3);
    assert!(prompts[0].contains("1. Stay positive"));
    assert!(prompts[0].contains("2. Take care of yourself"));
    assert!(prompts[0].contains("best similarity score so far is 0.00"));
    assert!(prompts[2].contains("best similarity score so far is 0.45"));
    assert!(prompts[2].contains(&candidate_text(0.45)));
}

#[tokio::test]
async fn test_missing_label_makes_no_backend_calls() {
    let llm = Arc::new(FakeLlm::with_scores(&[0.9]));
    let embeddings = Arc::new(FakeEmbeddings::new());
    let engine = engine(&llm, &embeddings, AdviceConfig::default());

    let report = engine.generate_report("Anxiety", "text").await.unwrap();

    assert_eq!(report.advice, FALLBACK_MESSAGE);
    assert_eq!(report.outcome, Outcome::NotFound);
    assert_eq!(llm.calls(), 0);
    assert_eq!(embeddings.calls(), 0);
}

#[tokio::test]
async fn test_label_match_ignores_case() {
    let llm = Arc::new(FakeLlm::with_scores(&[0.9]));
    let embeddings = Arc::new(FakeEmbeddings::new());
    let engine = engine(&llm, &embeddings, AdviceConfig::default());

    let advice = engine.generate("  DEPRESSION ", "text").await.unwrap();
    assert_eq!(advice, candidate_text(0.9));
}

#[tokio::test]
async fn test_no_signal_positive_entry_uses_canned_reply() {
    let llm = Arc::new(FakeLlm::with_scores(&[0.9]));
    let embeddings = Arc::new(FakeEmbeddings::new());
    let engine = engine(&llm, &embeddings, AdviceConfig::default());

    let positive = engine
        .generate("off my chest", "Today was wonderful, I feel so happy and grateful!")
        .await
        .unwrap();
    let neutral = engine
        .generate("Off My Chest", "I went to the store and bought some bread.")
        .await
        .unwrap();
    let negative = engine
        .generate("Off My Chest", "I feel hopeless and alone.")
        .await
        .unwrap();

    assert_eq!(positive, SUPPORTIVE_RESPONSE);
    assert_eq!(neutral, SUPPORTIVE_RESPONSE);
    assert_eq!(negative, NEGATIVE_RESPONSE);
    assert_eq!(llm.calls(), 0);
    assert_eq!(embeddings.calls(), 0);
}

#[tokio::test]
async fn test_generation_failure_is_typed_error() {
    let llm = Arc::new(FakeLlm::failing());
    let embeddings = Arc::new(FakeEmbeddings::new());
    let engine = engine(&llm, &embeddings, AdviceConfig::default());

    let err = engine.generate("depression", "text").await.unwrap_err();

    assert!(matches!(err, AdviceError::Generation(_)));
    assert_eq!(llm.calls(), 1);
    assert_eq!(embeddings.calls(), 0);
}

#[tokio::test]
async fn test_embedding_failure_is_typed_error() {
    let llm = Arc::new(FakeLlm::with_scores(&[0.9]));
    let embeddings = Arc::new(FakeEmbeddings::failing());
    let engine = engine(&llm, &embeddings, AdviceConfig::default());

    let err = engine.generate("depression", "text").await.unwrap_err();
    assert!(matches!(err, AdviceError::Embedding(_)));
}

#[tokio::test]
async fn test_dimension_mismatch_fails_before_generation() {
    let llm = Arc::new(FakeLlm::with_scores(&[0.9]));
    let embeddings = Arc::new(FakeEmbeddings::with_dimension(384));
    let engine = engine(&llm, &embeddings, AdviceConfig::default());

    let err = engine.generate("depression", "text").await.unwrap_err();

    assert!(matches!(
        err,
        AdviceError::DimensionMismatch {
            expected: 2,
            actual: 384
        }
    ));
    assert_eq!(llm.calls(), 0);
}

#[tokio::test]
async fn test_malformed_record_is_store_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("references.json");
    let documents = vec![ReferenceDocument {
        class: Some("depression".to_string()),
        suggestions: Some(vec!["Stay positive".to_string(), "Rest".to_string()]),
        embeddings: Some(vec![vec![1.0, 0.0]]),
    }];
    std::fs::write(&path, serde_json::to_string(&documents).unwrap()).unwrap();

    let llm = Arc::new(FakeLlm::with_scores(&[0.9]));
    let embeddings = Arc::new(FakeEmbeddings::new());
    let store = Arc::new(FileVectorStore::new(path).unwrap());
    let engine = AdviceEngine::new(store, embeddings, llm.clone(), AdviceConfig::default());

    let err = engine.generate("depression", "text").await.unwrap_err();
    assert!(matches!(err, AdviceError::Store(_)));
    assert_eq!(llm.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_timeout_yields_fallback() {
    let llm = Arc::new(FakeLlm::slow(Duration::from_secs(120)));
    let embeddings = Arc::new(FakeEmbeddings::new());
    let config = AdviceConfig {
        request_timeout_secs: 5,
        ..AdviceConfig::default()
    };
    let engine = engine(&llm, &embeddings, config);

    let report = engine.generate_report("depression", "text").await.unwrap();

    assert_eq!(report.outcome, Outcome::TimedOut);
    assert_eq!(report.advice, FALLBACK_MESSAGE);
    assert_eq!(embeddings.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_cancellation_yields_fallback() {
    let llm = Arc::new(FakeLlm::slow(Duration::from_secs(20)));
    let embeddings = Arc::new(FakeEmbeddings::new());
    let engine = engine(&llm, &embeddings, AdviceConfig::default());

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(1)).await;
        trigger.cancel();
    });

    let report = engine
        .generate_report_with_cancel("depression", "text", &cancel)
        .await
        .unwrap();

    assert_eq!(report.outcome, Outcome::TimedOut);
    assert_eq!(report.advice, FALLBACK_MESSAGE);
    assert_eq!(report.attempts_used(), 1);
}

#[tokio::test]
async fn test_concurrent_candidates_short_circuit() {
    let llm = Arc::new(FakeLlm::with_scores(&[0.9]));
    let embeddings = Arc::new(FakeEmbeddings::new());
    let config = AdviceConfig {
        concurrent_candidates: true,
        candidates_per_attempt: 3,
        ..AdviceConfig::default()
    };
    let engine = engine(&llm, &embeddings, config);

    let report = engine.generate_report("depression", "text").await.unwrap();

    assert_eq!(report.outcome, Outcome::Accepted);
    assert_eq!(report.advice, candidate_text(0.9));
    assert_eq!(report.attempts_used(), 1);
    assert_eq!(report.candidates_scored(), 1);
}

#[tokio::test]
async fn test_concurrent_requests_do_not_share_state() {
    let llm = Arc::new(FakeLlm::with_scores(&[0.9]));
    let embeddings = Arc::new(FakeEmbeddings::new());
    let engine = Arc::new(engine(&llm, &embeddings, AdviceConfig::default()));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let engine = engine.clone();
            tokio::spawn(async move { engine.generate_report("depression", "text").await })
        })
        .collect();

    for handle in handles {
        let report = handle.await.unwrap().unwrap();
        assert_eq!(report.outcome, Outcome::Accepted);
        assert_eq!(report.attempts_used(), 1);
    }
    assert_eq!(llm.calls(), 4);
}

#[tokio::test]
async fn test_advisor_gate_blocks_low_confidence() {
    let llm = Arc::new(FakeLlm::with_scores(&[0.9]));
    let embeddings = Arc::new(FakeEmbeddings::new());
    let advisor = DiaryAdvisor::new(
        engine(&llm, &embeddings, AdviceConfig::default()),
        GateConfig::default(),
    );

    let low = advisor
        .advise(&Classification::new("Depression", 0.5), "text")
        .await
        .unwrap();
    assert_eq!(low, GateConfig::default().low_confidence_message);
    assert_eq!(llm.calls(), 0);

    let high = advisor
        .advise(&Classification::new("Depression", 0.93), "text")
        .await
        .unwrap();
    assert_eq!(high, candidate_text(0.9));
    assert_eq!(llm.calls(), 1);
}
