//! Request layer: confidence gate in front of the advice engine.

use crate::engine::{AdviceEngine, AdviceReport, Outcome};
use crate::Result;
use mindnote_core::config::GateConfig;
use mindnote_core::{normalize_label, Classification};
use tokio_util::sync::CancellationToken;
use tracing::info;
use uuid::Uuid;

/// Turns a classified diary entry into advice.
///
/// Entries whose confidence is below the gate get the configured
/// low-confidence message without touching any backend. No-signal entries
/// bypass the gate, since the sentiment fallback needs no confidence.
pub struct DiaryAdvisor {
    engine: AdviceEngine,
    gate: GateConfig,
}

impl DiaryAdvisor {
    pub fn new(engine: AdviceEngine, gate: GateConfig) -> Self {
        Self { engine, gate }
    }

    pub fn engine(&self) -> &AdviceEngine {
        &self.engine
    }

    pub fn gate(&self) -> &GateConfig {
        &self.gate
    }

    /// Advice text for a classified entry.
    pub async fn advise(&self, classification: &Classification, diary_text: &str) -> Result<String> {
        Ok(self.advise_report(classification, diary_text).await?.advice)
    }

    /// Advice for a classified entry with its telemetry.
    pub async fn advise_report(
        &self,
        classification: &Classification,
        diary_text: &str,
    ) -> Result<AdviceReport> {
        self.advise_report_with_cancel(classification, diary_text, &CancellationToken::new())
            .await
    }

    /// Like [`advise_report`](Self::advise_report), aborting when `cancel`
    /// fires.
    pub async fn advise_report_with_cancel(
        &self,
        classification: &Classification,
        diary_text: &str,
        cancel: &CancellationToken,
    ) -> Result<AdviceReport> {
        if !classification.is_no_signal() && !classification.meets(self.gate.min_confidence) {
            info!(
                label = %classification.label,
                confidence = classification.confidence,
                min_confidence = self.gate.min_confidence,
                "Classification below confidence gate"
            );
            return Ok(AdviceReport::new(
                Uuid::new_v4(),
                normalize_label(&classification.label),
                self.gate.low_confidence_message.clone(),
                Outcome::BelowConfidenceGate,
            ));
        }

        let label = classification
            .category()
            .map(|c| c.store_key())
            .unwrap_or_else(|| classification.label.clone());

        self.engine
            .generate_report_with_cancel(&label, diary_text, cancel)
            .await
    }
}
