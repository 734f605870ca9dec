//! Advice generation command.

use crate::backends;
use clap::Args;
use mindnote_advice::{AdviceReport, SentimentFallbackHandler};
use mindnote_core::config::Config;
use mindnote_core::{env, Classification};
use std::io::Read;
use std::path::Path;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Shown instead of raw backend errors.
const UNAVAILABLE_MESSAGE: &str = "Advice is unavailable right now. Please try again later.";

/// Advise command arguments.
#[derive(Args)]
pub struct AdviseArgs {
    /// Predicted category label (e.g. "Depression", "Off My Chest")
    #[arg(short, long)]
    pub label: String,

    /// Classifier confidence for the label; the confidence gate is skipped
    /// when omitted
    #[arg(long)]
    pub confidence: Option<f32>,

    /// Diary text; read from stdin when omitted
    #[arg(short, long)]
    pub text: Option<String>,

    /// Print the full report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run the advise command.
pub async fn run(args: AdviseArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    if let Err(e) = env::load_dotenv() {
        warn!(error = %e, "Failed to read .env file");
    }

    let config = Config::load_or_default(config_path)?;
    config.validate()?;

    let text = resolve_text(args.text, std::io::stdin())?;
    let classification = Classification::new(args.label, resolve_confidence(args.confidence));

    if let Some(category) = classification.category().filter(|c| c.is_no_signal()) {
        info!(label = %category, "Answering no-signal entry offline");
        let report = SentimentFallbackHandler::new().report(&category.store_key(), &text);
        return print_report(&report, args.json);
    }

    let advisor = backends::build_advisor(&config)?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let report = match advisor
        .advise_report_with_cancel(&classification, &text, &cancel)
        .await
    {
        Ok(report) => report,
        Err(e) => {
            error!(error = %e, "Advice request failed");
            anyhow::bail!(UNAVAILABLE_MESSAGE);
        }
    };

    print_report(&report, args.json)
}

/// Confidence to gate on. Without one the gate is skipped.
fn resolve_confidence(confidence: Option<f32>) -> f32 {
    match confidence {
        Some(confidence) => confidence,
        None => {
            warn!("No --confidence given, skipping the confidence gate");
            1.0
        }
    }
}

fn print_report(report: &AdviceReport, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        println!("{}", report.advice);
    }
    Ok(())
}

/// Use `text` when given, otherwise read all of `input`.
fn resolve_text(text: Option<String>, mut input: impl Read) -> anyhow::Result<String> {
    let text = match text {
        Some(text) => text,
        None => {
            let mut buf = String::new();
            input.read_to_string(&mut buf)?;
            buf
        }
    };

    let text = text.trim();
    if text.is_empty() {
        anyhow::bail!("No diary text provided. Pass --text or pipe it on stdin.");
    }
    Ok(text.to_string())
}
