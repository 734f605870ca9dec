//! Offline sentiment scoring command.

use clap::Args;
use mindnote_advice::{SentimentBucket, SentimentFallbackHandler};

/// Sentiment command arguments.
#[derive(Args)]
pub struct SentimentArgs {
    /// Text to score
    pub text: String,

    /// Print scores as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run the sentiment command.
pub fn run(args: SentimentArgs) -> anyhow::Result<()> {
    let handler = SentimentFallbackHandler::new();
    let scores = handler.polarity(&args.text);
    let bucket = SentimentBucket::for_compound(scores.compound);

    if args.json {
        let value = serde_json::json!({
            "scores": scores,
            "bucket": bucket,
            "response": bucket.response(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("compound: {:.4} ({})", scores.compound, bucket);
        println!(
            "pos: {:.3}  neg: {:.3}  neu: {:.3}",
            scores.positive, scores.negative, scores.neutral
        );
        println!("{}", bucket.response());
    }

    Ok(())
}
