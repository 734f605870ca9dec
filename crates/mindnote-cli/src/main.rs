//! Mindnote CLI entry point.

use clap::Parser;
use mindnote_cli::{run, Cli};
use mindnote_core::config::{Config, LoggingConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // A broken config file is reported by the command itself.
    let logging = Config::load_or_default(cli.config.as_deref())
        .map(|c| c.logging)
        .unwrap_or_default();
    init_tracing(cli.verbose, &logging);

    run(cli).await
}

fn init_tracing(verbose: u8, logging: &LoggingConfig) {
    let default_directive = match verbose {
        0 => format!("mindnote={}", logging.level.as_str()),
        1 => "mindnote=debug".to_string(),
        _ => "mindnote=trace".to_string(),
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let registry = tracing_subscriber::registry().with(filter);
    if logging.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
