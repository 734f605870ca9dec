//! Mindnote command-line interface.

pub mod backends;
pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Mindnote - advice for diary entries
#[derive(Parser)]
#[command(name = "mindnote")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase logging verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file
    #[arg(short, long, env = "MINDNOTE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Generate advice for a classified diary entry
    Advise(commands::advise::AdviseArgs),

    /// Score the sentiment of a text offline
    Sentiment(commands::sentiment::SentimentArgs),

    /// Configuration management
    Config(commands::config::ConfigArgs),

    /// Show version information
    Version,
}

/// Run the CLI with the given arguments.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli.config;
    match cli.command {
        Commands::Advise(args) => commands::advise::run(args, config_path.as_deref()).await,
        Commands::Sentiment(args) => commands::sentiment::run(args),
        Commands::Config(args) => commands::config::run(args, config_path.as_deref()),
        Commands::Version => {
            println!("mindnote {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
