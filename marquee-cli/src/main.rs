//! Marquee CLI - Command-line interface
//!
//! Search OMDb from the terminal, one-shot or interactively.

mod commands;
mod render;

use std::path::PathBuf;

use anyhow::anyhow;
use clap::Parser;
use marquee_core::MarqueeConfig;
use marquee_core::tracing_setup::{CliLogLevel, init_tracing};

#[derive(Parser)]
#[command(name = "marquee")]
#[command(about = "Search movies and series on OMDb")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: commands::Commands,

    /// Console log level (RUST_LOG overrides)
    #[arg(long, value_enum, default_value_t = CliLogLevel::Warn, global = true)]
    log_level: CliLogLevel,

    /// Also write trace-level logs into this directory
    #[arg(long, global = true)]
    logs_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.log_level.as_tracing_level(), cli.logs_dir.as_deref())
        .map_err(|e| anyhow!("failed to initialize tracing: {e}"))?;

    let config = MarqueeConfig::from_env();
    if config.api.api_key.is_none() {
        tracing::warn!("OMDB_API_KEY is not set; OMDb will reject requests");
    }

    if let Err(e) = commands::handle_command(cli.command, config).await {
        tracing::debug!(error = ?e, "Command failed");
        eprintln!("Error: {}", e.user_message());
        std::process::exit(1);
    }

    Ok(())
}
