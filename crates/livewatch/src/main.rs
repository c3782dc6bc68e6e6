//! livewatch - see which followed Twitch channels are live
//!
//! Main entry point for the livewatch CLI.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};

mod capture;
mod commands;
mod render;

use commands::{auth, config, daemon, open, poll, streams};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// livewatch - see which followed Twitch channels are live
#[derive(Parser)]
#[command(name = "livewatch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,

    /// Directory holding config.toml
    #[arg(long, global = true, env = "LIVEWATCH_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Connect or disconnect your Twitch account
    Auth(auth::AuthArgs),

    /// Show live followed channels (cached first, then refreshed)
    Streams,

    /// Fetch and show live followed channels
    Refresh,

    /// Update the cached list once, without output beyond a summary
    Poll,

    /// Keep the cached list updated on a fixed period
    Daemon(daemon::DaemonArgs),

    /// Open a channel page in the browser
    Open(open::OpenArgs),

    /// Configuration management
    Config(config::ConfigArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = livewatch_config::load_config(cli.config_dir.as_deref())
        .context("Failed to load configuration")?;
    let data_dir = livewatch_config::data_dir(&loaded.config);

    // Initialize tracing: console (human-readable) + rotating JSON file
    let filter = if cli.verbose {
        "livewatch=debug,livewatch_domain=debug,livewatch_oauth=debug,livewatch_client=debug,livewatch_store=debug,livewatch_config=debug,info"
    } else {
        "livewatch=info,livewatch_domain=info,livewatch_oauth=info,warn"
    };

    let file_appender = tracing_appender::rolling::daily(data_dir.join("logs"), "livewatch.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    use tracing_subscriber::prelude::*;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .with_filter(tracing_subscriber::EnvFilter::new(filter)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_filter(tracing_subscriber::EnvFilter::new(
                    "livewatch=trace,livewatch_domain=trace,livewatch_oauth=trace,livewatch_client=trace,livewatch_store=trace,livewatch_config=trace,info",
                )),
        )
        .init();

    for warning in &loaded.warnings {
        tracing::warn!("{}", warning);
    }

    let ctx = commands::Context {
        json_output: cli.json,
        verbose: cli.verbose,
        config_dir: cli.config_dir,
        loaded,
        data_dir,
    };

    match cli.command {
        Commands::Auth(args) => auth::run(args, &ctx).await,
        Commands::Streams => streams::run_open(&ctx).await,
        Commands::Refresh => streams::run_refresh(&ctx).await,
        Commands::Poll => poll::run(&ctx).await,
        Commands::Daemon(args) => daemon::run(args, &ctx).await,
        Commands::Open(args) => open::run(args, &ctx).await,
        Commands::Config(args) => config::run(args, &ctx).await,
    }
}
