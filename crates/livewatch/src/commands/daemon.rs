//! Daemon command - keep the cached list fresh.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Args;
use livewatch_domain::{Poller, Scheduler};
use tokio::sync::watch;

use super::Context;

/// Arguments for the daemon command.
#[derive(Args, Debug)]
pub struct DaemonArgs {
    /// Seconds between updates (overrides poller.interval_secs)
    #[arg(long)]
    pub interval: Option<u64>,
}

/// Run the daemon command until Ctrl-C.
pub async fn run(args: DaemonArgs, ctx: &Context) -> Result<()> {
    let period = match args.interval {
        Some(0) => anyhow::bail!("--interval must be greater than 0"),
        Some(secs) => Duration::from_secs(secs),
        None => ctx.config().poller().interval(),
    };

    let poller = Arc::new(Poller::new(ctx.api()?, ctx.state()));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("Received Ctrl-C, shutting down"),
            Err(e) => tracing::error!(error = %e, "Failed to listen for Ctrl-C"),
        }
        shutdown_tx.send(true).ok();
    });

    tracing::info!(
        data_dir = %ctx.data_dir.display(),
        period_secs = period.as_secs(),
        "livewatch daemon started"
    );
    let fired = Scheduler::new(period).run(poller, shutdown_rx).await;
    tracing::info!(fired, "livewatch daemon stopped");
    Ok(())
}
