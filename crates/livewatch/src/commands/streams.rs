//! Streams and refresh commands - the popup in the terminal.

use anyhow::Result;

use super::Context;

/// Show the cached list, then refresh it.
pub async fn run_open(ctx: &Context) -> Result<()> {
    let mut popup = ctx.popup(false)?;
    let state = popup.open().await;
    tracing::debug!(?state, "Popup opened");
    Ok(())
}

/// Fetch and show the list without the cached preview.
pub async fn run_refresh(ctx: &Context) -> Result<()> {
    let mut popup = ctx.popup(false)?;
    let state = popup.refresh().await;
    tracing::debug!(?state, "Popup refreshed");
    Ok(())
}
