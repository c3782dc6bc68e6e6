//! Open command - open a channel page.

use anyhow::{Context as _, Result};
use clap::Args;

use super::Context;

/// Arguments for the open command.
#[derive(Args, Debug)]
pub struct OpenArgs {
    /// Channel login, as shown in the list URL
    pub login: String,

    /// Print the URL instead of launching the browser
    #[arg(long)]
    pub print: bool,
}

/// Run the open command.
pub async fn run(args: OpenArgs, _ctx: &Context) -> Result<()> {
    let login = args.login.trim().trim_start_matches('@').to_lowercase();
    if login.is_empty() || !login.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        anyhow::bail!("'{}' is not a valid channel login", args.login);
    }

    let url = format!("https://twitch.tv/{}", login);
    if args.print {
        println!("{}", url);
        return Ok(());
    }

    livewatch_oauth::open_url(&url).with_context(|| format!("Could not open {}", url))?;
    Ok(())
}
