//! Auth command - connect and disconnect the Twitch account.

use anyhow::Result;
use clap::{Args, Subcommand};
use console::{Style, style};
use livewatch_domain::PopupState;
use serde::Serialize;

use super::Context;

/// Arguments for the auth command.
#[derive(Args, Debug)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommand,
}

#[derive(Subcommand, Debug)]
pub enum AuthCommand {
    /// Sign in with Twitch and show your live channels
    Login {
        /// Paste the redirect URL instead of running a local listener
        #[arg(long)]
        manual: bool,
    },

    /// Show whether a session is stored and still accepted
    Status,

    /// Forget the stored session
    Logout,
}

/// Run the auth command.
pub async fn run(args: AuthArgs, ctx: &Context) -> Result<()> {
    match args.command {
        AuthCommand::Login { manual } => cmd_login(manual, ctx).await,
        AuthCommand::Status => cmd_status(ctx).await,
        AuthCommand::Logout => cmd_logout(ctx).await,
    }
}

async fn cmd_login(manual: bool, ctx: &Context) -> Result<()> {
    let mut popup = ctx.popup(manual)?;
    match popup.connect().await {
        PopupState::Connect => anyhow::bail!("Sign-in did not complete"),
        PopupState::Streams { .. } | PopupState::Error => Ok(()),
    }
}

/// Status for JSON output.
#[derive(Debug, Serialize)]
struct StatusOutput {
    connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    login: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    expires_in: Option<u64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    scopes: Vec<String>,
}

async fn cmd_status(ctx: &Context) -> Result<()> {
    let state = ctx.state();
    let mut output = StatusOutput {
        connected: false,
        token: None,
        login: None,
        expires_in: None,
        scopes: Vec::new(),
    };

    if let Some(session) = state.load_session().await? {
        output.token = Some(session.masked());
        let api = ctx.api()?;
        match api.check_token(session.access_token()).await {
            Ok(Some(info)) => {
                output.connected = true;
                output.login = Some(info.login);
                output.expires_in = Some(info.expires_in);
                output.scopes = info.scopes;
            }
            Ok(None) => {
                tracing::info!("Stored token rejected, clearing session");
                state.clear_session().await?;
            }
            Err(e) => anyhow::bail!("Could not reach Twitch: {}", e),
        }
    }

    if ctx.json_output {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let dim = Style::new().dim();
    println!("{}", style("Authentication Status").bold());
    println!("{}", dim.apply_to("─".repeat(40)));

    match (&output.token, output.connected) {
        (None, _) => {
            println!("Twitch: not connected");
            println!("  Run 'livewatch auth login' to connect");
        }
        (Some(token), false) => {
            println!("Twitch: session {} was no longer valid and has been removed", token);
            println!("  Run 'livewatch auth login' to connect again");
        }
        (Some(token), true) => {
            println!("Twitch: {}", style("connected").green());
            if let Some(login) = &output.login {
                println!("  {} {}", dim.apply_to("User:"), login);
            }
            println!("  {} {}", dim.apply_to("Token:"), token);
            if let Some(expires_in) = output.expires_in {
                println!("  {} {}s", dim.apply_to("Expires in:"), expires_in);
            }
            if !output.scopes.is_empty() {
                println!("  {} {}", dim.apply_to("Scopes:"), output.scopes.join(" "));
            }
        }
    }

    Ok(())
}

async fn cmd_logout(ctx: &Context) -> Result<()> {
    let had_session = ctx.state().load_session().await?.is_some();
    let mut popup = ctx.popup(false)?;
    popup.logout().await;

    if !ctx.json_output {
        println!();
        if had_session {
            println!("Session removed.");
        } else {
            println!("No session found.");
        }
    }
    Ok(())
}
