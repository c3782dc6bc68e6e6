//! Config command - configuration management.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};

use super::Context;

const PROJECT_CONFIG_FILE: &str = "livewatch.toml";

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the resolved configuration and which files it came from
    Show,

    /// Show the user configuration file path
    Path,

    /// Initialize a config file with defaults
    Init {
        /// Create project-local config (./livewatch.toml) instead of user config
        #[arg(long)]
        local: bool,
    },
}

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => cmd_show(ctx).await,
        ConfigCommand::Path => cmd_path(ctx).await,
        ConfigCommand::Init { local } => cmd_init(local, ctx).await,
    }
}

fn user_config_path(ctx: &Context) -> Result<PathBuf> {
    livewatch_config::user_config_path(ctx.config_dir.as_deref())
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
}

async fn cmd_show(ctx: &Context) -> Result<()> {
    let loaded = &ctx.loaded;
    let config = ctx.config();

    if ctx.json_output {
        let effective = serde_json::json!({
            "twitch": config.twitch(),
            "poller": config.poller(),
            "storage": { "data_dir": ctx.data_dir },
            "display": config.display(),
            "sources": loaded.loaded_from(),
            "warnings": loaded.warnings,
        });
        println!("{}", serde_json::to_string_pretty(&effective)?);
        return Ok(());
    }

    println!("# livewatch Configuration\n");

    println!("Config file search order (later overrides earlier):");
    for source in &loaded.sources {
        let status = if source.loaded { "✓ loaded" } else { "· not found" };
        println!("  {} {}", status, source.path.display());
    }
    println!();

    let twitch = config.twitch();
    println!("Twitch:");
    if twitch.is_client_configured() {
        println!("  client_id: {}", twitch.client_id);
    } else {
        println!("  client_id: (not set; use twitch.client_id or LIVEWATCH_CLIENT_ID)");
    }
    println!("  redirect_uri: {}", twitch.redirect_uri);
    println!("  scope: {}", twitch.scope);
    println!();

    println!("Poller:");
    println!("  interval: {}s", config.poller().interval_secs);
    println!();

    println!("Storage:");
    println!("  data_dir: {}", ctx.data_dir.display());
    println!();

    if !loaded.warnings.is_empty() {
        println!("Warnings:");
        for w in &loaded.warnings {
            println!("  ⚠ {}", w);
        }
        println!();
    }

    if ctx.verbose {
        println!("---\nRaw config:\n");
        if let Ok(toml_str) = config.to_toml() {
            println!("{}", toml_str);
        }
    }

    Ok(())
}

async fn cmd_path(ctx: &Context) -> Result<()> {
    println!("{}", user_config_path(ctx)?.display());
    Ok(())
}

async fn cmd_init(local: bool, ctx: &Context) -> Result<()> {
    let path = if local {
        PathBuf::from(PROJECT_CONFIG_FILE)
    } else {
        user_config_path(ctx)?
    };

    if path.exists() {
        println!("Config file already exists: {}", path.display());
        return Ok(());
    }

    livewatch_config::save_config(&livewatch_config::LivewatchConfig::populated(), &path)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("Created {}", path.display());
    println!("Set twitch.client_id to your application's client id before signing in.");
    Ok(())
}
