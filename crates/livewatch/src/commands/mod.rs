//! CLI command handlers.

pub mod auth;
pub mod config;
pub mod daemon;
pub mod open;
pub mod poll;
pub mod streams;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use livewatch_client::{HelixClient, SharedStreamApi};
use livewatch_config::{LivewatchConfig, LoadedConfig};
use livewatch_domain::{BackgroundHandle, BackgroundService, Popup};
use livewatch_oauth::{Authenticator, LoopbackCapture, OAuthConfig, RedirectCapture};
use livewatch_store::{FileStore, StateStore};

use crate::capture::PastedRedirect;
use crate::render::TerminalView;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Output as JSON for scripting.
    pub json_output: bool,
    /// Verbose output enabled.
    pub verbose: bool,
    /// Config directory given on the command line, if any.
    pub config_dir: Option<PathBuf>,
    /// Merged configuration and where it came from.
    pub loaded: LoadedConfig,
    /// Where the store and logs live.
    pub data_dir: PathBuf,
}

impl Context {
    pub fn config(&self) -> &LivewatchConfig {
        &self.loaded.config
    }

    /// API client configured from `[twitch]`.
    pub fn api(&self) -> Result<SharedStreamApi> {
        let twitch = self.config().twitch();
        let client = HelixClient::builder()
            .client_id(twitch.client_id.trim())
            .id_base_url(twitch.id_base_url)
            .helix_base_url(twitch.helix_base_url)
            .build()
            .context("Failed to create API client")?;
        Ok(Arc::new(client))
    }

    /// Session and snapshot storage in the data directory.
    pub fn state(&self) -> StateStore {
        StateStore::new(Arc::new(FileStore::new(&self.data_dir)))
    }

    /// Sign-in flow using the loopback listener, or stdin when `manual`.
    pub fn authenticator(&self, api: SharedStreamApi, manual: bool) -> Result<Authenticator> {
        let config = OAuthConfig::from(&self.config().twitch());
        let capture: Arc<dyn RedirectCapture> = if manual {
            Arc::new(PastedRedirect::new())
        } else {
            Arc::new(
                LoopbackCapture::new(&config.redirect_uri)
                    .context("Invalid twitch.redirect_uri")?,
            )
        };
        Ok(Authenticator::new(config, api, self.state(), capture))
    }

    /// Popup wired to the terminal, with sign-in served by a background task.
    pub fn popup(&self, manual: bool) -> Result<Popup<TerminalView>> {
        let api = self.api()?;
        let authenticator = self.authenticator(api.clone(), manual)?;
        let background =
            BackgroundHandle::spawn(Arc::new(BackgroundService::new(Arc::new(authenticator))));

        Ok(Popup::new(
            api,
            self.state(),
            background,
            TerminalView::new(self.json_output),
        )
        .with_thumbnail_size(self.config().display().thumbnail_size))
    }
}
