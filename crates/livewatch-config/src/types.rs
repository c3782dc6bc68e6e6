//! Configuration types mapping to the TOML schema.
//!
//! ```toml
//! [twitch]
//! client_id = "abc123"
//! redirect_uri = "http://localhost:17563/"
//!
//! [poller]
//! interval_secs = 300
//!
//! [storage]
//! data_dir = "/home/me/.local/share/livewatch"
//!
//! [display]
//! thumbnail_size = 80
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{ConfigError, Result};

/// Client id shipped in the default config; the authenticator refuses it.
pub const PLACEHOLDER_CLIENT_ID: &str = "YOUR_TWITCH_CLIENT_ID";

/// Default redirect URI for the loopback capture listener.
pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:17563/";

/// Scope needed to read followed live channels.
pub const FOLLOWS_SCOPE: &str = "user:read:follows";

/// Default poll period: five minutes.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5 * 60;

// ─────────────────────────────────────────────────────────────────────────────
// Top-level Config
// ─────────────────────────────────────────────────────────────────────────────

/// Root configuration structure.
///
/// All sections are optional so that partial configs (e.g., project-local
/// overrides) can be loaded and merged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LivewatchConfig {
    pub twitch: Option<TwitchConfig>,
    pub poller: Option<PollerConfig>,
    pub storage: Option<StorageConfig>,
    pub display: Option<DisplayConfig>,
}

impl LivewatchConfig {
    /// Create an empty config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// A config with every section filled in with defaults, for `config init`.
    pub fn populated() -> Self {
        Self {
            twitch: Some(TwitchConfig::default()),
            poller: Some(PollerConfig::default()),
            storage: Some(StorageConfig::default()),
            display: Some(DisplayConfig::default()),
        }
    }

    /// Merge another config on top of this one (other takes priority).
    pub fn merge(&mut self, other: LivewatchConfig) {
        if other.twitch.is_some() {
            self.twitch = other.twitch;
        }
        if other.poller.is_some() {
            self.poller = other.poller;
        }
        if other.storage.is_some() {
            self.storage = other.storage;
        }
        if other.display.is_some() {
            self.display = other.display;
        }
    }

    /// Effective `[twitch]` section.
    pub fn twitch(&self) -> TwitchConfig {
        self.twitch.clone().unwrap_or_default()
    }

    /// Effective `[poller]` section.
    pub fn poller(&self) -> PollerConfig {
        self.poller.clone().unwrap_or_default()
    }

    /// Effective `[storage]` section.
    pub fn storage(&self) -> StorageConfig {
        self.storage.clone().unwrap_or_default()
    }

    /// Effective `[display]` section.
    pub fn display(&self) -> DisplayConfig {
        self.display.clone().unwrap_or_default()
    }

    /// Check values that would otherwise fail later and far from the file.
    pub fn validate(&self) -> Result<()> {
        let twitch = self.twitch();
        let redirect = url::Url::parse(&twitch.redirect_uri).map_err(|e| {
            ConfigError::InvalidValue {
                field: "twitch.redirect_uri".to_string(),
                reason: e.to_string(),
            }
        })?;
        if !matches!(redirect.scheme(), "http" | "https") || redirect.host_str().is_none() {
            return Err(ConfigError::InvalidValue {
                field: "twitch.redirect_uri".to_string(),
                reason: "must be an http(s) URL with a host".to_string(),
            });
        }

        for (field, value) in [
            ("twitch.authorize_url", &twitch.authorize_url),
            ("twitch.id_base_url", &twitch.id_base_url),
            ("twitch.helix_base_url", &twitch.helix_base_url),
        ] {
            url::Url::parse(value).map_err(|e| ConfigError::InvalidValue {
                field: field.to_string(),
                reason: e.to_string(),
            })?;
        }

        if self.poller().interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "poller.interval_secs".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Sections
// ─────────────────────────────────────────────────────────────────────────────

/// Twitch application registration and endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TwitchConfig {
    /// Application client id from the Twitch developer console.
    pub client_id: String,

    /// Redirect URI registered for the application. The loopback listener
    /// binds to its host and port.
    pub redirect_uri: String,

    pub scope: String,

    /// Ask Twitch to show the consent screen even if already granted.
    pub force_verify: bool,

    pub authorize_url: String,
    pub id_base_url: String,
    pub helix_base_url: String,
}

impl Default for TwitchConfig {
    fn default() -> Self {
        Self {
            client_id: PLACEHOLDER_CLIENT_ID.to_string(),
            redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
            scope: FOLLOWS_SCOPE.to_string(),
            force_verify: true,
            authorize_url: "https://id.twitch.tv/oauth2/authorize".to_string(),
            id_base_url: "https://id.twitch.tv/oauth2".to_string(),
            helix_base_url: "https://api.twitch.tv/helix".to_string(),
        }
    }
}

impl TwitchConfig {
    /// Whether the client id is missing or still the shipped placeholder.
    pub fn is_client_configured(&self) -> bool {
        let id = self.client_id.trim();
        !id.is_empty() && id != PLACEHOLDER_CLIENT_ID
    }
}

/// Background poller settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollerConfig {
    /// Seconds between firings.
    pub interval_secs: u64,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_POLL_INTERVAL_SECS,
        }
    }
}

impl PollerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

/// Where the key-value store and logs live.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Data directory. Default: platform data dir + `livewatch`.
    ///
    /// Can be overridden by the `LIVEWATCH_DATA_DIR` environment variable.
    pub data_dir: Option<PathBuf>,
}

/// Rendering options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Pixel size substituted into thumbnail URL templates.
    pub thumbnail_size: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { thumbnail_size: 80 }
    }
}
