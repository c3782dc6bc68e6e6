//! Configuration system for livewatch.
//!
//! Provides TOML-based configuration with:
//! - Twitch application settings (`[twitch]`): client id, redirect URI, endpoints
//! - Poller period (`[poller]`)
//! - Storage location (`[storage]`) and display options (`[display]`)
//! - Config file layering (XDG user config + project-local overrides)
//! - Environment overrides for the client id and data directory

pub mod discovery;
pub mod error;
pub mod types;

pub use discovery::{
    ConfigSource, LoadedConfig, data_dir, load_config, save_config, user_config_path,
};
pub use error::{ConfigError, Result};
pub use types::*;
