//! Finding and layering config files.
//!
//! Later layers win:
//! 1. `<config dir>/config.toml`, where the config dir is `--config-dir`,
//!    `LIVEWATCH_CONFIG_DIR` or the platform config dir + `livewatch`
//! 2. `./livewatch.toml`
//! 3. `LIVEWATCH_CLIENT_ID` and `LIVEWATCH_DATA_DIR`
//!
//! A layer that exists but cannot be read or parsed is skipped with a
//! warning. The merged result must pass [`LivewatchConfig::validate`].

use std::path::{Path, PathBuf};

use crate::{ConfigError, LivewatchConfig, Result, StorageConfig, TwitchConfig};

const APP_NAME: &str = "livewatch";
const USER_CONFIG_FILE: &str = "config.toml";
const PROJECT_CONFIG_FILE: &str = "livewatch.toml";

const CONFIG_DIR_ENV: &str = "LIVEWATCH_CONFIG_DIR";
const CLIENT_ID_ENV: &str = "LIVEWATCH_CLIENT_ID";
const DATA_DIR_ENV: &str = "LIVEWATCH_DATA_DIR";

/// One file layer that was looked at.
#[derive(Debug, Clone)]
pub struct ConfigSource {
    pub path: PathBuf,
    pub loaded: bool,
}

/// Merged configuration plus where it came from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: LivewatchConfig,
    /// Every layer checked, lowest precedence first.
    pub sources: Vec<ConfigSource>,
    pub warnings: Vec<String>,
}

impl LoadedConfig {
    pub fn loaded_from(&self) -> Vec<&Path> {
        self.sources
            .iter()
            .filter_map(|s| s.loaded.then_some(s.path.as_path()))
            .collect()
    }
}

/// Discover, merge, apply the environment and validate.
///
/// `config_dir` replaces the user config directory when given.
pub fn load_config(config_dir: Option<&Path>) -> Result<LoadedConfig> {
    load_layers(
        user_config_path(config_dir),
        PathBuf::from(PROJECT_CONFIG_FILE),
        |key| std::env::var(key).ok(),
    )
}

/// Path of the user config file for an optional directory override.
pub fn user_config_path(config_dir: Option<&Path>) -> Option<PathBuf> {
    let dir = match config_dir {
        Some(dir) => dir.to_path_buf(),
        None => match std::env::var(CONFIG_DIR_ENV) {
            Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => dirs::config_dir()?.join(APP_NAME),
        },
    };
    Some(dir.join(USER_CONFIG_FILE))
}

/// Write `config` as TOML, creating parent directories.
pub fn save_config(config: &LivewatchConfig, path: &Path) -> Result<()> {
    let write_error = |path: &Path, source| ConfigError::WriteFile {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| write_error(parent, e))?;
    }
    std::fs::write(path, config.to_toml()?).map_err(|e| write_error(path, e))
}

/// Where the store and logs live: `[storage] data_dir` (which already
/// carries `LIVEWATCH_DATA_DIR`), else the platform data dir, else
/// `./.livewatch`.
pub fn data_dir(config: &LivewatchConfig) -> PathBuf {
    config
        .storage()
        .data_dir
        .or_else(|| dirs::data_dir().map(|d| d.join(APP_NAME)))
        .unwrap_or_else(|| PathBuf::from(".livewatch"))
}

fn load_layers(
    user_path: Option<PathBuf>,
    project_path: PathBuf,
    env: impl Fn(&str) -> Option<String>,
) -> Result<LoadedConfig> {
    let mut config = LivewatchConfig::new();
    let mut warnings = Vec::new();

    let sources: Vec<ConfigSource> = user_path
        .into_iter()
        .chain([project_path])
        .map(|path| {
            let loaded = merge_layer(&mut config, &path, &mut warnings);
            ConfigSource { path, loaded }
        })
        .collect();

    apply_env_overrides(&mut config, env);
    config.validate()?;

    Ok(LoadedConfig {
        config,
        sources,
        warnings,
    })
}

/// Merge the file at `path` if it exists. Returns whether it was used.
fn merge_layer(config: &mut LivewatchConfig, path: &Path, warnings: &mut Vec<String>) -> bool {
    if !path.is_file() {
        return false;
    }
    match read_layer(path) {
        Ok(layer) => {
            config.merge(layer);
            true
        }
        Err(e) => {
            warnings.push(format!("Skipped {}: {}", path.display(), e));
            false
        }
    }
}

fn read_layer(path: &Path) -> Result<LivewatchConfig> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.display().to_string(),
        source,
    })?;
    LivewatchConfig::from_toml(&text)
}

fn apply_env_overrides(config: &mut LivewatchConfig, env: impl Fn(&str) -> Option<String>) {
    let value = |key: &str| env(key).filter(|v: &String| !v.is_empty());

    if let Some(client_id) = value(CLIENT_ID_ENV) {
        config
            .twitch
            .get_or_insert_with(TwitchConfig::default)
            .client_id = client_id;
    }
    if let Some(dir) = value(DATA_DIR_ENV) {
        config
            .storage
            .get_or_insert_with(StorageConfig::default)
            .data_dir = Some(PathBuf::from(dir));
    }
}
