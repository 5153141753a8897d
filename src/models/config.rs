//! Configuration model.

use super::transfer::Destination;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_PLEX_URL: &str = "http://192.168.1.7:32400";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_DEST_HOST: &str = "passport";
pub const DEFAULT_DEST_PATH: &str = "/DataVolume/plexsync/";

/// Application configuration, read from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Plex server configuration.
    pub plex: PlexConfig,
    /// Default transfer destination.
    pub destination: DestinationConfig,
}

/// Plex server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlexConfig {
    /// Server base URL.
    pub base_url: String,
    /// X-Plex-Token.
    pub token: Option<String>,
    /// Request timeout in seconds.
    pub timeout: u64,
}

/// Destination configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DestinationConfig {
    pub host: String,
    pub path: String,
}

impl Default for PlexConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_PLEX_URL.to_string(),
            token: std::env::var("PLEX_TOKEN").ok().filter(|t| !t.is_empty()),
            timeout: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Default for DestinationConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_DEST_HOST.to_string(),
            path: DEFAULT_DEST_PATH.to_string(),
        }
    }
}

impl From<DestinationConfig> for Destination {
    fn from(config: DestinationConfig) -> Self {
        Destination::new(config.host, config.path)
    }
}

/// Everything one sync run needs, fixed at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOptions {
    /// Sync the on-deck queue.
    pub on_deck: bool,
    /// Playlist to sync.
    pub playlist: Option<u32>,
    /// Search term whose shows are synced.
    pub search: Option<String>,
    /// Skip items with a non-zero view count.
    pub unwatched_only: bool,
    /// Where files are copied.
    pub destination: Destination,
}

impl SyncOptions {
    pub fn has_any_mode(&self) -> bool {
        self.on_deck || self.playlist.is_some() || self.search.is_some()
    }
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            on_deck: false,
            playlist: None,
            search: None,
            unwatched_only: false,
            destination: DestinationConfig::default().into(),
        }
    }
}

/// Get the configuration directory path.
fn dirs_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("plexsync")
}

/// Path of the config file.
pub fn config_file_path() -> PathBuf {
    dirs_config_path().join("config.toml")
}

/// Load configuration from the default location.
pub fn load_config() -> Config {
    let path = config_file_path();
    match load_config_from(&path) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Ignoring config file {}: {}", path.display(), e);
            Config::default()
        }
    }
}

/// Load configuration from a file. A missing file yields the defaults.
pub fn load_config_from(path: &Path) -> crate::Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)?;
    let mut config: Config =
        toml::from_str(&content).map_err(|e| crate::Error::InvalidConfig(e.to_string()))?;

    if config.plex.token.is_none() {
        config.plex.token = std::env::var("PLEX_TOKEN").ok().filter(|t| !t.is_empty());
    }

    Ok(config)
}
