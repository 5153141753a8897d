//! Command line argument definitions.

use crate::models::config::{Config, PlexConfig, SyncOptions};
use crate::models::transfer::Destination;
use clap::Parser;

/// Plexsync - Copy Plex media to a remote host with rsync
#[derive(Parser, Debug)]
#[command(name = "plexsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Destination host
    #[arg(long = "dest_host", alias = "dest-host", value_name = "HOST")]
    pub dest_host: Option<String>,

    /// Destination path
    #[arg(long = "dest_path", alias = "dest-path", value_name = "PATH")]
    pub dest_path: Option<String>,

    /// Playlist to synchronize (0 disables)
    #[arg(long, default_value_t = 0, value_name = "ID")]
    pub playlist: u32,

    /// Sync on-deck items
    #[arg(long)]
    pub ondeck: bool,

    /// Sync all episodes of matching shows
    #[arg(long, default_value = "", value_name = "TERM")]
    pub search: String,

    /// Sync only unwatched items
    #[arg(long = "unwatched_only", alias = "unwatched-only")]
    pub unwatched_only: bool,

    /// Plex server URL
    #[arg(long, value_name = "URL")]
    pub server: Option<String>,

    /// Plex token
    #[arg(long, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Print the table and rsync command without copying
    #[arg(long)]
    pub dry_run: bool,

    /// Skip preflight checks
    #[arg(long)]
    pub skip_preflight: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Resolve the run's options: flags win over the config file.
    pub fn sync_options(&self, config: &Config) -> SyncOptions {
        let host = self
            .dest_host
            .clone()
            .unwrap_or_else(|| config.destination.host.clone());
        let path = self
            .dest_path
            .clone()
            .unwrap_or_else(|| config.destination.path.clone());

        SyncOptions {
            on_deck: self.ondeck,
            playlist: Some(self.playlist).filter(|id| *id != 0),
            search: Some(self.search.clone()).filter(|s| !s.is_empty()),
            unwatched_only: self.unwatched_only,
            destination: Destination::new(host, path),
        }
    }

    /// Plex connection settings with flag overrides applied.
    pub fn plex_config(&self, config: &Config) -> PlexConfig {
        let mut plex = config.plex.clone();
        if let Some(ref server) = self.server {
            plex.base_url = server.clone();
        }
        if let Some(ref token) = self.token {
            plex.token = Some(token.clone());
        }
        plex
    }
}
