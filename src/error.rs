//! Error types for plexsync.

use std::fmt;
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// A single lookup against the media server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlexCall {
    OnDeck,
    Playlist(u32),
    Search(String),
    Seasons(String),
    Episodes(String),
}

impl fmt::Display for PlexCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlexCall::OnDeck => write!(f, "on deck"),
            PlexCall::Playlist(id) => write!(f, "playlist {}", id),
            PlexCall::Search(query) => write!(f, "search \"{}\"", query),
            PlexCall::Seasons(key) => write!(f, "seasons of {}", key),
            PlexCall::Episodes(key) => write!(f, "episodes of {}", key),
        }
    }
}

/// Main error type for plexsync.
#[derive(Error, Debug)]
pub enum Error {
    // Connection errors
    #[error("Error connecting to plex: {0}")]
    PlexConnection(String),

    #[error("Error getting {call}: {message}")]
    PlexRequest { call: PlexCall, message: String },

    // Transfer errors
    #[error("Nothing to copy")]
    NothingToCopy,

    #[error("rsync not found. Install it: sudo apt install rsync")]
    RsyncNotFound,

    // Config errors
    #[error("Invalid config file: {0}")]
    InvalidConfig(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // HTTP errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Wrap a failure of one media-server lookup.
    pub fn request<S: ToString>(call: PlexCall, err: S) -> Self {
        Error::PlexRequest {
            call,
            message: err.to_string(),
        }
    }
}
