//! Plexsync Library
//!
//! Select media from a Plex server (on deck, a playlist or a search) and copy
//! the underlying files to a remote host with rsync.

pub mod cli;
pub mod core;
pub mod error;
pub mod models;
pub mod preflight;
pub mod services;

pub use error::{Error, Result};
