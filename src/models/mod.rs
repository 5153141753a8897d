//! Data models.

pub mod config;
pub mod media;
pub mod transfer;
