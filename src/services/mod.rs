//! Clients for the external collaborators: the Plex server and rsync.

pub mod plex;
pub mod rsync;
