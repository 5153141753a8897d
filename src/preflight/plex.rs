//! Plex server preflight check.

use super::{Check, CheckStatus};
use crate::services::plex::PlexClient;

/// Check that the server answers the identity handshake.
pub async fn check(client: &PlexClient) -> Check {
    let status = match client.test_connection().await {
        Ok(identity) => CheckStatus::passed(format!(
            "connected to {} (version {})",
            client.base_url(),
            identity.version.as_deref().unwrap_or("unknown")
        )),
        Err(e) => CheckStatus::failed(
            e.to_string(),
            "Check --server / --token or the [plex] section of config.toml",
        ),
    };

    Check {
        name: "Plex",
        status,
    }
}
