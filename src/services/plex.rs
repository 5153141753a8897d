//! Plex Media Server API client.

use crate::error::PlexCall;
use crate::models::config::PlexConfig;
use crate::models::media::{MediaItem, MediaKind};
use crate::{Error, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// The media-server lookups the selector needs.
#[async_trait]
pub trait MediaServer: Send + Sync {
    /// Items on the on-deck queue.
    async fn on_deck(&self) -> Result<Vec<MediaItem>>;

    /// Items of a playlist.
    async fn playlist(&self, id: u32) -> Result<Vec<MediaItem>>;

    /// Library search by text.
    async fn search(&self, query: &str) -> Result<Vec<MediaItem>>;

    /// Children of a container (the seasons of a show).
    async fn children(&self, rating_key: &str) -> Result<Vec<MediaItem>>;

    /// Episodes of a season.
    async fn episodes(&self, rating_key: &str) -> Result<Vec<MediaItem>>;
}

/// Top-level response wrapper.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(rename = "MediaContainer")]
    media_container: T,
}

/// Metadata list container.
#[derive(Debug, Default, Deserialize)]
pub struct MediaContainer {
    #[serde(rename = "Metadata", default)]
    pub metadata: Vec<Metadata>,
}

/// Library item as returned by the server.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub title: String,
    pub rating_key: Option<String>,
    pub key: Option<String>,
    pub index: Option<u32>,
    pub parent_index: Option<u32>,
    #[serde(default)]
    pub view_count: u32,
    #[serde(rename = "Media", default)]
    pub media: Vec<Media>,
}

/// One encoding of an item.
#[derive(Debug, Deserialize)]
pub struct Media {
    #[serde(rename = "Part", default)]
    pub parts: Vec<Part>,
}

/// One file of an encoding.
#[derive(Debug, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub file: String,
}

/// Server identity, returned by the handshake.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerIdentity {
    pub machine_identifier: Option<String>,
    pub version: Option<String>,
}

/// Flatten every part file of every encoding, dropping empty paths.
pub fn resolve_file_paths(media: &[Media]) -> Vec<String> {
    media
        .iter()
        .flat_map(|m| m.parts.iter())
        .filter(|p| !p.file.is_empty())
        .map(|p| p.file.clone())
        .collect()
}

/// Recover a rating key from a `/library/metadata/<id>[/children]` key.
pub fn rating_key_from_key(key: &str) -> Option<String> {
    let re = regex::Regex::new(r"^/library/metadata/([0-9]+)(?:/children)?$").ok()?;
    re.captures(key).map(|caps| caps[1].to_string())
}

impl From<Metadata> for MediaItem {
    fn from(meta: Metadata) -> Self {
        let kind = MediaKind::from_plex(&meta.kind);
        let (season_index, episode_index) = match kind {
            MediaKind::Episode => (meta.parent_index, meta.index),
            MediaKind::Season => (meta.index, None),
            _ => (None, meta.index),
        };
        let rating_key = meta
            .rating_key
            .filter(|k| !k.is_empty())
            .or_else(|| meta.key.as_deref().and_then(rating_key_from_key));

        MediaItem {
            kind,
            title: meta.title,
            rating_key,
            season_index,
            episode_index,
            view_count: meta.view_count,
            file_paths: resolve_file_paths(&meta.media),
        }
    }
}

/// Plex API client.
pub struct PlexClient {
    config: PlexConfig,
    client: reqwest::Client,
}

impl PlexClient {
    /// Create a new Plex client.
    pub fn new(config: PlexConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self { config, client })
    }

    /// Server base URL.
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Build a request with JSON output and token authentication.
    fn build_request(&self, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), path);
        let request = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json");
        match self.config.token.as_deref() {
            Some(token) => request.header("X-Plex-Token", token),
            None => request,
        }
    }

    /// Fetch a path and decode its `MediaContainer`.
    async fn get_container<T: DeserializeOwned>(&self, path: &str) -> reqwest::Result<T> {
        tracing::debug!("GET {}", path);
        let envelope: Envelope<T> = self
            .build_request(path)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(envelope.media_container)
    }

    /// Fetch a metadata list, tagging failures with the lookup that failed.
    async fn get_items(&self, call: PlexCall, path: &str) -> Result<Vec<MediaItem>> {
        let container: MediaContainer = self
            .get_container(path)
            .await
            .map_err(|e| Error::request(call, e))?;

        tracing::debug!("{} item(s) from {}", container.metadata.len(), path);
        Ok(container.metadata.into_iter().map(MediaItem::from).collect())
    }

    /// Verify the server is reachable and the token is accepted.
    pub async fn test_connection(&self) -> Result<ServerIdentity> {
        self.get_container("/identity")
            .await
            .map_err(|e| Error::PlexConnection(e.to_string()))
    }
}

#[async_trait]
impl MediaServer for PlexClient {
    async fn on_deck(&self) -> Result<Vec<MediaItem>> {
        self.get_items(PlexCall::OnDeck, "/library/onDeck").await
    }

    async fn playlist(&self, id: u32) -> Result<Vec<MediaItem>> {
        self.get_items(PlexCall::Playlist(id), &format!("/playlists/{}/items", id))
            .await
    }

    async fn search(&self, query: &str) -> Result<Vec<MediaItem>> {
        self.get_items(
            PlexCall::Search(query.to_string()),
            &format!("/search?query={}", urlencoding::encode(query)),
        )
        .await
    }

    async fn children(&self, rating_key: &str) -> Result<Vec<MediaItem>> {
        self.get_items(
            PlexCall::Seasons(rating_key.to_string()),
            &format!("/library/metadata/{}/children", rating_key),
        )
        .await
    }

    async fn episodes(&self, rating_key: &str) -> Result<Vec<MediaItem>> {
        self.get_items(
            PlexCall::Episodes(rating_key.to_string()),
            &format!("/library/metadata/{}/children", rating_key),
        )
        .await
    }
}
