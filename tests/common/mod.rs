//! In-memory media server shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use plexsync::error::PlexCall;
use plexsync::models::media::{MediaItem, MediaKind};
use plexsync::services::plex::MediaServer;
use plexsync::{Error, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Media server backed by fixed responses. Unknown keys fail like a 404.
#[derive(Default)]
pub struct FakeServer {
    pub on_deck: Vec<MediaItem>,
    pub playlists: HashMap<u32, Vec<MediaItem>>,
    pub searches: HashMap<String, Vec<MediaItem>>,
    pub children: HashMap<String, Vec<MediaItem>>,
    pub fail_on_deck: bool,
    /// Time each episode lookup takes.
    pub episode_delay: Option<Duration>,
    calls: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeServer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Most episode lookups that were running at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn record(&self, call: &PlexCall) {
        self.calls.lock().unwrap().push(call.to_string());
    }

    fn lookup<K>(&self, map: &HashMap<K, Vec<MediaItem>>, key: &K, call: PlexCall) -> Result<Vec<MediaItem>>
    where
        K: std::hash::Hash + Eq,
    {
        self.record(&call);
        map.get(key)
            .cloned()
            .ok_or_else(|| Error::request(call, "404 Not Found"))
    }
}

#[async_trait]
impl MediaServer for FakeServer {
    async fn on_deck(&self) -> Result<Vec<MediaItem>> {
        self.record(&PlexCall::OnDeck);
        if self.fail_on_deck {
            return Err(Error::request(PlexCall::OnDeck, "connection refused"));
        }
        Ok(self.on_deck.clone())
    }

    async fn playlist(&self, id: u32) -> Result<Vec<MediaItem>> {
        self.lookup(&self.playlists, &id, PlexCall::Playlist(id))
    }

    async fn search(&self, query: &str) -> Result<Vec<MediaItem>> {
        self.lookup(
            &self.searches,
            &query.to_string(),
            PlexCall::Search(query.to_string()),
        )
    }

    async fn children(&self, rating_key: &str) -> Result<Vec<MediaItem>> {
        self.lookup(
            &self.children,
            &rating_key.to_string(),
            PlexCall::Seasons(rating_key.to_string()),
        )
    }

    async fn episodes(&self, rating_key: &str) -> Result<Vec<MediaItem>> {
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);
        if let Some(delay) = self.episode_delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        self.lookup(
            &self.children,
            &rating_key.to_string(),
            PlexCall::Episodes(rating_key.to_string()),
        )
    }
}

fn files(paths: &[&str]) -> Vec<String> {
    paths.iter().map(|p| p.to_string()).collect()
}

pub fn episode(title: &str, season: u32, episode: u32, views: u32, paths: &[&str]) -> MediaItem {
    MediaItem {
        kind: MediaKind::Episode,
        title: title.to_string(),
        rating_key: None,
        season_index: Some(season),
        episode_index: Some(episode),
        view_count: views,
        file_paths: files(paths),
    }
}

pub fn movie(title: &str, views: u32, paths: &[&str]) -> MediaItem {
    MediaItem {
        kind: MediaKind::Movie,
        title: title.to_string(),
        rating_key: None,
        season_index: None,
        episode_index: None,
        view_count: views,
        file_paths: files(paths),
    }
}

pub fn show(title: &str, key: &str) -> MediaItem {
    MediaItem {
        kind: MediaKind::Show,
        title: title.to_string(),
        rating_key: Some(key.to_string()),
        season_index: None,
        episode_index: None,
        view_count: 0,
        file_paths: vec![],
    }
}

pub fn season(index: u32, key: &str) -> MediaItem {
    MediaItem {
        kind: MediaKind::Season,
        title: format!("Season {}", index),
        rating_key: Some(key.to_string()),
        season_index: Some(index),
        episode_index: None,
        view_count: 0,
        file_paths: vec![],
    }
}
