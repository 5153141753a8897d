//! Media selection.
//!
//! Turns the enabled selection modes into one ordered list of items that
//! have a file to sync:
//! - on deck, in server order
//! - playlist items, in playlist order
//! - every episode of every show matching the search term
//!
//! Modes are fetched concurrently but always concatenated in that order.
//! Season and episode lookups are bounded by `MAX_CONCURRENT_LOOKUPS`.
//! The first failed lookup aborts the whole selection.

use crate::models::config::SyncOptions;
use crate::models::media::{MediaItem, MediaKind};
use crate::services::plex::MediaServer;
use crate::Result;
use futures::stream::{self, StreamExt, TryStreamExt};

/// Upper bound on concurrent child lookups per level of search expansion.
pub const MAX_CONCURRENT_LOOKUPS: usize = 4;

/// Whether an item passes the watched filter and has a file.
pub fn is_selectable(item: &MediaItem, unwatched_only: bool) -> bool {
    if unwatched_only && item.is_watched() {
        return false;
    }
    !item.file_paths.is_empty()
}

fn keep_selectable(items: Vec<MediaItem>, unwatched_only: bool) -> Vec<MediaItem> {
    items
        .into_iter()
        .filter(|item| is_selectable(item, unwatched_only))
        .collect()
}

/// Select items for every mode enabled in `options`.
pub async fn select<S: MediaServer + ?Sized>(
    server: &S,
    options: &SyncOptions,
) -> Result<Vec<MediaItem>> {
    let unwatched_only = options.unwatched_only;

    let on_deck = async {
        if options.on_deck {
            select_on_deck(server, unwatched_only).await
        } else {
            Ok(Vec::new())
        }
    };
    let playlist = async {
        match options.playlist {
            Some(id) => select_playlist(server, id, unwatched_only).await,
            None => Ok(Vec::new()),
        }
    };
    let search = async {
        match options.search.as_deref() {
            Some(query) => select_search(server, query, unwatched_only).await,
            None => Ok(Vec::new()),
        }
    };

    let (mut items, playlist, search) = tokio::try_join!(on_deck, playlist, search)?;
    items.extend(playlist);
    items.extend(search);

    Ok(items)
}

/// Select from the on-deck queue.
pub async fn select_on_deck<S: MediaServer + ?Sized>(
    server: &S,
    unwatched_only: bool,
) -> Result<Vec<MediaItem>> {
    let items = server.on_deck().await?;
    let total = items.len();
    let selected = keep_selectable(items, unwatched_only);
    tracing::info!("On deck: {} of {} item(s) selected", selected.len(), total);
    Ok(selected)
}

/// Select from a playlist.
pub async fn select_playlist<S: MediaServer + ?Sized>(
    server: &S,
    id: u32,
    unwatched_only: bool,
) -> Result<Vec<MediaItem>> {
    let items = server.playlist(id).await?;
    let total = items.len();
    let selected = keep_selectable(items, unwatched_only);
    tracing::info!("Playlist {}: {} of {} item(s) selected", id, selected.len(), total);
    Ok(selected)
}

/// Select every episode of the shows matching `query`.
pub async fn select_search<S: MediaServer + ?Sized>(
    server: &S,
    query: &str,
    unwatched_only: bool,
) -> Result<Vec<MediaItem>> {
    let results = server.search(query).await?;
    let shows: Vec<MediaItem> = results
        .into_iter()
        .filter(|item| item.kind == MediaKind::Show)
        .collect();
    tracing::debug!("Search \"{}\": {} show(s)", query, shows.len());

    let per_show: Vec<Vec<MediaItem>> = stream::iter(&shows)
        .map(|show| expand_show(server, show, unwatched_only))
        .buffered(MAX_CONCURRENT_LOOKUPS)
        .try_collect()
        .await?;

    let selected: Vec<MediaItem> = per_show.into_iter().flatten().collect();
    tracing::info!("Search \"{}\": {} episode(s) selected", query, selected.len());
    Ok(selected)
}

async fn expand_show<S: MediaServer + ?Sized>(
    server: &S,
    show: &MediaItem,
    unwatched_only: bool,
) -> Result<Vec<MediaItem>> {
    let Some(key) = show.rating_key.as_deref() else {
        tracing::warn!("Skipping show without rating key: {}", show.title);
        return Ok(Vec::new());
    };

    let seasons = server.children(key).await?;
    let per_season: Vec<Vec<MediaItem>> = stream::iter(&seasons)
        .map(|season| expand_season(server, season, unwatched_only))
        .buffered(MAX_CONCURRENT_LOOKUPS)
        .try_collect()
        .await?;

    Ok(per_season.into_iter().flatten().collect())
}

async fn expand_season<S: MediaServer + ?Sized>(
    server: &S,
    season: &MediaItem,
    unwatched_only: bool,
) -> Result<Vec<MediaItem>> {
    let Some(key) = season.rating_key.as_deref() else {
        tracing::warn!("Skipping season without rating key: {}", season.title);
        return Ok(Vec::new());
    };

    let episodes = server.episodes(key).await?;
    Ok(episodes
        .into_iter()
        .filter(|item| item.kind == MediaKind::Episode)
        .map(|mut episode| {
            // Label episodes by the season they were listed under.
            if season.season_index.is_some() {
                episode.season_index = season.season_index;
            }
            episode
        })
        .filter(|item| is_selectable(item, unwatched_only))
        .collect())
}
