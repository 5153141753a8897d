//! Media-related data models.

/// Kind of a library item, as reported by the server's `type` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaKind {
    Episode,
    Movie,
    Show,
    Season,
    Other(String),
}

impl MediaKind {
    /// Parse the server's lowercase type string.
    pub fn from_plex(value: &str) -> Self {
        match value {
            "episode" => MediaKind::Episode,
            "movie" => MediaKind::Movie,
            "show" => MediaKind::Show,
            "season" => MediaKind::Season,
            other => MediaKind::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaKind::Episode => write!(f, "episode"),
            MediaKind::Movie => write!(f, "movie"),
            MediaKind::Show => write!(f, "show"),
            MediaKind::Season => write!(f, "season"),
            MediaKind::Other(other) => write!(f, "{}", other),
        }
    }
}

/// A library item resolved down to its file paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaItem {
    /// Item kind.
    pub kind: MediaKind,
    /// Display title.
    pub title: String,
    /// Server identifier used to fetch children.
    pub rating_key: Option<String>,
    /// Season number (episodes and seasons).
    pub season_index: Option<u32>,
    /// Episode number (episodes only).
    pub episode_index: Option<u32>,
    /// How many times the item has been watched.
    pub view_count: u32,
    /// Every non-empty part file, in server order.
    pub file_paths: Vec<String>,
}

impl MediaItem {
    /// Whether the item has been watched at least once.
    pub fn is_watched(&self) -> bool {
        self.view_count > 0
    }

    /// First resolved file path, the one that gets synced.
    pub fn primary_file(&self) -> Option<&str> {
        self.file_paths.first().map(String::as_str)
    }
}

/// One line of the sync report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncRow {
    /// `S01E02` for episodes, empty for movies.
    pub label: String,
    pub title: String,
    pub filename: String,
}

impl SyncRow {
    /// Build the report row for an item.
    ///
    /// Only episodes and movies are reported; items without a file have no row.
    pub fn for_item(item: &MediaItem) -> Option<Self> {
        let filename = item.primary_file()?.to_string();
        let label = match item.kind {
            MediaKind::Episode => episode_label(
                item.season_index.unwrap_or(0),
                item.episode_index.unwrap_or(0),
            ),
            MediaKind::Movie => String::new(),
            _ => return None,
        };

        Some(Self {
            label,
            title: item.title.clone(),
            filename,
        })
    }
}

/// Format an episode label such as `S01E02`.
pub fn episode_label(season: u32, episode: u32) -> String {
    format!("S{:02}E{:02}", season, episode)
}
