use std::fmt;

use serde::{Deserialize, Serialize};

use super::track::TrackId;

/// Playlist identifier. Negative values are assigned client-side to playlists
/// the server has not seen yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaylistId(pub i64);

impl PlaylistId {
    pub fn is_local(self) -> bool {
        self.0 < 0
    }
}

impl fmt::Display for PlaylistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaylistState {
    New,
    #[default]
    Saved,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    pub plid: PlaylistId,
    pub title: String,
    #[serde(default)]
    pub state: PlaylistState,
    #[serde(default, rename = "public")]
    pub is_public: bool,
    /// `None` while the detail fetch is still pending.
    #[serde(default)]
    pub track_ids: Option<Vec<TrackId>>,
}

impl Playlist {
    pub fn new_local(plid: PlaylistId, title: impl Into<String>) -> Self {
        Self {
            plid,
            title: title.into(),
            state: PlaylistState::New,
            is_public: false,
            track_ids: Some(Vec::new()),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.track_ids.is_none()
    }

    pub fn track_count(&self) -> usize {
        self.track_ids.as_ref().map_or(0, Vec::len)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Track,
    Title,
    Artist,
}

impl SortKey {
    pub const ALL: [SortKey; 3] = [SortKey::Track, SortKey::Title, SortKey::Artist];

    pub fn label(self) -> &'static str {
        match self {
            SortKey::Track => "Track #",
            SortKey::Title => "Title",
            SortKey::Artist => "Artist",
        }
    }
}

/// A tab in the playlist strip. The trailing "+" tab is not a playlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabKey {
    Playlist(PlaylistId),
    NewPlaylist,
}
