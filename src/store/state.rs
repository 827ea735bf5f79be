use std::collections::HashMap;

use crate::model::{Playlist, PlaylistId, Track, TrackId};

use super::traits::StateSnapshot;

#[derive(Debug, Clone)]
pub struct StoreState {
    pub open_playlist_ids: Vec<PlaylistId>,
    pub active_playlist_id: Option<PlaylistId>,
    pub playlists: HashMap<PlaylistId, Playlist>,
    pub playing_playlist_id: Option<PlaylistId>,
    pub playing_track_idx: Option<usize>,
    pub tracks: HashMap<TrackId, Track>,
    pub error_message: Option<String>,
    pub next_local_id: i64,
}

impl Default for StoreState {
    fn default() -> Self {
        Self {
            open_playlist_ids: Vec::new(),
            active_playlist_id: None,
            playlists: HashMap::new(),
            playing_playlist_id: None,
            playing_track_idx: None,
            tracks: HashMap::new(),
            error_message: None,
            next_local_id: -1,
        }
    }
}

impl StateSnapshot for StoreState {
    fn open_playlist_ids(&self) -> &[PlaylistId] {
        &self.open_playlist_ids
    }

    fn active_playlist_id(&self) -> Option<PlaylistId> {
        self.active_playlist_id
    }

    fn playlist(&self, plid: PlaylistId) -> Option<&Playlist> {
        self.playlists.get(&plid)
    }

    fn playing_playlist_id(&self) -> Option<PlaylistId> {
        self.playing_playlist_id
    }

    fn playing_track_idx(&self) -> Option<usize> {
        self.playing_track_idx
    }

    fn track(&self, id: TrackId) -> Option<&Track> {
        self.tracks.get(&id)
    }
}
