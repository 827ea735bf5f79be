use crate::model::{Playlist, PlaylistId, Track, TrackId};

use super::action::StoreAction;

/// Read access to the application state.
pub trait StateSnapshot {
    fn open_playlist_ids(&self) -> &[PlaylistId];
    fn active_playlist_id(&self) -> Option<PlaylistId>;
    fn playlist(&self, plid: PlaylistId) -> Option<&Playlist>;
    fn playing_playlist_id(&self) -> Option<PlaylistId>;
    fn playing_track_idx(&self) -> Option<usize>;
    fn track(&self, id: TrackId) -> Option<&Track>;
}

/// Fire-and-forget write access to the application state.
pub trait Dispatch: Send + Sync {
    fn dispatch(&self, action: StoreAction);
}
