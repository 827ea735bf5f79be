use crate::model::{Playlist, PlaylistId, SortKey, Track};

#[derive(Debug, Clone, PartialEq)]
pub enum StoreAction {
    CreatePlaylist,
    ActivatePlaylist(PlaylistId),
    SetPlayingPlaylist(PlaylistId),
    PlayTrackInPlaylist { plid: PlaylistId, idx: usize },
    ClosePlaylistTab(PlaylistId),
    SortPlaylistTracks { plid: PlaylistId, key: SortKey },
    /// Swap a local playlist for the record the server assigned to it.
    ReplacePlaylist { old: PlaylistId, new: Playlist },
    ShowError(String),
    DismissError,
    PlaylistsLoaded(Vec<Playlist>),
    PlaylistDetailLoaded { playlist: Playlist, tracks: Vec<Track> },
}

/// Work the store cannot do itself and hands back to the app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEffect {
    FetchPlaylistDetail(PlaylistId),
}
