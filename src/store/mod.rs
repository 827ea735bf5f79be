pub mod action;
pub mod state;
pub mod traits;

use tracing::{debug, info, warn};

use crate::model::{Playlist, PlaylistId, PlaylistState, SortKey};

pub use action::{StoreAction, StoreEffect};
pub use state::StoreState;
pub use traits::{Dispatch, StateSnapshot};

pub const NEW_PLAYLIST_TITLE: &str = "New playlist";

#[derive(Debug, Default)]
pub struct Store {
    state: StoreState,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: StoreState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &StoreState {
        &self.state
    }

    pub fn error_message(&self) -> Option<&str> {
        self.state.error_message.as_deref()
    }

    pub fn reduce(&mut self, action: StoreAction) -> Vec<StoreEffect> {
        debug!(?action, "reduce");
        let mut effects = Vec::new();

        match action {
            StoreAction::CreatePlaylist => {
                let plid = PlaylistId(self.state.next_local_id);
                self.state.next_local_id -= 1;
                self.state
                    .playlists
                    .insert(plid, Playlist::new_local(plid, NEW_PLAYLIST_TITLE));
                self.state.open_playlist_ids.push(plid);
                self.state.active_playlist_id = Some(plid);
                info!(%plid, "created local playlist");
            }
            StoreAction::ActivatePlaylist(plid) => self.activate(plid, &mut effects),
            StoreAction::SetPlayingPlaylist(plid) => {
                self.state.playing_playlist_id = Some(plid);
            }
            StoreAction::PlayTrackInPlaylist { plid, idx } => {
                self.state.playing_playlist_id = Some(plid);
                let count = self
                    .state
                    .playlists
                    .get(&plid)
                    .map_or(0, Playlist::track_count);
                if idx < count {
                    info!(%plid, idx, "playing track");
                    self.state.playing_track_idx = Some(idx);
                } else {
                    warn!(%plid, idx, count, "track index out of range");
                    self.state.playing_track_idx = None;
                }
            }
            StoreAction::ClosePlaylistTab(plid) => self.close(plid),
            StoreAction::SortPlaylistTracks { plid, key } => self.sort(plid, key),
            StoreAction::ReplacePlaylist { old, new } => self.replace(old, new),
            StoreAction::ShowError(message) => {
                warn!("{message}");
                self.state.error_message = Some(message);
            }
            StoreAction::DismissError => self.state.error_message = None,
            StoreAction::PlaylistsLoaded(playlists) => {
                for playlist in playlists {
                    let plid = playlist.plid;
                    match self.state.playlists.get_mut(&plid) {
                        Some(existing) => {
                            let track_ids = existing.track_ids.take();
                            *existing = Playlist {
                                track_ids: playlist.track_ids.or(track_ids),
                                ..playlist
                            };
                        }
                        None => {
                            self.state.playlists.insert(plid, playlist);
                        }
                    }
                    if !self.state.open_playlist_ids.contains(&plid) {
                        self.state.open_playlist_ids.push(plid);
                    }
                }
                if self.state.active_playlist_id.is_none() {
                    if let Some(&first) = self.state.open_playlist_ids.first() {
                        self.activate(first, &mut effects);
                    }
                }
            }
            StoreAction::PlaylistDetailLoaded { playlist, tracks } => {
                for track in tracks {
                    self.state.tracks.insert(track.id, track);
                }
                let plid = playlist.plid;
                let playlist = Playlist {
                    track_ids: Some(playlist.track_ids.unwrap_or_default()),
                    ..playlist
                };
                self.state.playlists.insert(plid, playlist);
            }
        }

        effects
    }

    fn activate(&mut self, plid: PlaylistId, effects: &mut Vec<StoreEffect>) {
        let Some(playlist) = self.state.playlists.get(&plid) else {
            warn!(%plid, "cannot activate unknown playlist");
            return;
        };
        if playlist.is_loading() {
            effects.push(StoreEffect::FetchPlaylistDetail(plid));
        }
        if !self.state.open_playlist_ids.contains(&plid) {
            self.state.open_playlist_ids.push(plid);
        }
        self.state.active_playlist_id = Some(plid);
    }

    fn close(&mut self, plid: PlaylistId) {
        let Some(pos) = self.state.open_playlist_ids.iter().position(|&id| id == plid) else {
            return;
        };
        self.state.open_playlist_ids.remove(pos);

        if self.state.active_playlist_id == Some(plid) {
            let ids = &self.state.open_playlist_ids;
            self.state.active_playlist_id = if pos > 0 {
                ids.get(pos - 1).copied()
            } else {
                ids.first().copied()
            };
        }
    }

    fn sort(&mut self, plid: PlaylistId, key: SortKey) {
        let state = &mut self.state;
        let Some(track_ids) = state
            .playlists
            .get_mut(&plid)
            .and_then(|p| p.track_ids.as_mut())
        else {
            debug!(%plid, "nothing to sort");
            return;
        };
        let tracks = &state.tracks;

        track_ids.sort_by_cached_key(|id| match tracks.get(id) {
            None => (true, 0, String::new()),
            Some(track) => match key {
                SortKey::Track => (false, track.track_number.unwrap_or(u32::MAX), String::new()),
                SortKey::Title => (false, 0, track.title.to_lowercase()),
                SortKey::Artist => (false, 0, track.artist_or_unknown().to_lowercase()),
            },
        });
        info!(%plid, key = key.label(), "sorted playlist");
    }

    fn replace(&mut self, old: PlaylistId, new: Playlist) {
        let Some(previous) = self.state.playlists.remove(&old) else {
            warn!(%old, new = %new.plid, "cannot replace unknown playlist");
            return;
        };
        let new_id = new.plid;
        let playlist = Playlist {
            state: PlaylistState::Saved,
            track_ids: new.track_ids.or(previous.track_ids),
            ..new
        };
        self.state.playlists.insert(new_id, playlist);

        for id in &mut self.state.open_playlist_ids {
            if *id == old {
                *id = new_id;
            }
        }
        if self.state.active_playlist_id == Some(old) {
            self.state.active_playlist_id = Some(new_id);
        }
        if self.state.playing_playlist_id == Some(old) {
            self.state.playing_playlist_id = Some(new_id);
        }
        info!(%old, new = %new_id, "replaced playlist");
    }
}
