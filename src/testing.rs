//! Fakes shared by unit tests.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::{
    http::{ApiError, PlaylistApi},
    model::{Playlist, PlaylistId, PlaylistState, Track, TrackId},
    store::{Dispatch, StoreAction},
};

#[derive(Default)]
pub struct RecordingDispatch {
    actions: Mutex<Vec<StoreAction>>,
}

impl RecordingDispatch {
    pub fn take(&self) -> Vec<StoreAction> {
        std::mem::take(&mut *self.actions.lock().unwrap())
    }
}

impl Dispatch for RecordingDispatch {
    fn dispatch(&self, action: StoreAction) {
        self.actions.lock().unwrap().push(action);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SaveCall {
    pub local_id: PlaylistId,
    pub title: String,
    pub is_public: bool,
    pub track_ids: Vec<TrackId>,
}

impl SaveCall {
    pub fn new(local_id: i64, title: &str, is_public: bool, track_ids: &[i64]) -> Self {
        Self {
            local_id: PlaylistId(local_id),
            title: title.to_string(),
            is_public,
            track_ids: track_ids.iter().copied().map(TrackId).collect(),
        }
    }
}

/// Save requests either resolve with `assigned_id` or fail with a conflict.
pub struct FakeApi {
    pub assigned_id: Option<i64>,
    pub delay: Duration,
    pub calls: Mutex<Vec<SaveCall>>,
}

impl FakeApi {
    pub fn resolving(assigned_id: i64) -> Self {
        Self {
            assigned_id: Some(assigned_id),
            delay: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn rejecting() -> Self {
        Self {
            assigned_id: None,
            delay: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl PlaylistApi for FakeApi {
    async fn fetch_playlists(&self) -> Result<Vec<Playlist>, ApiError> {
        Ok(Vec::new())
    }

    async fn fetch_playlist_detail(
        &self,
        _plid: PlaylistId,
    ) -> Result<(Playlist, Vec<Track>), ApiError> {
        Err(ApiError::Status(StatusCode::NOT_FOUND))
    }

    async fn save_new_playlist(
        &self,
        local_id: PlaylistId,
        title: &str,
        is_public: bool,
        track_ids: &[TrackId],
    ) -> Result<Playlist, ApiError> {
        self.calls.lock().unwrap().push(SaveCall {
            local_id,
            title: title.to_string(),
            is_public,
            track_ids: track_ids.to_vec(),
        });
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match self.assigned_id {
            Some(id) => Ok(Playlist {
                plid: PlaylistId(id),
                title: title.to_string(),
                state: PlaylistState::Saved,
                is_public,
                track_ids: None,
            }),
            None => Err(ApiError::Status(StatusCode::CONFLICT)),
        }
    }
}
