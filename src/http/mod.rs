pub mod error;

use async_trait::async_trait;
use reqwest::{
    Client, Response,
    header::{AUTHORIZATION, HeaderMap, HeaderValue},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{
    config::Config,
    model::{Playlist, PlaylistId, Track, TrackId},
};

pub use error::ApiError;

/// Server endpoints for playlists.
#[async_trait]
pub trait PlaylistApi: Send + Sync {
    async fn fetch_playlists(&self) -> Result<Vec<Playlist>, ApiError>;

    async fn fetch_playlist_detail(
        &self,
        plid: PlaylistId,
    ) -> Result<(Playlist, Vec<Track>), ApiError>;

    /// Persists a local playlist with its tracks and returns the server's
    /// record for it.
    async fn save_new_playlist(
        &self,
        local_id: PlaylistId,
        title: &str,
        is_public: bool,
        track_ids: &[TrackId],
    ) -> Result<Playlist, ApiError>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SavePlaylistRequest<'a> {
    local_id: PlaylistId,
    title: &'a str,
    public: bool,
    track_ids: &'a [TrackId],
}

#[derive(Debug, Deserialize)]
struct PlaylistDetailResponse {
    playlist: Playlist,
    #[serde(default)]
    tracks: Vec<Track>,
}

pub struct ApiService {
    client: Client,
    base_url: String,
}

impl ApiService {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        if let Some(token) = &config.token {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .gzip(true)
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_url.as_str().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn check(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(ApiError::Status(status))
        }
    }
}

#[async_trait]
impl PlaylistApi for ApiService {
    #[instrument(skip(self))]
    async fn fetch_playlists(&self) -> Result<Vec<Playlist>, ApiError> {
        let response = self.client.get(self.url("playlists")).send().await?;
        let playlists: Vec<Playlist> = Self::check(response)?.json().await?;
        debug!(count = playlists.len(), "fetched playlists");
        Ok(playlists)
    }

    #[instrument(skip(self))]
    async fn fetch_playlist_detail(
        &self,
        plid: PlaylistId,
    ) -> Result<(Playlist, Vec<Track>), ApiError> {
        let response = self
            .client
            .get(self.url(&format!("playlists/{plid}")))
            .send()
            .await?;
        let detail: PlaylistDetailResponse = Self::check(response)?.json().await?;
        Ok((detail.playlist, detail.tracks))
    }

    #[instrument(skip(self, track_ids), fields(tracks = track_ids.len()))]
    async fn save_new_playlist(
        &self,
        local_id: PlaylistId,
        title: &str,
        is_public: bool,
        track_ids: &[TrackId],
    ) -> Result<Playlist, ApiError> {
        let body = SavePlaylistRequest {
            local_id,
            title,
            public: is_public,
            track_ids,
        };
        let response = self
            .client
            .post(self.url("playlists"))
            .json(&body)
            .send()
            .await?;
        Ok(Self::check(response)?.json().await?)
    }
}
