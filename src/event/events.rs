use crate::{
    model::{Playlist, PlaylistId, Track},
    store::{Dispatch, StoreAction},
};

#[derive(Debug, Clone)]
pub enum Event {
    // Store
    Dispatch(StoreAction),

    // Fetches
    PlaylistsFetched(Vec<Playlist>),
    PlaylistDetailFetched(Playlist, Vec<Track>),
    FetchError(String),

    // Save requests
    PlaylistSaved {
        local_id: PlaylistId,
        playlist: Playlist,
    },
    PlaylistSaveFailed {
        local_id: PlaylistId,
        reason: String,
    },
}

/// Forwards store actions onto the app event channel; the app loop applies them.
#[derive(Clone)]
pub struct ChannelDispatcher {
    tx: flume::Sender<Event>,
}

impl ChannelDispatcher {
    pub fn new(tx: flume::Sender<Event>) -> Self {
        Self { tx }
    }
}

impl Dispatch for ChannelDispatcher {
    fn dispatch(&self, action: StoreAction) {
        if self.tx.send(Event::Dispatch(action)).is_err() {
            tracing::warn!("Event channel closed, dropping store action");
        }
    }
}
