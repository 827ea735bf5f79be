pub mod playlist;
pub mod track;

pub use playlist::{Playlist, PlaylistId, PlaylistState, SortKey, TabKey};
pub use track::{Track, TrackId};
