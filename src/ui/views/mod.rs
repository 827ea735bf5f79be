pub mod playlist_tabs;

pub use playlist_tabs::PlaylistTabs;
