//! Spotify Web API client: search, lookups, playlist creation and insertion.

pub mod client;
pub mod types;

pub use client::SpotifyClient;
pub use types::{BatchReport, Playlist, PlaylistDetails, SnapshotResponse, Track, track_uri};
