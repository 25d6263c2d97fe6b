//! YouTube Data API v3 client: playlist enumeration and video lookups.

pub mod api;
pub mod client;
pub mod types;

pub use api::{Pagination, YouTubeApi};
pub use client::YouTubeClient;
pub use types::{PlaylistItem, PlaylistItems, Video};
