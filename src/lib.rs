//! playlist-bridge
//!
//! Thin clients for the Spotify Web API and the YouTube Data API v3, plus the
//! glue to copy a YouTube playlist into a Spotify one.
//!
//! # Features
//!
//! - **Token exchange**: refresh-token grant against the Spotify accounts service
//! - **Spotify client**: search, track and playlist lookups, playlist creation
//!   with HTTP 429 retry, batched track insertion
//! - **YouTube client**: discovery-based initialization, cursor-following
//!   playlist enumeration, video lookups
//! - **Injectable policies**: retry, chunking and pagination are plain values
//!   handed to the clients
//!
//! # Examples
//!
//! ```rust,no_run
//! use playlist_bridge::{SpotifyClient, TokenClient};
//!
//! # async fn example() -> playlist_bridge::Result<()> {
//! let http = reqwest::Client::new();
//! let token = TokenClient::new(http.clone(), "client-id", "client-secret")
//!     .refresh("refresh-token")
//!     .await?;
//!
//! let spotify = SpotifyClient::new(http);
//! let track_id = spotify.search_track("Daft Punk - One More Time", &token).await?;
//! println!("{track_id}");
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod spotify;
pub mod transfer;
pub mod utils;
pub mod youtube;

pub use auth::{BearerToken, TokenClient};
pub use config::{ConfigLoader, Settings};
pub use error::{Error, Result};
pub use http::{BatchPolicy, RetryPolicy};
pub use spotify::SpotifyClient;
pub use youtube::{YouTubeApi, YouTubeClient};
