//! Spotify Web API client.

use crate::auth::BearerToken;
use crate::config::settings::SpotifySettings;
use crate::http::network::{read_json, send};
use crate::http::{BatchPolicy, RetryPolicy};
use crate::spotify::types::{
    AddTracksRequest, BatchReport, Playlist, PlaylistDetails, SearchResponse, SnapshotResponse,
    Track, track_uri,
};
use crate::{Error, Result};
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use tracing::instrument;

/// Default base URL of the Web API
pub const DEFAULT_API_BASE_URL: &str = "https://api.spotify.com/v1";

/// Client for the Spotify Web API.
///
/// Stateless apart from its policies: every call takes the bearer token it
/// should use, so the caller decides when to acquire and discard tokens.
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    client: Client,
    base_url: String,
    retry_policy: RetryPolicy,
    batch_policy: BatchPolicy,
}

impl SpotifyClient {
    /// Create a client for the public API with the default policies.
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: DEFAULT_API_BASE_URL.to_string(),
            retry_policy: RetryPolicy::default(),
            batch_policy: BatchPolicy::default(),
        }
    }

    /// Create a client from settings.
    pub fn from_settings(client: Client, settings: &SpotifySettings) -> Self {
        Self::new(client)
            .with_base_url(settings.api_base_url.clone())
            .with_retry_policy(settings.retry.policy())
            .with_batch_policy(settings.batch.policy())
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Replace the policy applied to rate-limited playlist creation.
    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    /// Replace the chunking policy used by [`Self::add_tracks_in_batch`].
    pub fn with_batch_policy(mut self, batch_policy: BatchPolicy) -> Self {
        self.batch_policy = batch_policy;
        self
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    pub fn batch_policy(&self) -> &BatchPolicy {
        &self.batch_policy
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Searches for tracks matching `query` and returns the first match's id.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] when the search returns no tracks, [`Error::Remote`]
    /// on transport or HTTP failure.
    #[instrument(skip(self, token))]
    pub async fn search_track(&self, query: &str, token: &BearerToken) -> Result<String> {
        let operation = "search_track";
        let url = self.url(&format!(
            "/search?q={}&type=track",
            urlencoding::encode(query)
        ));

        let request = self.client.get(url).header(AUTHORIZATION, token.header_value());
        let response = send(operation, request).await?;
        let search: SearchResponse = read_json(operation, response).await?;

        match search.tracks.items.into_iter().next() {
            Some(track) => {
                tracing::debug!(track_id = %track.id, "search matched track");
                Ok(track.id)
            }
            None => {
                tracing::error!("Error searching for track: No tracks found");
                Err(Error::not_found("track", query))
            }
        }
    }

    /// Retrieves track information by id.
    #[instrument(skip(self, token))]
    pub async fn get_track(&self, track_id: &str, token: &BearerToken) -> Result<Track> {
        let operation = "get_track";
        let url = self.url(&format!("/tracks/{}", urlencoding::encode(track_id)));

        let request = self.client.get(url).header(AUTHORIZATION, token.header_value());
        let response = send(operation, request).await?;
        read_json(operation, response).await
    }

    /// Creates a playlist for `user_id`.
    ///
    /// HTTP 429 responses are retried according to the client's
    /// [`RetryPolicy`]. When the retries run out the call fails with
    /// [`Error::RateLimit`].
    #[instrument(skip(self, details, token), fields(name = %details.name))]
    pub async fn create_playlist(
        &self,
        user_id: &str,
        details: &PlaylistDetails,
        token: &BearerToken,
    ) -> Result<Playlist> {
        let operation = "create_playlist";
        let url = self.url(&format!("/users/{}/playlists", urlencoding::encode(user_id)));

        let response = self
            .retry_policy
            .execute(operation, || {
                let request = self
                    .client
                    .post(url.as_str())
                    .header(AUTHORIZATION, token.header_value())
                    .json(details);
                send(operation, request)
            })
            .await?;

        let playlist: Playlist = read_json(operation, response).await?;
        tracing::info!(playlist_id = %playlist.id, "playlist created");
        Ok(playlist)
    }

    /// Inserts one track at `position` in a playlist.
    #[instrument(skip(self, token))]
    pub async fn add_track_to_playlist(
        &self,
        playlist_id: &str,
        track_id: &str,
        token: &BearerToken,
        position: u32,
    ) -> Result<SnapshotResponse> {
        let body = AddTracksRequest {
            uris: vec![track_uri(track_id)],
            position: Some(position),
        };
        self.post_tracks("add_track_to_playlist", playlist_id, &body, token)
            .await
    }

    /// Appends tracks to a playlist in chunks of at most 100 URIs.
    ///
    /// Chunks are sent one after another with the policy's delay between
    /// them. The first failing chunk stops the batch; chunks sent before it
    /// stay in the playlist and the returned [`Error::BatchInterrupted`]
    /// says how many were committed.
    #[instrument(skip(self, track_ids, token), fields(tracks = track_ids.len()))]
    pub async fn add_tracks_in_batch<S: AsRef<str>>(
        &self,
        playlist_id: &str,
        track_ids: &[S],
        token: &BearerToken,
    ) -> Result<BatchReport> {
        let operation = "add_tracks_in_batch";
        let total_chunks = self.batch_policy.chunk_count(track_ids.len());
        let mut report = BatchReport::default();

        for (index, chunk) in track_ids.chunks(self.batch_policy.chunk_size()).enumerate() {
            if index > 0 {
                tokio::time::sleep(self.batch_policy.delay()).await;
            }

            let body = AddTracksRequest {
                uris: chunk.iter().map(|id| track_uri(id.as_ref())).collect(),
                position: None,
            };

            match self.post_tracks(operation, playlist_id, &body, token).await {
                Ok(snapshot) => {
                    tracing::info!(
                        chunk = index + 1,
                        total_chunks,
                        size = chunk.len(),
                        snapshot_id = %snapshot.snapshot_id,
                        "batch added"
                    );
                    report.chunks += 1;
                    report.tracks_added += chunk.len();
                    report.snapshot_ids.push(snapshot.snapshot_id);
                }
                Err(e) => {
                    tracing::error!(
                        chunk = index + 1,
                        total_chunks,
                        tracks_committed = report.tracks_added,
                        "Error adding batch to playlist: {}",
                        e
                    );
                    return Err(Error::BatchInterrupted {
                        committed_chunks: report.chunks,
                        failed_chunk: index + 1,
                        total_chunks,
                        tracks_committed: report.tracks_added,
                        source: Box::new(e),
                    });
                }
            }
        }

        Ok(report)
    }

    /// Retrieves the details of a playlist.
    #[instrument(skip(self, token))]
    pub async fn get_playlist(&self, playlist_id: &str, token: &BearerToken) -> Result<Playlist> {
        let operation = "get_playlist";
        let url = self.url(&format!("/playlists/{}", urlencoding::encode(playlist_id)));

        let request = self.client.get(url).header(AUTHORIZATION, token.header_value());
        let response = send(operation, request).await?;
        read_json(operation, response).await
    }

    async fn post_tracks(
        &self,
        operation: &str,
        playlist_id: &str,
        body: &AddTracksRequest,
        token: &BearerToken,
    ) -> Result<SnapshotResponse> {
        let url = self.url(&format!(
            "/playlists/{}/tracks",
            urlencoding::encode(playlist_id)
        ));

        let request = self
            .client
            .post(url)
            .header(AUTHORIZATION, token.header_value())
            .header(CONTENT_TYPE, "application/json")
            .json(body);
        let response = send(operation, request).await?;
        read_json(operation, response).await
    }
}
