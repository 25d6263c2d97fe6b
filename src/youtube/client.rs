//! HTTP implementation of [`YouTubeApi`] authenticated with an API key.

use crate::config::Secret;
use crate::config::settings::YouTubeSettings;
use crate::http::network::{read_json, send};
use crate::youtube::api::{Pagination, YouTubeApi};
use crate::youtube::types::{DiscoveryDocument, PlaylistItemListResponse, VideoListResponse};
use crate::{Error, Result};
use reqwest::Client;
use tracing::instrument;

/// Discovery document of the YouTube Data API v3
pub const DEFAULT_DISCOVERY_URL: &str = "https://www.googleapis.com/discovery/v1/apis/youtube/v3/rest";

/// Caller-owned handle to the YouTube Data API.
///
/// Obtained once through [`YouTubeClient::initialize`] and passed to whatever
/// needs it; nothing about it is global.
#[derive(Debug, Clone)]
pub struct YouTubeClient {
    client: Client,
    base_url: String,
    api_key: Secret,
    pagination: Pagination,
}

impl YouTubeClient {
    /// Loads the discovery document and registers `api_key` on the new handle.
    ///
    /// The API base URL is taken from the document's `rootUrl` and
    /// `servicePath`.
    #[instrument(skip(client, api_key))]
    pub async fn initialize(
        client: Client,
        api_key: impl Into<Secret>,
        discovery_url: &str,
    ) -> Result<Self> {
        let operation = "initialize_client";
        let api_key = Self::require_key(api_key.into())?;

        let response = send(operation, client.get(discovery_url))
            .await
            .inspect_err(|e| tracing::error!("Error loading client for API: {}", e))?;
        let discovery: DiscoveryDocument = read_json(operation, response)
            .await
            .inspect_err(|e| tracing::error!("Error loading client for API: {}", e))?;

        let base_url = discovery.base_url();
        tracing::info!(%base_url, "client loaded for API");

        Ok(Self {
            client,
            base_url,
            api_key,
            pagination: Pagination::default(),
        })
    }

    /// Builds a handle against a known base URL without loading discovery.
    pub fn with_base_url(
        client: Client,
        api_key: impl Into<Secret>,
        base_url: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: Self::require_key(api_key.into())?,
            pagination: Pagination::default(),
        })
    }

    /// Builds a handle from settings, loading discovery unless a base URL is configured.
    pub async fn from_settings(client: Client, settings: &YouTubeSettings) -> Result<Self> {
        let youtube = match &settings.api_base_url {
            Some(base_url) => Self::with_base_url(client, settings.api_key.clone(), base_url.as_str())?,
            None => {
                Self::initialize(client, settings.api_key.clone(), &settings.discovery_url).await?
            }
        };

        Ok(youtube.with_pagination(Pagination::new(settings.page_size, settings.max_pages)))
    }

    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = pagination;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn require_key(api_key: Secret) -> Result<Secret> {
        if api_key.is_empty() {
            return Err(Error::config(
                "youtube.api_key",
                "Missing API key (set YOUTUBE_API_KEY)",
            ));
        }
        Ok(api_key)
    }
}

#[async_trait::async_trait]
impl YouTubeApi for YouTubeClient {
    #[instrument(skip(self))]
    async fn list_playlist_items(
        &self,
        playlist_id: &str,
        page_size: u32,
        page_token: Option<&str>,
    ) -> Result<PlaylistItemListResponse> {
        let operation = "list_playlist_items";
        let max_results = page_size.to_string();

        let mut query = vec![
            ("part", "id,contentDetails"),
            ("playlistId", playlist_id),
            ("maxResults", max_results.as_str()),
        ];
        if let Some(token) = page_token {
            query.push(("pageToken", token));
        }
        query.push(("key", self.api_key.expose()));

        let request = self
            .client
            .get(format!("{}/playlistItems", self.base_url))
            .query(&query);
        let response = send(operation, request).await?;
        read_json(operation, response).await
    }

    #[instrument(skip(self))]
    async fn list_videos(&self, video_id: &str) -> Result<VideoListResponse> {
        let operation = "list_videos";

        let request = self
            .client
            .get(format!("{}/videos", self.base_url))
            .query(&[
                ("part", "snippet,contentDetails,statistics"),
                ("id", video_id),
                ("key", self.api_key.expose()),
            ]);
        let response = send(operation, request).await?;
        read_json(operation, response).await
    }

    fn pagination(&self) -> Pagination {
        self.pagination
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_initialize_reads_discovery_document() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/discovery/v1/apis/youtube/v3/rest"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "kind": "discovery#restDescription",
                "rootUrl": format!("{}/", mock_server.uri()),
                "servicePath": "youtube/v3/"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let youtube = YouTubeClient::initialize(
            Client::new(),
            "key-123",
            &format!("{}/discovery/v1/apis/youtube/v3/rest", mock_server.uri()),
        )
        .await
        .unwrap();

        assert_eq!(youtube.base_url(), format!("{}/youtube/v3", mock_server.uri()));
    }

    #[tokio::test]
    async fn test_initialize_requires_api_key() {
        let result = YouTubeClient::initialize(Client::new(), "", DEFAULT_DISCOVERY_URL).await;
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[tokio::test]
    async fn test_initialize_fails_when_discovery_unavailable() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let result = YouTubeClient::initialize(Client::new(), "key-123", &mock_server.uri()).await;
        assert!(matches!(result, Err(Error::Remote { status: Some(503), .. })));
    }

    #[tokio::test]
    async fn test_list_videos_query() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/youtube/v3/videos"))
            .and(query_param("part", "snippet,contentDetails,statistics"))
            .and(query_param("id", "dQw4w9WgXcQ"))
            .and(query_param("key", "key-123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{
                    "id": "dQw4w9WgXcQ",
                    "snippet": {"title": "Never Gonna Give You Up", "channelTitle": "Rick Astley"},
                    "contentDetails": {"duration": "PT3M33S"},
                    "statistics": {"viewCount": "1500000000"}
                }]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let youtube = YouTubeClient::with_base_url(
            Client::new(),
            "key-123",
            format!("{}/youtube/v3/", mock_server.uri()),
        )
        .unwrap();

        let video = youtube.fetch_video_details("dQw4w9WgXcQ").await.unwrap();
        assert_eq!(video.title(), Some("Never Gonna Give You Up"));
        assert_eq!(
            video.content_details.unwrap().duration.as_deref(),
            Some("PT3M33S")
        );
    }
}
