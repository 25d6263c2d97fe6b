//! Common test utilities and helpers
//!
//! Shared fixtures and mock endpoints for the integration tests.

#![allow(dead_code)]

use playlist_bridge::{
    BatchPolicy, BearerToken, RetryPolicy, SpotifyClient, YouTubeClient, http::BackoffSource,
};
use serde_json::{Value, json};
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Test client factory
pub struct TestClients;

impl TestClients {
    pub fn token() -> BearerToken {
        BearerToken::new("test-access-token")
    }

    /// Spotify client against `server` with no waiting between retries or chunks
    pub fn spotify(server: &MockServer) -> SpotifyClient {
        SpotifyClient::new(reqwest::Client::new())
            .with_base_url(server.uri())
            .with_retry_policy(RetryPolicy::new(
                3,
                BackoffSource::RetryAfterHeader {
                    default_delay: Duration::ZERO,
                },
            ))
            .with_batch_policy(BatchPolicy::new(100, Duration::ZERO))
    }

    /// YouTube client against `server` under `/youtube/v3`
    pub fn youtube(server: &MockServer) -> YouTubeClient {
        YouTubeClient::with_base_url(
            reqwest::Client::new(),
            "test-api-key",
            format!("{}/youtube/v3", server.uri()),
        )
        .expect("api key is set")
    }
}

/// Test data factory
pub struct MockData;

impl MockData {
    pub fn track_ids(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("track{:03}", i)).collect()
    }

    pub fn search_hit(track_id: &str) -> Value {
        json!({
            "tracks": {
                "href": "https://api.spotify.com/v1/search?query=x&type=track",
                "items": [{"id": track_id, "name": "Some Track", "uri": format!("spotify:track:{}", track_id)}],
                "total": 1
            }
        })
    }

    pub fn search_empty() -> Value {
        json!({"tracks": {"items": [], "total": 0}})
    }

    pub fn playlist(id: &str, name: &str) -> Value {
        json!({
            "id": id,
            "name": name,
            "public": false,
            "owner": {"id": "alice"},
            "tracks": {"total": 0}
        })
    }

    pub fn playlist_items_page(video_ids: &[&str], next_page_token: Option<&str>, total: u32) -> Value {
        let items: Vec<Value> = video_ids
            .iter()
            .map(|id| {
                json!({
                    "kind": "youtube#playlistItem",
                    "id": format!("item-{}", id),
                    "contentDetails": {"videoId": id}
                })
            })
            .collect();

        let mut page = json!({
            "kind": "youtube#playlistItemListResponse",
            "items": items,
            "pageInfo": {"totalResults": total, "resultsPerPage": 50}
        });
        if let Some(token) = next_page_token {
            page["nextPageToken"] = json!(token);
        }
        page
    }

    pub fn video(id: &str, title: &str) -> Value {
        json!({
            "kind": "youtube#videoListResponse",
            "items": [{
                "id": id,
                "snippet": {"title": title, "channelTitle": "Channel"},
                "contentDetails": {"duration": "PT3M30S"},
                "statistics": {"viewCount": "42"}
            }]
        })
    }
}

/// Mock server factory
pub struct MockServerFactory;

impl MockServerFactory {
    pub async fn new() -> MockServer {
        MockServer::start().await
    }

    /// Serve `videos.list` for one id
    pub async fn setup_video(server: &MockServer, id: &str, title: &str) {
        Mock::given(method("GET"))
            .and(path("/youtube/v3/videos"))
            .and(query_param("id", id))
            .respond_with(ResponseTemplate::new(200).set_body_json(MockData::video(id, title)))
            .mount(server)
            .await;
    }

    /// Serve a search hit for an exact query
    pub async fn setup_search(server: &MockServer, query: &str, track_id: &str) {
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", query))
            .respond_with(ResponseTemplate::new(200).set_body_json(MockData::search_hit(track_id)))
            .mount(server)
            .await;
    }
}

/// Test utilities
pub struct TestUtils;

impl TestUtils {
    /// Initialize test logging
    pub fn init_logger() {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter("debug")
            .try_init();
    }
}
