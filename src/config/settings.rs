//! Configuration settings
//!
//! Provides configuration loading from environment variables and TOML files.
//! Every field has a default so a partial file is always valid.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::http::retry::{BackoffSource, BatchPolicy, RetryPolicy};

// Helper functions for serde defaults
fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_spotify_api_base_url() -> String {
    "https://api.spotify.com/v1".to_string()
}

fn default_spotify_token_url() -> String {
    "https://accounts.spotify.com/api/token".to_string()
}

fn default_youtube_discovery_url() -> String {
    "https://www.googleapis.com/discovery/v1/apis/youtube/v3/rest".to_string()
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_after_secs() -> u64 {
    1
}

fn default_chunk_size() -> usize {
    100
}

fn default_chunk_delay_ms() -> u64 {
    500
}

fn default_page_size() -> u32 {
    50
}

fn default_max_pages() -> u32 {
    1000
}

fn default_connect_timeout() -> u64 {
    30
}

fn default_request_timeout() -> u64 {
    60
}

fn default_user_agent() -> String {
    crate::utils::version::default_user_agent()
}

/// Largest number of URIs the playlist insertion endpoint accepts per request
pub const MAX_TRACKS_PER_REQUEST: usize = 100;

/// Largest page the playlistItems endpoint returns
pub const MAX_PLAYLIST_ITEMS_PAGE_SIZE: u32 = 50;

/// A configuration value that must never show up in logs
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    /// Wrap a secret value
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the raw value
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("Secret(<empty>)")
        } else {
            f.write_str("Secret(<redacted>)")
        }
    }
}

impl From<&str> for Secret {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Secret {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Main configuration settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Streaming service configuration
    #[serde(default)]
    pub spotify: SpotifySettings,
    /// Video service configuration
    #[serde(default)]
    pub youtube: YouTubeSettings,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingSettings,
    /// Network configuration
    #[serde(default)]
    pub network: NetworkSettings,
}

/// Spotify Web API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifySettings {
    /// Application client id
    #[serde(default)]
    pub client_id: Secret,
    /// Application client secret
    #[serde(default)]
    pub client_secret: Secret,
    /// Long-lived refresh token exchanged for bearer tokens
    #[serde(default)]
    pub refresh_token: Option<Secret>,
    /// Base URL of the Web API
    #[serde(default = "default_spotify_api_base_url")]
    pub api_base_url: String,
    /// Token endpoint of the accounts service
    #[serde(default = "default_spotify_token_url")]
    pub token_url: String,
    /// Retry behaviour for rate-limited playlist creation
    #[serde(default)]
    pub retry: RetrySettings,
    /// Chunking behaviour for batched track insertion
    #[serde(default)]
    pub batch: BatchSettings,
}

/// Retry configuration for HTTP 429 responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrySettings {
    /// Retries after the first request (3 means up to 4 requests)
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Wait used when the provider sends no `retry-after` header, in seconds
    #[serde(default = "default_retry_after_secs")]
    pub default_retry_after_secs: u64,
    /// Honor the provider's `retry-after` header
    #[serde(default = "default_true")]
    pub honor_retry_after: bool,
}

/// Batched insertion configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSettings {
    /// Track URIs per insertion request
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Pause between consecutive chunks in milliseconds
    #[serde(default = "default_chunk_delay_ms")]
    pub chunk_delay_ms: u64,
}

/// YouTube Data API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YouTubeSettings {
    /// API key sent as the `key` query parameter
    #[serde(default)]
    pub api_key: Secret,
    /// Discovery document used to locate the API
    #[serde(default = "default_youtube_discovery_url")]
    pub discovery_url: String,
    /// Skip discovery and use this base URL directly
    #[serde(default)]
    pub api_base_url: Option<String>,
    /// Items requested per playlistItems page
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Upper bound on pages fetched for one playlist
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Enable verbose logging
    #[serde(default)]
    pub verbose: bool,
}

/// Network and proxy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkSettings {
    /// HTTPS proxy URL
    #[serde(default)]
    pub https_proxy: Option<String>,
    /// HTTP proxy URL
    #[serde(default)]
    pub http_proxy: Option<String>,
    /// All protocols proxy URL
    #[serde(default)]
    pub all_proxy: Option<String>,
    /// Connection timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,
    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
    /// User agent string
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for SpotifySettings {
    fn default() -> Self {
        Self {
            client_id: Secret::default(),
            client_secret: Secret::default(),
            refresh_token: None,
            api_base_url: default_spotify_api_base_url(),
            token_url: default_spotify_token_url(),
            retry: RetrySettings::default(),
            batch: BatchSettings::default(),
        }
    }
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            default_retry_after_secs: default_retry_after_secs(),
            honor_retry_after: default_true(),
        }
    }
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_delay_ms: default_chunk_delay_ms(),
        }
    }
}

impl Default for YouTubeSettings {
    fn default() -> Self {
        Self {
            api_key: Secret::default(),
            discovery_url: default_youtube_discovery_url(),
            api_base_url: None,
            page_size: default_page_size(),
            max_pages: default_max_pages(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            verbose: false,
        }
    }
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            https_proxy: None,
            http_proxy: None,
            all_proxy: None,
            connect_timeout: default_connect_timeout(),
            request_timeout: default_request_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl RetrySettings {
    /// Build the retry policy injected into the Spotify client
    pub fn policy(&self) -> RetryPolicy {
        let default_delay = Duration::from_secs(self.default_retry_after_secs);
        let backoff = if self.honor_retry_after {
            BackoffSource::RetryAfterHeader { default_delay }
        } else {
            BackoffSource::Fixed(default_delay)
        };
        RetryPolicy::new(self.max_retries, backoff)
    }
}

impl BatchSettings {
    /// Build the chunking policy injected into the Spotify client
    pub fn policy(&self) -> BatchPolicy {
        BatchPolicy::new(self.chunk_size, Duration::from_millis(self.chunk_delay_ms))
    }
}

impl Settings {
    /// Create new settings with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from environment variables on top of the defaults
    pub fn from_env() -> crate::Result<Self> {
        Self::default().merge_with_env()
    }

    /// Load settings from configuration file
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            crate::Error::config("file", &format!("Failed to read config file: {}", e))
        })?;

        let settings: Settings = toml::from_str(&content).map_err(|e| {
            crate::Error::config("file", &format!("Failed to parse config file: {}", e))
        })?;

        Ok(settings)
    }

    /// Apply environment variable overrides; unset variables leave values untouched
    pub fn merge_with_env(mut self) -> crate::Result<Self> {
        if let Ok(client_id) = std::env::var("SPOTIFY_CLIENT_ID") {
            self.spotify.client_id = client_id.into();
        }
        if let Ok(client_secret) = std::env::var("SPOTIFY_CLIENT_SECRET") {
            self.spotify.client_secret = client_secret.into();
        }
        if let Ok(refresh_token) = std::env::var("SPOTIFY_REFRESH_TOKEN") {
            self.spotify.refresh_token = Some(refresh_token.into());
        }
        if let Ok(api_key) = std::env::var("YOUTUBE_API_KEY") {
            self.youtube.api_key = api_key.into();
        }

        if let Ok(level) = std::env::var("LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(verbose) = std::env::var("VERBOSE") {
            self.logging.verbose = verbose.parse().map_err(|e| {
                crate::Error::config("VERBOSE", &format!("Invalid boolean: {}", e))
            })?;
        }

        // Proxy variables always override when present
        if let Ok(proxy) = std::env::var("HTTPS_PROXY") {
            self.network.https_proxy = Some(proxy);
        }
        if let Ok(proxy) = std::env::var("HTTP_PROXY") {
            self.network.http_proxy = Some(proxy);
        }
        if let Ok(proxy) = std::env::var("ALL_PROXY") {
            self.network.all_proxy = Some(proxy);
        }

        Ok(self)
    }

    /// Get effective proxy URL based on priority
    pub fn get_proxy_url(&self) -> Option<String> {
        self.network
            .https_proxy
            .as_ref()
            .or(self.network.http_proxy.as_ref())
            .or(self.network.all_proxy.as_ref())
            .cloned()
    }

    /// Validate configuration settings
    ///
    /// Credentials are not required here; each command checks the ones it needs.
    pub fn validate(&self) -> crate::Result<()> {
        let batch = &self.spotify.batch;
        if batch.chunk_size == 0 || batch.chunk_size > MAX_TRACKS_PER_REQUEST {
            return Err(crate::Error::config(
                "spotify.batch.chunk_size",
                &format!(
                    "Invalid chunk size {}: must be between 1 and {}",
                    batch.chunk_size, MAX_TRACKS_PER_REQUEST
                ),
            ));
        }

        let page_size = self.youtube.page_size;
        if page_size == 0 || page_size > MAX_PLAYLIST_ITEMS_PAGE_SIZE {
            return Err(crate::Error::config(
                "youtube.page_size",
                &format!(
                    "Invalid page size {}: must be between 1 and {}",
                    page_size, MAX_PLAYLIST_ITEMS_PAGE_SIZE
                ),
            ));
        }

        if self.youtube.max_pages == 0 {
            return Err(crate::Error::config(
                "youtube.max_pages",
                "Invalid page bound: cannot be 0",
            ));
        }

        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(crate::Error::config(
                    "log_level",
                    &format!("Invalid log level: {}", self.logging.level),
                ));
            }
        }

        let urls = [
            ("spotify.api_base_url", Some(&self.spotify.api_base_url)),
            ("spotify.token_url", Some(&self.spotify.token_url)),
            ("youtube.discovery_url", Some(&self.youtube.discovery_url)),
            ("youtube.api_base_url", self.youtube.api_base_url.as_ref()),
            ("https_proxy", self.network.https_proxy.as_ref()),
            ("http_proxy", self.network.http_proxy.as_ref()),
            ("all_proxy", self.network.all_proxy.as_ref()),
        ];

        for (name, url_str) in urls {
            if let Some(url_str) = url_str
                && let Err(e) = url::Url::parse(url_str)
            {
                return Err(crate::Error::config(
                    name,
                    &format!("Invalid URL '{}': {}", url_str, e),
                ));
            }
        }

        Ok(())
    }
}
