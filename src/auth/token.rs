//! Token exchange against the Spotify accounts service
//!
//! A single POST with client credentials in a Basic header trades a refresh
//! token for a short-lived bearer token. Nothing is cached or retried here;
//! the caller owns the token and discards it when a call comes back 401.

use crate::config::Secret;
use crate::config::settings::SpotifySettings;
use crate::{Error, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use std::fmt;
use tracing::instrument;

/// Grant type used to trade a refresh token for an access token
pub const REFRESH_TOKEN_GRANT: &str = "refresh_token";

/// Default token endpoint of the accounts service
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

/// Short-lived credential sent as `Authorization: Bearer <token>`
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Raw token value
    pub fn secret(&self) -> &str {
        &self.0
    }

    /// Value for the `Authorization` header
    pub fn header_value(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

impl From<&str> for BearerToken {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Everything the token endpoint returned alongside the token
#[derive(Debug, Clone)]
pub struct TokenGrant {
    /// The bearer token
    pub token: BearerToken,
    /// Token type reported by the provider, normally `Bearer`
    pub token_type: String,
    /// Space separated scopes granted
    pub scope: Option<String>,
    /// Expiry computed from `expires_in` at the time of the exchange
    pub expires_at: Option<DateTime<Utc>>,
}

impl TokenGrant {
    /// Check if the token has expired
    pub fn is_expired(&self) -> bool {
        self.expires_at
            .map(|expires_at| Utc::now() >= expires_at)
            .unwrap_or(false)
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    scope: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
}

/// Client for the accounts service token endpoint
#[derive(Clone)]
pub struct TokenClient {
    client: Client,
    token_url: String,
    client_id: Secret,
    client_secret: Secret,
}

impl fmt::Debug for TokenClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenClient")
            .field("token_url", &self.token_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret)
            .finish()
    }
}

impl TokenClient {
    /// Create a token client for the default accounts endpoint
    pub fn new(client: Client, client_id: impl Into<Secret>, client_secret: impl Into<Secret>) -> Self {
        Self {
            client,
            token_url: DEFAULT_TOKEN_URL.to_string(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Point the client at a different token endpoint
    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self
    }

    /// Build a token client from settings; both credentials must be present
    pub fn from_settings(client: Client, settings: &SpotifySettings) -> Result<Self> {
        if settings.client_id.is_empty() {
            return Err(Error::config(
                "spotify.client_id",
                "Missing client id (set SPOTIFY_CLIENT_ID)",
            ));
        }
        if settings.client_secret.is_empty() {
            return Err(Error::config(
                "spotify.client_secret",
                "Missing client secret (set SPOTIFY_CLIENT_SECRET)",
            ));
        }

        Ok(Self::new(
            client,
            settings.client_id.clone(),
            settings.client_secret.clone(),
        )
        .with_token_url(settings.token_url.clone()))
    }

    /// `Basic base64(client_id:client_secret)`
    fn basic_auth_header(&self) -> String {
        let credentials = format!(
            "{}:{}",
            self.client_id.expose(),
            self.client_secret.expose()
        );
        format!("Basic {}", STANDARD.encode(credentials))
    }

    /// Exchange a refresh credential and return the full grant
    #[instrument(skip(self, refresh_token))]
    pub async fn exchange(&self, grant_type: &str, refresh_token: &str) -> Result<TokenGrant> {
        tracing::debug!("requesting access token");

        let response = self
            .client
            .post(&self.token_url)
            .header(AUTHORIZATION, self.basic_auth_header())
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .form(&[("grant_type", grant_type), ("refresh_token", refresh_token)])
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Error fetching access token: {}", e);
                Error::auth(format!("Token request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            tracing::error!(status = status.as_u16(), "Error fetching access token: {}", body);
            return Err(Error::auth_with_status(
                format!("Token endpoint rejected the request: {}", body),
                status.as_u16(),
            ));
        }

        let token_response: TokenResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse token response: {}", e);
            Error::auth(format!("Failed to parse token response: {}", e))
        })?;

        let access_token = token_response
            .access_token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                tracing::error!("access_token missing from token response");
                Error::auth("access_token missing from token response")
            })?;

        // Out-of-range lifetimes leave the expiry unknown
        let expires_at = token_response
            .expires_in
            .and_then(chrono::Duration::try_seconds)
            .and_then(|lifetime| Utc::now().checked_add_signed(lifetime));

        tracing::debug!(?expires_at, "access token acquired");

        Ok(TokenGrant {
            token: BearerToken::new(access_token),
            token_type: token_response
                .token_type
                .unwrap_or_else(|| "Bearer".to_string()),
            scope: token_response.scope,
            expires_at,
        })
    }

    /// Exchange a refresh credential for a bearer token
    pub async fn acquire_token(&self, grant_type: &str, refresh_token: &str) -> Result<BearerToken> {
        Ok(self.exchange(grant_type, refresh_token).await?.token)
    }

    /// Shorthand for the `refresh_token` grant
    pub async fn refresh(&self, refresh_token: &str) -> Result<BearerToken> {
        self.acquire_token(REFRESH_TOKEN_GRANT, refresh_token).await
    }
}
