//! HTTP client configuration and response handling
//!
//! Builds the shared `reqwest` client from the network settings and turns
//! provider responses into typed results.

use crate::config::Settings;
use crate::{Error, Result};
use reqwest::{Client, Proxy, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Network manager owning the shared HTTP client
#[derive(Debug, Clone)]
pub struct NetworkManager {
    /// Base HTTP client
    client: Client,
}

impl NetworkManager {
    /// Create a network manager from settings, honoring the proxy priority
    pub fn new(settings: &Settings) -> Result<Self> {
        let network = &settings.network;
        let mut client_builder = Client::builder()
            .user_agent(network.user_agent.as_str())
            .connect_timeout(Duration::from_secs(network.connect_timeout))
            .timeout(Duration::from_secs(network.request_timeout));

        if let Some(proxy_url) = settings.get_proxy_url() {
            let proxy = Proxy::all(&proxy_url).map_err(|e| {
                Error::config("network.proxy", &format!("Invalid proxy URL '{}': {}", proxy_url, e))
            })?;
            client_builder = client_builder.proxy(proxy);
        }

        let client = client_builder.build().map_err(|e| {
            Error::config("network", &format!("Failed to create HTTP client: {}", e))
        })?;

        Ok(Self { client })
    }

    /// Get the configured HTTP client
    pub fn client(&self) -> &Client {
        &self.client
    }
}

/// Send a prepared request, mapping transport failures to [`Error::Remote`]
pub(crate) async fn send(operation: &str, request: reqwest::RequestBuilder) -> Result<Response> {
    request.send().await.map_err(|e| {
        tracing::error!(operation, "request failed before a response arrived: {}", e);
        Error::transport(operation, &e.to_string())
    })
}

/// Fail with [`Error::Remote`] unless the response status is 2xx
pub(crate) async fn ensure_success(operation: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "unknown error".to_string());
    tracing::error!(operation, status = status.as_u16(), "provider returned error: {}", body);
    Err(Error::remote(operation, status.as_u16(), &body))
}

/// Check the status and decode a JSON body
pub(crate) async fn read_json<T: DeserializeOwned>(operation: &str, response: Response) -> Result<T> {
    let response = ensure_success(operation, response).await?;
    let status = response.status().as_u16();
    response.json::<T>().await.map_err(|e| {
        tracing::error!(operation, "failed to parse provider response: {}", e);
        Error::remote(operation, status, &format!("Failed to parse JSON response: {}", e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_network_manager_creation() {
        let manager = NetworkManager::new(&Settings::default());
        assert!(manager.is_ok());
    }

    #[tokio::test]
    async fn test_network_manager_with_proxy() {
        let mut settings = Settings::default();
        settings.network.http_proxy = Some("http://proxy:8080".to_string());

        assert!(NetworkManager::new(&settings).is_ok());
    }

    #[tokio::test]
    async fn test_ensure_success_maps_status() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_string("gone"))
            .mount(&mock_server)
            .await;

        let client = Client::new();
        let response = send("probe", client.get(format!("{}/missing", mock_server.uri())))
            .await
            .unwrap();
        let err = ensure_success("probe", response).await.unwrap_err();

        match err {
            Error::Remote {
                operation,
                status,
                message,
            } => {
                assert_eq!(operation, "probe");
                assert_eq!(status, Some(404));
                assert_eq!(message, "gone");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_send_maps_transport_failure() {
        let client = Client::new();
        let err = send("probe", client.get("http://127.0.0.1:1/unreachable"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Remote { status: None, .. }));
    }

    #[tokio::test]
    async fn test_read_json_rejects_malformed_body() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&mock_server)
            .await;

        let client = Client::new();
        let response = send("probe", client.get(mock_server.uri())).await.unwrap();
        let result: Result<serde_json::Value> = read_json("probe", response).await;
        assert!(matches!(result, Err(Error::Remote { status: Some(200), .. })));
    }
}
