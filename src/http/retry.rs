//! Retry and chunking policies
//!
//! Both policies are plain values handed to a client at construction time, so
//! callers and tests can tune attempts, waits and chunk sizes.

use crate::config::settings::MAX_TRACKS_PER_REQUEST;
use crate::{Error, Result};
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Response, StatusCode};
use std::future::Future;
use std::time::Duration;

/// Where the wait between rate-limited attempts comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackoffSource {
    /// Seconds from the `retry-after` header, `default_delay` when absent or unparsable
    RetryAfterHeader { default_delay: Duration },
    /// Always wait the same amount, ignoring the header
    Fixed(Duration),
}

/// Retry policy for HTTP 429 responses
///
/// Only 429 is retried. Every other status is returned to the caller as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
    backoff: BackoffSource,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff: BackoffSource::RetryAfterHeader {
                default_delay: Duration::from_secs(1),
            },
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, backoff: BackoffSource) -> Self {
        Self {
            max_retries,
            backoff,
        }
    }

    /// A policy that never retries
    pub fn no_retry() -> Self {
        Self::new(0, BackoffSource::Fixed(Duration::ZERO))
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub fn backoff(&self) -> &BackoffSource {
        &self.backoff
    }

    /// Wait before the next attempt given a 429 response's headers
    pub fn delay_for(&self, headers: &HeaderMap) -> Duration {
        match &self.backoff {
            BackoffSource::Fixed(delay) => *delay,
            BackoffSource::RetryAfterHeader { default_delay } => retry_after_secs(headers)
                .map(Duration::from_secs)
                .unwrap_or(*default_delay),
        }
    }

    /// Issue a request until it stops answering 429 or retries run out
    ///
    /// `attempt` is invoked once per request. Non-429 responses, successful or
    /// not, are returned untouched for the caller to inspect.
    pub async fn execute<F, Fut>(&self, operation: &str, mut attempt: F) -> Result<Response>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Response>>,
    {
        let mut attempts = 0u32;

        loop {
            attempts += 1;
            let response = attempt().await?;

            if response.status() != StatusCode::TOO_MANY_REQUESTS {
                return Ok(response);
            }

            let retry_after = retry_after_secs(response.headers());
            if attempts > self.max_retries {
                tracing::error!(
                    operation,
                    attempts,
                    "rate limit persisted after all retries"
                );
                return Err(Error::rate_limit(operation, attempts, retry_after));
            }

            let delay = self.delay_for(response.headers());
            tracing::warn!(
                operation,
                attempt = attempts,
                max_retries = self.max_retries,
                "rate limit exceeded, retrying after {:?}",
                delay
            );
            tokio::time::sleep(delay).await;
        }
    }
}

/// Parse the `retry-after` header as whole seconds
pub fn retry_after_secs(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
}

/// Chunking policy for batched playlist insertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchPolicy {
    chunk_size: usize,
    delay: Duration,
}

impl Default for BatchPolicy {
    fn default() -> Self {
        Self {
            chunk_size: MAX_TRACKS_PER_REQUEST,
            delay: Duration::from_millis(500),
        }
    }
}

impl BatchPolicy {
    /// Create a policy; the chunk size is clamped to 1..=100
    pub fn new(chunk_size: usize, delay: Duration) -> Self {
        Self {
            chunk_size: chunk_size.clamp(1, MAX_TRACKS_PER_REQUEST),
            delay,
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Pause between consecutive chunks
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Number of requests needed for `len` items
    pub fn chunk_count(&self, len: usize) -> usize {
        len.div_ceil(self.chunk_size)
    }
}
