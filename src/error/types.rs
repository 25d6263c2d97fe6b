//! Error classification for the provider clients
//!
//! Every remote failure lands in one of a handful of variants so callers can
//! tell an authentication problem from a rate limit or an empty search.

use thiserror::Error;

/// Main error type for the crate
#[derive(Debug, Error)]
pub enum Error {
    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML configuration parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing errors
    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    /// Token exchange failed
    #[error("Authentication failed: {reason}")]
    Auth {
        /// The reason why authentication failed
        reason: String,
        /// HTTP status returned by the token endpoint, if a response arrived
        status: Option<u16>,
    },

    /// Non-2xx response or transport failure on a provider call
    #[error("{operation} failed: {message}")]
    Remote {
        /// The client operation that issued the request
        operation: String,
        /// HTTP status code, `None` for transport failures
        status: Option<u16>,
        /// Error message or response body
        message: String,
    },

    /// HTTP 429 responses kept coming after every allowed retry
    #[error("Rate limited during {operation} after {attempts} attempts")]
    RateLimit {
        /// The client operation that was rate limited
        operation: String,
        /// Total number of requests issued
        attempts: u32,
        /// Seconds the provider asked us to wait on the last response
        retry_after: Option<u64>,
    },

    /// A lookup matched nothing
    #[error("No {resource} found for '{query}'")]
    NotFound {
        /// Kind of resource searched for
        resource: String,
        /// The query or identifier that matched nothing
        query: String,
    },

    /// A batched insertion stopped part way through
    ///
    /// Chunks before the failing one are already committed remotely.
    #[error(
        "Batch insertion stopped at chunk {failed_chunk} of {total_chunks} ({tracks_committed} tracks already added): {source}"
    )]
    BatchInterrupted {
        /// Number of chunks committed before the failure
        committed_chunks: usize,
        /// 1-based index of the chunk that failed
        failed_chunk: usize,
        /// Number of chunks the batch was split into
        total_chunks: usize,
        /// Number of tracks committed before the failure
        tracks_committed: usize,
        /// The error returned for the failing chunk
        #[source]
        source: Box<Error>,
    },

    /// Pagination kept returning a cursor past the configured bound
    #[error("Pagination of {resource} exceeded {max_pages} pages")]
    PaginationLimit {
        /// The paginated resource
        resource: String,
        /// The configured page bound
        max_pages: u32,
        /// Items collected before giving up
        items_collected: usize,
    },

    /// Configuration errors
    #[error("Configuration error in {field}: {message}")]
    Config {
        /// The configuration field that has an error
        field: String,
        /// Error message describing the issue
        message: String,
    },

    /// Validation errors
    #[error("Validation failed for {field}: {message}")]
    Validation {
        /// The field that failed validation
        field: String,
        /// Error message describing the validation failure
        message: String,
        /// The invalid value that caused the validation to fail
        value: Option<String>,
    },
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an authentication error
    pub fn auth<S: Into<String>>(reason: S) -> Self {
        Self::Auth {
            reason: reason.into(),
            status: None,
        }
    }

    /// Create an authentication error carrying the token endpoint's status
    pub fn auth_with_status<S: Into<String>>(reason: S, status: u16) -> Self {
        Self::Auth {
            reason: reason.into(),
            status: Some(status),
        }
    }

    /// Create a remote error for a non-2xx response
    pub fn remote<S: Into<String>>(operation: S, status: u16, message: S) -> Self {
        Self::Remote {
            operation: operation.into(),
            status: Some(status),
            message: message.into(),
        }
    }

    /// Create a remote error for a transport failure
    pub fn transport<S: Into<String>>(operation: S, message: S) -> Self {
        Self::Remote {
            operation: operation.into(),
            status: None,
            message: message.into(),
        }
    }

    /// Create a rate limit error
    pub fn rate_limit<S: Into<String>>(operation: S, attempts: u32, retry_after: Option<u64>) -> Self {
        Self::RateLimit {
            operation: operation.into(),
            attempts,
            retry_after,
        }
    }

    /// Create a not-found error
    pub fn not_found<S: Into<String>>(resource: S, query: S) -> Self {
        Self::NotFound {
            resource: resource.into(),
            query: query.into(),
        }
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(field: S, message: S) -> Self {
        Self::Config {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation<S: Into<String>>(field: S, message: S) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
            value: None,
        }
    }

    /// Create a validation error that records the offending value
    pub fn validation_with_value<S: Into<String>>(field: S, message: S, value: S) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
            value: Some(value.into()),
        }
    }

    /// HTTP status attached to this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Auth { status, .. } | Error::Remote { status, .. } => *status,
            Error::RateLimit { .. } => Some(429),
            Error::BatchInterrupted { source, .. } => source.status(),
            _ => None,
        }
    }

    /// Whether a caller may reasonably retry the same call later
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::RateLimit { .. } => true,
            Error::Remote { status: None, .. } => true,
            Error::Remote {
                status: Some(status),
                ..
            } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Whether this error means the bearer token should be discarded
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Error::Json(..) => "json",
            Error::Toml(..) => "toml",
            Error::Url(..) => "url",
            Error::Auth { .. } => "auth",
            Error::Remote { .. } => "remote",
            Error::RateLimit { .. } => "rate_limit",
            Error::NotFound { .. } => "not_found",
            Error::BatchInterrupted { .. } => "batch_interrupted",
            Error::PaginationLimit { .. } => "pagination_limit",
            Error::Config { .. } => "config",
            Error::Validation { .. } => "validation",
        }
    }
}
