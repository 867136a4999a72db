//! Error types for the Shipwire client.
//!
//! # Design
//! Only infrastructure problems are errors: missing configuration, a bad
//! endpoint, a transport failure or a body that is not JSON. Anything the API
//! itself reports ("Order not found.", validation failures) comes back as a
//! non-ok `Response` so callers branch on data instead of on `Err`.

use std::time::Duration;

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors returned by `Client::build`, `Client::parse` and `Client::send`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Credentials or endpoint were never configured.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// The configured endpoint is not an absolute base URL.
    #[error("invalid endpoint {endpoint:?}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    /// A query parameter value cannot be flattened into a query string.
    #[error("query parameter {key:?} must be a string, number, boolean or a list of those")]
    InvalidQueryParam { key: String },

    /// A resource identifier that cannot stand as one path segment.
    #[error("invalid resource id {id:?}: {reason}")]
    InvalidId { id: String, reason: &'static str },

    /// The request body could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The HTTP round-trip itself failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The server answered, but the body is not a JSON object.
    #[error("malformed response (HTTP {status}): {reason}")]
    MalformedResponse { status: u16, reason: String },
}

/// Problems with the client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("missing {0}; call configure() or set it on Config before sending requests")]
    Missing(&'static str),

    /// An environment variable held a value that could not be parsed.
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },
}

/// Failures raised by a `Transport` before any HTTP response was received.
///
/// The library never retries these; callers decide.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// DNS, refused connections, TLS and I/O failures, with the original cause.
    #[error("transport failure: {0}")]
    Failed(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl TransportError {
    pub fn failed(cause: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        TransportError::Failed(cause.into())
    }
}
