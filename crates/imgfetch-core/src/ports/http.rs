//! HTTP client port.
//!
//! The fetch pipeline needs exactly two things from HTTP: the declared
//! content type of a resource, and its body as a stream of chunks.

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::Stream;
use thiserror::Error;
use url::Url;

/// Errors from HTTP port operations.
///
/// Implementation-specific errors (reqwest, hyper) are mapped to these.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HttpPortError {
    /// Connection, TLS, timeout or body read failure.
    #[error("Network error: {message}")]
    Network {
        /// Description of the network error
        message: String,
    },

    /// The server answered with a non-success status.
    #[error("HTTP {status} for {url}")]
    Status {
        /// HTTP status code
        status: u16,
        /// The URL that was requested
        url: String,
    },

    /// The URL could not be turned into a request.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl HttpPortError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }
}

/// Result type alias for HTTP port operations.
pub type HttpPortResult<T> = Result<T, HttpPortError>;

/// Body of a response, chunk by chunk.
pub type ByteStream = Pin<Box<dyn Stream<Item = HttpPortResult<Bytes>> + Send>>;

/// Response metadata returned by a `HEAD` request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadMetadata {
    /// Raw `Content-Type` header, if any.
    pub content_type: Option<String>,
}

/// Port trait for the remote side of the fetch pipeline.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpClientPort: Send + Sync {
    /// Issue a metadata-only request for `url`.
    async fn head_metadata(&self, url: &Url) -> HttpPortResult<HeadMetadata>;

    /// Start a `GET` for `url` and return its body as a stream.
    ///
    /// A non-success status fails here; network errors after the headers
    /// arrive surface as `Err` items of the stream.
    async fn stream_body(&self, url: &Url) -> HttpPortResult<ByteStream>;
}
