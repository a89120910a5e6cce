//! Internal error type of the reqwest adapter.
//!
//! Mapped to [`HttpPortError`] at the port boundary.

use imgfetch_core::HttpPortError;
use thiserror::Error;

/// Result type alias for adapter operations.
pub type HttpResult<T> = Result<T, HttpError>;

/// Errors raised by the reqwest adapter.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The underlying client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("Request failed with status {status}: {url}")]
    Status {
        /// HTTP status code
        status: u16,
        /// The URL that was requested
        url: String,
    },

    /// Connection, TLS, timeout or body failure.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl From<HttpError> for HttpPortError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::Status { status, url } => Self::Status { status, url },
            HttpError::Network(e) if e.is_builder() => Self::InvalidUrl(e.to_string()),
            HttpError::Network(e) => Self::network(describe(&e)),
            HttpError::ClientBuild(e) => Self::network(e.to_string()),
        }
    }
}

/// Flatten a reqwest error and its causes into one line.
fn describe(err: &reqwest::Error) -> String {
    let mut message = if err.is_timeout() {
        format!("timed out: {err}")
    } else {
        err.to_string()
    };
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
