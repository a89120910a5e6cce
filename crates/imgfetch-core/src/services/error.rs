//! Per-source pipeline errors.
//!
//! None of these escape `ImageFetcher::fetch_all`; they are logged and turned
//! into a fallback outcome for the source that produced them.

use thiserror::Error;

use crate::ports::{FileStoreError, HttpPortError};
use crate::source::NormalizeError;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("Malformed source: {0}")]
    MalformedSource(#[from] NormalizeError),

    #[error("Metadata request failed: {0}")]
    MetadataFetch(#[source] HttpPortError),

    #[error("Unrecognized content type: {}", .content_type.as_deref().unwrap_or("<missing>"))]
    UnknownContentType { content_type: Option<String> },

    #[error("Download failed: {0}")]
    Download(#[source] HttpPortError),

    #[error("File error: {0}")]
    Io(#[from] FileStoreError),
}

impl FetchError {
    /// Whether the failure happened before any download was attempted.
    pub const fn is_metadata_failure(&self) -> bool {
        matches!(
            self,
            Self::MetadataFetch(_) | Self::UnknownContentType { .. }
        )
    }
}
