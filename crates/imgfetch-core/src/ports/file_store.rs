//! Filesystem port used for cache checks and downloads.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tokio::io::AsyncWrite;

/// Errors from filesystem port operations.
///
/// Captures the operation, path and message rather than `std::io::Error`
/// so the type stays `Clone`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{operation} failed for {}: {message}", path.display())]
pub struct FileStoreError {
    /// The operation that failed (`ensure_file`, `remove`, ...).
    pub operation: &'static str,
    pub path: PathBuf,
    pub message: String,
}

impl FileStoreError {
    pub fn from_io(operation: &'static str, path: &Path, err: &std::io::Error) -> Self {
        Self {
            operation,
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }
}

/// Writable sink for a downloaded body.
pub type FileSink = Box<dyn AsyncWrite + Send + Unpin>;

#[async_trait]
pub trait FileStorePort: Send + Sync {
    /// Whether a file exists at `path`.
    async fn exists(&self, path: &Path) -> bool;

    /// Create `path` (and its parent directories) as an empty file if missing.
    async fn ensure_file(&self, path: &Path) -> Result<(), FileStoreError>;

    /// Open `path` for writing, truncating existing content.
    async fn create_sink(&self, path: &Path) -> Result<FileSink, FileStoreError>;

    /// Remove the file at `path`. Removing a missing file is not an error.
    async fn remove(&self, path: &Path) -> Result<(), FileStoreError>;
}
