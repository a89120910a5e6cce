//! Local filesystem implementation of [`FileStorePort`] on top of `tokio::fs`.

use std::io::ErrorKind;
use std::path::Path;

use async_trait::async_trait;
use tokio::fs::{self, OpenOptions};

use crate::ports::{FileSink, FileStoreError, FileStorePort};

/// Filesystem store backed by `tokio::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioFileStore;

impl TokioFileStore {
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FileStorePort for TokioFileStore {
    async fn exists(&self, path: &Path) -> bool {
        fs::try_exists(path).await.unwrap_or(false)
    }

    async fn ensure_file(&self, path: &Path) -> Result<(), FileStoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| FileStoreError::from_io("create_dir_all", parent, &e))?;
        }

        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await
            .map_err(|e| FileStoreError::from_io("ensure_file", path, &e))?;
        Ok(())
    }

    async fn create_sink(&self, path: &Path) -> Result<FileSink, FileStoreError> {
        let file = fs::File::create(path)
            .await
            .map_err(|e| FileStoreError::from_io("create_sink", path, &e))?;
        Ok(Box::new(file))
    }

    async fn remove(&self, path: &Path) -> Result<(), FileStoreError> {
        match fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(FileStoreError::from_io("remove", path, &e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use tokio::io::AsyncWriteExt;

    #[tokio::test]
    async fn ensure_file_creates_parents_and_empty_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a/b/c.png");
        let store = TokioFileStore::new();

        assert!(!store.exists(&path).await);
        store.ensure_file(&path).await.unwrap();
        assert!(store.exists(&path).await);
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 0);
    }

    #[tokio::test]
    async fn ensure_file_keeps_existing_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("keep.png");
        std::fs::write(&path, b"data").unwrap();

        TokioFileStore::new().ensure_file(&path).await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"data");
    }

    #[tokio::test]
    async fn sink_truncates_and_writes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.bin");
        std::fs::write(&path, b"old content that is longer").unwrap();
        let store = TokioFileStore::new();

        let mut sink = store.create_sink(&path).await.unwrap();
        sink.write_all(b"new").await.unwrap();
        sink.shutdown().await.unwrap();
        drop(sink);

        assert_eq!(std::fs::read(&path).unwrap(), b"new");
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("gone.png");
        std::fs::write(&path, b"x").unwrap();
        let store = TokioFileStore::new();

        store.remove(&path).await.unwrap();
        assert!(!path.exists());
        store.remove(&path).await.unwrap();
    }
}
