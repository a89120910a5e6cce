//! The per-source fetch pipeline.
//!
//! normalize -> classify -> derive name/extension -> compute target ->
//! cache check -> streamed download. Every failure is local to its source
//! and ends in a fallback outcome.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, Weak};

use async_trait::async_trait;
use futures_util::StreamExt;
use futures_util::future::join_all;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};
use url::Url;

use super::error::FetchError;
use super::path_resolver::LeafTransform;
use crate::config::FetchConfig;
use crate::domain::FetchOutcome;
use crate::extension::extension_for_content_type;
use crate::naming::{UrlPathParts, target_file};
use crate::ports::{FileStoreError, FileStorePort, HttpClientPort};
use crate::source::{SourceClass, classify, normalize};

/// Resolves image sources to local paths for one configuration.
pub struct ImageFetcher {
    config: Arc<FetchConfig>,
    http: Arc<dyn HttpClientPort>,
    files: Arc<dyn FileStorePort>,
    locks: PathLocks,
}

impl ImageFetcher {
    pub fn new(
        config: Arc<FetchConfig>,
        http: Arc<dyn HttpClientPort>,
        files: Arc<dyn FileStorePort>,
    ) -> Self {
        Self {
            config,
            http,
            files,
            locks: PathLocks::default(),
        }
    }

    /// Resolve every source concurrently.
    ///
    /// Returns exactly one outcome per source, in input order.
    pub async fn fetch_all(&self, sources: &[String]) -> Vec<FetchOutcome> {
        join_all(sources.iter().map(|source| self.fetch_one(source))).await
    }

    /// Resolve a single source. Never fails; errors become fallback outcomes.
    pub async fn fetch_one(&self, raw: &str) -> FetchOutcome {
        let normalized = match normalize(raw, &self.config.normalization) {
            Ok(normalized) => normalized,
            Err(e) => {
                debug!(source = raw, error = %FetchError::from(e), "Keeping source as is");
                return FetchOutcome::OriginalValueUnchanged(raw.to_string());
            }
        };

        let url = match classify(&normalized, self.config.download_from_local_network) {
            SourceClass::Local => {
                debug!(source = %normalized, "Local source, not downloading");
                return FetchOutcome::LocalPathUnchanged(normalized);
            }
            SourceClass::Remote(url) => url,
        };

        match self.fetch_remote(&normalized, &url).await {
            Ok(outcome) => outcome,
            Err(e) => {
                if e.is_metadata_failure() {
                    warn!(
                        type_name = %self.config.type_name,
                        source = %normalized,
                        error = %e,
                        "Unable to get image type"
                    );
                } else {
                    warn!(
                        type_name = %self.config.type_name,
                        source = %normalized,
                        error = %e,
                        "Unable to download image"
                    );
                }
                self.fallback(normalized)
            }
        }
    }

    async fn fetch_remote(&self, normalized: &str, url: &Url) -> Result<FetchOutcome, FetchError> {
        let parts = UrlPathParts::from_url(url);
        let ext = if parts.ext.is_empty() {
            self.sniff_extension(url).await?
        } else {
            parts.ext.clone()
        };

        let target = target_file(&self.config, normalized, &parts, &ext);

        // One writer per target path; later sources see the finished file
        let lock = self.locks.lock_for(&target.path);
        let _guard = lock.lock().await;

        if self.config.cache && self.files.exists(&target.path).await {
            debug!(source = %normalized, path = %target.relative, "Using cached image");
            return Ok(FetchOutcome::CachedLocalPath(target.relative));
        }

        let bytes = self.download(url, &target.path).await?;
        info!(source = %normalized, path = %target.relative, bytes, "Downloaded image");
        Ok(FetchOutcome::DownloadedLocalPath(target.relative))
    }

    async fn sniff_extension(&self, url: &Url) -> Result<String, FetchError> {
        let metadata = self
            .http
            .head_metadata(url)
            .await
            .map_err(FetchError::MetadataFetch)?;

        match metadata.content_type.as_deref().and_then(extension_for_content_type) {
            Some(ext) => Ok(ext),
            None => Err(FetchError::UnknownContentType {
                content_type: metadata.content_type,
            }),
        }
    }

    /// Stream the body to `path`, removing the file again on any failure.
    async fn download(&self, url: &Url, path: &Path) -> Result<u64, FetchError> {
        match self.write_body(url, path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) => {
                if let Err(cleanup) = self.files.remove(path).await {
                    warn!(path = %path.display(), error = %cleanup, "Failed to remove partial download");
                }
                Err(e)
            }
        }
    }

    async fn write_body(&self, url: &Url, path: &Path) -> Result<u64, FetchError> {
        self.files.ensure_file(path).await?;

        let mut body = self
            .http
            .stream_body(url)
            .await
            .map_err(FetchError::Download)?;
        let mut sink = self.files.create_sink(path).await?;

        let mut written: u64 = 0;
        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(FetchError::Download)?;
            sink.write_all(&chunk)
                .await
                .map_err(|e| FileStoreError::from_io("write", path, &e))?;
            written += chunk.len() as u64;
        }

        sink.shutdown()
            .await
            .map_err(|e| FileStoreError::from_io("flush", path, &e))?;
        Ok(written)
    }

    fn fallback(&self, normalized: String) -> FetchOutcome {
        FetchOutcome::FallbackValue(self.config.fallback_image.clone().unwrap_or(normalized))
    }
}

#[async_trait]
impl LeafTransform for ImageFetcher {
    async fn transform(&self, sources: Vec<String>) -> Vec<String> {
        self.fetch_all(&sources)
            .await
            .into_iter()
            .map(FetchOutcome::into_value)
            .collect()
    }
}

/// Async locks keyed by target path.
///
/// Entries are weak so the map only holds paths with a live holder or waiter.
#[derive(Default)]
struct PathLocks {
    inner: Mutex<HashMap<PathBuf, Weak<tokio::sync::Mutex<()>>>>,
}

impl PathLocks {
    fn lock_for(&self, path: &Path) -> Arc<tokio::sync::Mutex<()>> {
        let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        map.retain(|_, lock| lock.strong_count() > 0);

        if let Some(existing) = map.get(path).and_then(Weak::upgrade) {
            return existing;
        }

        let lock = Arc::new(tokio::sync::Mutex::new(()));
        map.insert(path.to_path_buf(), Arc::downgrade(&lock));
        lock
    }
}
