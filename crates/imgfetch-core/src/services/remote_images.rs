//! Collection-level orchestration.
//!
//! Takes the record tree of one collection out of the content store, rewrites
//! the configured image field through the fetcher and stores the result.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use tracing::{info, instrument};

use super::image_fetcher::ImageFetcher;
use super::path_resolver::{LeafTransform, PathResolver, TraversalReport};
use crate::config::FetchConfig;
use crate::domain::{FetchOutcome, FetchSummary};
use crate::ports::{ContentStoreError, ContentStorePort, FileStorePort, HttpClientPort};

/// What happened to one collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionReport {
    pub type_name: String,
    pub traversal: TraversalReport,
    pub summary: FetchSummary,
}

/// Downloads the remote images referenced by a collection.
pub struct RemoteImageService {
    store: Arc<dyn ContentStorePort>,
    http: Arc<dyn HttpClientPort>,
    files: Arc<dyn FileStorePort>,
}

impl RemoteImageService {
    pub fn new(
        store: Arc<dyn ContentStorePort>,
        http: Arc<dyn HttpClientPort>,
        files: Arc<dyn FileStorePort>,
    ) -> Self {
        Self { store, http, files }
    }

    /// Rewrite the image field of every record in `config.type_name`.
    #[instrument(skip_all, fields(type_name = %config.type_name, field = %config.source_field))]
    pub async fn update_nodes(
        &self,
        config: &FetchConfig,
    ) -> Result<CollectionReport, ContentStoreError> {
        let tree = self
            .store
            .collection(&config.type_name)
            .await?
            .ok_or_else(|| ContentStoreError::CollectionNotFound {
                type_name: config.type_name.clone(),
            })?;

        let fetcher = ImageFetcher::new(
            Arc::new(config.clone()),
            Arc::clone(&self.http),
            Arc::clone(&self.files),
        );
        let counting = CountingTransform::new(&fetcher);
        let resolver = PathResolver::new(config.source_field.clone());

        let (tree, traversal) = resolver.traverse_and_replace(tree, &counting).await;
        self.store.replace_collection(&config.type_name, tree).await?;

        let summary = counting.summary();
        info!(
            leaves = traversal.leaves,
            downloaded = summary.downloaded,
            cached = summary.cached,
            local = summary.local,
            fallback = summary.fallback,
            unchanged = summary.unchanged,
            "Remote images processed"
        );

        Ok(CollectionReport {
            type_name: config.type_name.clone(),
            traversal,
            summary,
        })
    }
}

/// Wraps the fetcher to tally outcomes before they are reduced to strings.
struct CountingTransform<'a> {
    fetcher: &'a ImageFetcher,
    summary: Mutex<FetchSummary>,
}

impl<'a> CountingTransform<'a> {
    fn new(fetcher: &'a ImageFetcher) -> Self {
        Self {
            fetcher,
            summary: Mutex::new(FetchSummary::default()),
        }
    }

    fn summary(&self) -> FetchSummary {
        *self.summary.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl LeafTransform for CountingTransform<'_> {
    async fn transform(&self, sources: Vec<String>) -> Vec<String> {
        let outcomes = self.fetcher.fetch_all(&sources).await;
        {
            let mut summary = self.summary.lock().unwrap_or_else(PoisonError::into_inner);
            for outcome in &outcomes {
                summary.record(outcome);
            }
        }
        outcomes.into_iter().map(FetchOutcome::into_value).collect()
    }
}
