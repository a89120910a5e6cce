//! Fake ports and transforms for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::StreamExt;
use url::Url;

use crate::domain::ContentTree;
use crate::ports::{
    ByteStream, ContentStoreError, ContentStorePort, HeadMetadata, HttpClientPort, HttpPortError,
    HttpPortResult,
};
use crate::services::LeafTransform;

/// Transform that records its inputs.
pub struct RecordingTransform {
    prefix: String,
    drop_results: bool,
    calls: Mutex<Vec<Vec<String>>>,
}

impl RecordingTransform {
    /// Returns every source with `prefix` prepended.
    pub fn prefix(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            drop_results: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Misbehaving transform that always returns nothing.
    pub fn dropping() -> Self {
        Self {
            drop_results: true,
            ..Self::prefix("")
        }
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LeafTransform for RecordingTransform {
    async fn transform(&self, sources: Vec<String>) -> Vec<String> {
        self.calls.lock().unwrap().push(sources.clone());
        if self.drop_results {
            return Vec::new();
        }
        sources
            .into_iter()
            .map(|s| format!("{}{s}", self.prefix))
            .collect()
    }
}

/// Canned remote resource for [`FakeHttp`].
#[derive(Clone, Default)]
pub struct FakeResource {
    content_type: Option<String>,
    chunks: Vec<Bytes>,
    status: Option<u16>,
    fail_after: Option<usize>,
    delay: Option<Duration>,
}

impl FakeResource {
    pub fn image(content_type: &str, chunks: &[&[u8]]) -> Self {
        Self {
            content_type: Some(content_type.to_string()),
            chunks: chunks.iter().map(|c| Bytes::copy_from_slice(c)).collect(),
            ..Self::default()
        }
    }

    /// Every request fails with `status`.
    pub fn status(status: u16) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// The body stream errors after `chunks` chunks.
    pub const fn failing_after(mut self, chunks: usize) -> Self {
        self.fail_after = Some(chunks);
        self
    }

    pub const fn with_delay_ms(mut self, ms: u64) -> Self {
        self.delay = Some(Duration::from_millis(ms));
        self
    }
}

/// In-memory HTTP port keyed by full URL. Unknown URLs answer 404.
#[derive(Default)]
pub struct FakeHttp {
    resources: HashMap<String, FakeResource>,
    head_calls: AtomicUsize,
    get_calls: AtomicUsize,
}

impl FakeHttp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resource(mut self, url: &str, resource: FakeResource) -> Self {
        self.resources.insert(url.to_string(), resource);
        self
    }

    pub fn head_calls(&self) -> usize {
        self.head_calls.load(Ordering::SeqCst)
    }

    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    fn find(&self, url: &Url) -> HttpPortResult<FakeResource> {
        let resource = self
            .resources
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| HttpPortError::Status {
                status: 404,
                url: url.to_string(),
            })?;

        if let Some(status) = resource.status {
            return Err(HttpPortError::Status {
                status,
                url: url.to_string(),
            });
        }
        Ok(resource)
    }
}

#[async_trait]
impl HttpClientPort for FakeHttp {
    async fn head_metadata(&self, url: &Url) -> HttpPortResult<HeadMetadata> {
        self.head_calls.fetch_add(1, Ordering::SeqCst);
        let resource = self.find(url)?;
        Ok(HeadMetadata {
            content_type: resource.content_type,
        })
    }

    async fn stream_body(&self, url: &Url) -> HttpPortResult<ByteStream> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        let resource = self.find(url)?;
        if let Some(delay) = resource.delay {
            tokio::time::sleep(delay).await;
        }

        let mut items: Vec<HttpPortResult<Bytes>> = resource.chunks.into_iter().map(Ok).collect();
        if let Some(keep) = resource.fail_after {
            items.truncate(keep);
            items.push(Err(HttpPortError::network("connection reset by peer")));
        }
        Ok(futures_util::stream::iter(items).boxed())
    }
}

/// Content store holding trees in memory.
#[derive(Default)]
pub struct InMemoryContentStore {
    collections: Mutex<HashMap<String, ContentTree>>,
}

impl InMemoryContentStore {
    pub fn with_collection(self, type_name: &str, data: ContentTree) -> Self {
        self.collections
            .lock()
            .unwrap()
            .insert(type_name.to_string(), data);
        self
    }

    pub fn get(&self, type_name: &str) -> Option<ContentTree> {
        self.collections.lock().unwrap().get(type_name).cloned()
    }
}

#[async_trait]
impl ContentStorePort for InMemoryContentStore {
    async fn collection(&self, type_name: &str) -> Result<Option<ContentTree>, ContentStoreError> {
        Ok(self.get(type_name))
    }

    async fn replace_collection(
        &self,
        type_name: &str,
        data: ContentTree,
    ) -> Result<(), ContentStoreError> {
        self.collections
            .lock()
            .unwrap()
            .insert(type_name.to_string(), data);
        Ok(())
    }
}
