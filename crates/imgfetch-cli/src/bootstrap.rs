//! CLI bootstrap - the composition root.
//!
//! This is the only place where concrete adapters are instantiated:
//! - reqwest HTTP client (via imgfetch-http)
//! - tokio filesystem store (via imgfetch-core)
//!
//! Handlers receive the composed [`CliContext`] and build services from it.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use imgfetch_core::{
    ContentStorePort, FileStorePort, HttpClientPort, RemoteImageService, TokioFileStore,
};
use imgfetch_http::{HttpClientConfig, ReqwestHttpClient};
use tracing::debug;

use crate::error::CliError;

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Directory option paths are resolved against.
    pub project_root: PathBuf,
    /// Per-request HTTP timeout.
    pub timeout: Duration,
}

impl CliConfig {
    /// Create config with default settings.
    pub fn with_defaults() -> Self {
        Self {
            project_root: PathBuf::from("."),
            timeout: Duration::from_secs(30),
        }
    }

    #[must_use]
    pub fn with_project_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.project_root = root.into();
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Fully composed adapters for CLI commands.
pub struct CliContext {
    pub http: Arc<dyn HttpClientPort>,
    pub files: Arc<dyn FileStorePort>,
    pub project_root: PathBuf,
}

impl CliContext {
    /// Service bound to `store` and this context's adapters.
    pub fn remote_images(&self, store: Arc<dyn ContentStorePort>) -> RemoteImageService {
        RemoteImageService::new(store, Arc::clone(&self.http), Arc::clone(&self.files))
    }
}

/// Bootstrap the CLI application.
pub fn bootstrap(config: CliConfig) -> Result<CliContext, CliError> {
    let http_config = HttpClientConfig::new().with_timeout(config.timeout);
    let http = ReqwestHttpClient::new(&http_config)?;
    debug!(
        timeout_secs = config.timeout.as_secs(),
        user_agent = http_config.user_agent(),
        "HTTP client ready"
    );

    Ok(CliContext {
        http: Arc::new(http),
        files: Arc::new(TokioFileStore::new()),
        project_root: config.project_root,
    })
}
