//! Core of imgfetch: locate image references inside content trees, download
//! the remote ones to deterministic local paths and rewrite the references.
//!
//! # Layout
//!
//! - `domain` - content tree, field paths and fetch outcomes
//! - `config` - user options, defaults and validation
//! - `source` - URL normalization and the local/remote classification
//! - `naming` - deterministic target paths for downloaded files
//! - `ports` - HTTP, filesystem and content store abstractions
//! - `services` - path resolver, image fetcher and the orchestrating service
//! - `fs` - tokio-backed implementation of the filesystem port
#![deny(unused_crate_dependencies)]

pub mod config;
pub mod domain;
pub mod extension;
pub mod fs;
pub mod naming;
pub mod ports;
pub mod services;
pub mod source;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types for convenience
pub use config::{
    ConfigError, DEFAULT_SOURCE_ROOT, DEFAULT_TARGET_PATH, FetchConfig, FetchOptions,
    UrlNormalization, validate_options,
};
pub use domain::{ContentTree, FetchOutcome, FetchSummary, FieldPath, FieldPathError, OutcomeKind};
pub use fs::TokioFileStore;
pub use ports::{
    ByteStream, ContentStoreError, ContentStorePort, FileSink, FileStoreError, FileStorePort,
    HeadMetadata, HttpClientPort, HttpPortError, HttpPortResult,
};
pub use services::{
    CollectionReport, FetchError, ImageFetcher, LeafTransform, PathResolver, RemoteImageService,
    TraversalReport,
};
