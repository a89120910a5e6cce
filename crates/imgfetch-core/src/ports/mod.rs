//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the core pipeline expects from
//! infrastructure. They contain no implementation details.
//!
//! # Design Rules
//!
//! - No `reqwest` types in any signature
//! - Errors are core-owned; adapters map their own errors at the boundary
//! - Async methods for anything that may touch the network or the disk

pub mod content_store;
pub mod file_store;
pub mod http;

pub use content_store::{ContentStoreError, ContentStorePort};
pub use file_store::{FileSink, FileStoreError, FileStorePort};
pub use http::{ByteStream, HeadMetadata, HttpClientPort, HttpPortError, HttpPortResult};

#[cfg(test)]
pub use http::MockHttpClientPort;
