//! Content store port: the host's in-memory collection of records.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::ContentTree;

/// Errors from content store operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ContentStoreError {
    #[error("Collection not found: {type_name}")]
    CollectionNotFound { type_name: String },

    #[error("Content store I/O error: {0}")]
    Io(String),

    #[error("Content store serialization error: {0}")]
    Serialization(String),
}

/// Access to the record tree of a collection.
///
/// The store owns the trees; the service takes one out, rewrites it and
/// hands it back, and the store is responsible for persisting it.
#[async_trait]
pub trait ContentStorePort: Send + Sync {
    /// The record tree of `type_name`, or `None` if there is no such collection.
    async fn collection(&self, type_name: &str) -> Result<Option<ContentTree>, ContentStoreError>;

    /// Replace the record tree of `type_name`.
    async fn replace_collection(
        &self,
        type_name: &str,
        data: ContentTree,
    ) -> Result<(), ContentStoreError>;
}
