//! JSON-file backed content store.
//!
//! The whole file is one object mapping collection type names to their record
//! trees. It is read once, rewritten in memory and written back in one go.

use std::path::Path;

use async_trait::async_trait;
use imgfetch_core::{ContentStoreError, ContentStorePort, ContentTree};
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use tracing::debug;

pub struct JsonFileContentStore {
    collections: RwLock<Map<String, Value>>,
}

impl JsonFileContentStore {
    /// Load a content file from disk.
    pub async fn load(path: &Path) -> Result<Self, ContentStoreError> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ContentStoreError::Io(format!("{}: {e}", path.display())))?;
        let value: Value = serde_json::from_str(&raw).map_err(|e| {
            ContentStoreError::Serialization(format!("{}: {e}", path.display()))
        })?;
        let store = Self::from_value(value)?;
        debug!(path = %path.display(), "Loaded content file");
        Ok(store)
    }

    /// Wrap an in-memory content object.
    pub fn from_value(value: Value) -> Result<Self, ContentStoreError> {
        match value {
            Value::Object(collections) => Ok(Self {
                collections: RwLock::new(collections),
            }),
            _ => Err(ContentStoreError::Serialization(
                "content must be an object keyed by collection type name".to_string(),
            )),
        }
    }

    /// Write the current content to `path`, pretty-printed.
    pub async fn save(&self, path: &Path) -> Result<(), ContentStoreError> {
        let rendered = {
            let collections = self.collections.read().await;
            serde_json::to_string_pretty(&*collections)
                .map_err(|e| ContentStoreError::Serialization(e.to_string()))?
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ContentStoreError::Io(format!("{}: {e}", parent.display())))?;
        }
        tokio::fs::write(path, rendered + "\n")
            .await
            .map_err(|e| ContentStoreError::Io(format!("{}: {e}", path.display())))?;

        debug!(path = %path.display(), "Wrote content file");
        Ok(())
    }
}

#[async_trait]
impl ContentStorePort for JsonFileContentStore {
    async fn collection(&self, type_name: &str) -> Result<Option<ContentTree>, ContentStoreError> {
        Ok(self.collections.read().await.get(type_name).cloned())
    }

    async fn replace_collection(
        &self,
        type_name: &str,
        data: ContentTree,
    ) -> Result<(), ContentStoreError> {
        self.collections
            .write()
            .await
            .insert(type_name.to_string(), data);
        Ok(())
    }
}
