use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{QueueStore, StoreError};
use crate::types::StoredQueue;

/// File-based queue storage
///
/// Every session is kept as a JSON string inside a single JSON object on
/// disk. The whole file is rewritten on each `set` and `delete`.
#[derive(Debug)]
pub struct FileQueueStore {
    path: PathBuf,
    cache: RwLock<HashMap<String, String>>,
}

impl FileQueueStore {
    /// Open file storage at the given path
    ///
    /// # Errors
    ///
    /// Returns error if directory cannot be created or file loaded
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let cache = Self::load_all(&path).await?;
        tracing::debug!(path = %path.display(), sessions = cache.len(), "Opened queue file store");

        Ok(Self {
            path,
            cache: RwLock::new(cache),
        })
    }

    /// Path of the backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load_all(path: &Path) -> Result<HashMap<String, String>, StoreError> {
        if !tokio::fs::try_exists(path).await? {
            return Ok(HashMap::new());
        }

        let bytes = tokio::fs::read(path).await?;
        if bytes.is_empty() {
            return Ok(HashMap::new());
        }

        let cache = tokio::task::spawn_blocking(move || serde_json::from_slice(&bytes))
            .await
            .map_err(|e| StoreError::Serialization(format!("Deserialization task failed: {e}")))??;

        Ok(cache)
    }

    async fn save_all(&self, cache: &HashMap<String, String>) -> Result<(), StoreError> {
        let path = self.path.clone();
        let cache = cache.clone();

        let bytes = tokio::task::spawn_blocking(move || serde_json::to_vec_pretty(&cache))
            .await
            .map_err(|e| StoreError::Serialization(format!("Serialization task failed: {e}")))??;

        tokio::fs::write(path, bytes).await?;
        Ok(())
    }
}

#[async_trait]
impl QueueStore for FileQueueStore {
    type Encoded = String;

    async fn get(&self, session_id: &str) -> Result<Option<String>, StoreError> {
        Ok(self.cache.read().await.get(session_id).cloned())
    }

    async fn set(&self, session_id: &str, value: String) -> Result<bool, StoreError> {
        let mut cache = self.cache.write().await;
        cache.insert(session_id.to_string(), value);
        self.save_all(&cache).await?;
        Ok(true)
    }

    async fn delete(&self, session_id: &str) -> Result<bool, StoreError> {
        let mut cache = self.cache.write().await;
        if cache.remove(session_id).is_none() {
            return Ok(false);
        }
        self.save_all(&cache).await?;
        Ok(true)
    }

    fn serialize(&self, queue: StoredQueue) -> Result<String, StoreError> {
        Ok(serde_json::to_string(&queue)?)
    }

    fn deserialize(&self, value: String) -> Result<StoredQueue, StoreError> {
        StoredQueue::from_json_str(&value).map_err(|e| {
            tracing::warn!("Stored queue is not valid JSON: {}", e);
            StoreError::from(e)
        })
    }
}
