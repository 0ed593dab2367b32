use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{QueueStore, StoreError};
use crate::types::StoredQueue;

/// In-memory queue storage (non-persistent)
///
/// Entries are never evicted; each session deletes its own record when it
/// is torn down.
#[derive(Debug, Default)]
pub struct MemoryQueueStore {
    data: RwLock<HashMap<String, StoredQueue>>,
}

impl MemoryQueueStore {
    /// Create a new in-memory storage
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions
    pub async fn len(&self) -> usize {
        self.data.read().await.len()
    }

    /// Whether nothing is stored
    pub async fn is_empty(&self) -> bool {
        self.data.read().await.is_empty()
    }

    /// List all stored session IDs
    pub async fn sessions(&self) -> Vec<String> {
        self.data.read().await.keys().cloned().collect()
    }
}

#[async_trait]
impl QueueStore for MemoryQueueStore {
    type Encoded = StoredQueue;

    async fn get(&self, session_id: &str) -> Result<Option<StoredQueue>, StoreError> {
        Ok(self.data.read().await.get(session_id).cloned())
    }

    async fn set(&self, session_id: &str, value: StoredQueue) -> Result<bool, StoreError> {
        self.data
            .write()
            .await
            .insert(session_id.to_string(), value);
        Ok(true)
    }

    async fn delete(&self, session_id: &str) -> Result<bool, StoreError> {
        Ok(self.data.write().await.remove(session_id).is_some())
    }

    fn serialize(&self, queue: StoredQueue) -> Result<StoredQueue, StoreError> {
        Ok(queue)
    }

    fn deserialize(&self, value: StoredQueue) -> Result<StoredQueue, StoreError> {
        Ok(value)
    }
}
