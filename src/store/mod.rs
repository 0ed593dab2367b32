//! Pluggable persistence for queues
//!
//! A backend implements [`QueueStore`] and is handed to a [`QueueSaver`],
//! which every [`Queue`](crate::Queue) uses to load and persist its snapshot.
//! The backend chooses its own transport form through the `serialize` and
//! `deserialize` hooks.

mod file;
mod memory;
mod saver;


use async_trait::async_trait;

use crate::types::StoredQueue;

pub use file::FileQueueStore;
pub use memory::MemoryQueueStore;
pub use saver::QueueSaver;

/// Abstract storage interface for queue snapshots, keyed by session id
#[async_trait]
pub trait QueueStore: Send + Sync {
    /// Form the backend keeps a snapshot in
    type Encoded: Send + Sync + 'static;

    /// Load the stored value for a session
    ///
    /// # Errors
    ///
    /// Returns error if the backend cannot be read
    async fn get(&self, session_id: &str) -> Result<Option<Self::Encoded>, StoreError>;

    /// Store the value for a session
    ///
    /// # Errors
    ///
    /// Returns error if storage fails
    async fn set(&self, session_id: &str, value: Self::Encoded) -> Result<bool, StoreError>;

    /// Remove the value for a session
    ///
    /// # Errors
    ///
    /// Returns error if removal fails
    async fn delete(&self, session_id: &str) -> Result<bool, StoreError>;

    /// Convert a snapshot into the stored form
    ///
    /// # Errors
    ///
    /// Returns error if the snapshot cannot be encoded
    fn serialize(&self, queue: StoredQueue) -> Result<Self::Encoded, StoreError>;

    /// Convert the stored form back into a snapshot
    ///
    /// # Errors
    ///
    /// Returns error if the value cannot be decoded
    fn deserialize(&self, value: Self::Encoded) -> Result<StoredQueue, StoreError>;
}

/// Storage errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("storage not available")]
    NotAvailable,

    #[error("backend error: {message}")]
    Backend {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
