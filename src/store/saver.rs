use std::sync::Arc;

use async_trait::async_trait;

use super::{QueueStore, StoreError};
use crate::control::QueueBuilder;
use crate::types::{QueueOptions, StoredQueue};

/// Object-safe view of a `QueueStore` that hides its encoded form
#[async_trait]
trait SnapshotStore: Send + Sync {
    async fn load(&self, session_id: &str) -> Result<Option<StoredQueue>, StoreError>;
    async fn save(&self, session_id: &str, queue: StoredQueue) -> Result<bool, StoreError>;
    async fn remove(&self, session_id: &str) -> Result<bool, StoreError>;
}

#[async_trait]
impl<S: QueueStore> SnapshotStore for S {
    async fn load(&self, session_id: &str) -> Result<Option<StoredQueue>, StoreError> {
        match self.get(session_id).await? {
            Some(value) => self.deserialize(value).map(Some),
            None => Ok(None),
        }
    }

    async fn save(&self, session_id: &str, queue: StoredQueue) -> Result<bool, StoreError> {
        let value = self.serialize(queue)?;
        self.set(session_id, value).await
    }

    async fn remove(&self, session_id: &str) -> Result<bool, StoreError> {
        self.delete(session_id).await
    }
}

/// Coordinates a `QueueStore` for every queue created against it
///
/// Cheap to clone; clones share the same backend.
#[derive(Clone)]
pub struct QueueSaver {
    store: Arc<dyn SnapshotStore>,
    options: QueueOptions,
}

impl QueueSaver {
    /// Create a saver over the given backend
    pub fn new<S>(store: S, options: QueueOptions) -> Self
    where
        S: QueueStore + 'static,
    {
        Self::from_arc(Arc::new(store), options)
    }

    /// Create a saver over a backend the host keeps a handle to
    pub fn from_arc<S>(store: Arc<S>, options: QueueOptions) -> Self
    where
        S: QueueStore + 'static,
    {
        let options = QueueOptions {
            max_previous_tracks: options.history_cap(),
        };
        Self { store, options }
    }

    /// Options inherited by queues created against this saver
    #[must_use]
    pub fn options(&self) -> QueueOptions {
        self.options
    }

    /// Load the snapshot for a session
    ///
    /// # Errors
    ///
    /// Returns error if the backend fails or the value cannot be decoded
    pub async fn get(&self, session_id: &str) -> Result<Option<StoredQueue>, StoreError> {
        tracing::trace!(session_id, "Loading queue snapshot");
        self.store.load(session_id).await
    }

    /// Store the snapshot for a session
    ///
    /// # Errors
    ///
    /// Returns error if the snapshot cannot be encoded or stored
    pub async fn set(&self, session_id: &str, queue: StoredQueue) -> Result<bool, StoreError> {
        tracing::trace!(
            session_id,
            tracks = queue.tracks.len(),
            previous = queue.previous.len(),
            "Saving queue snapshot"
        );
        self.store.save(session_id, queue).await
    }

    /// Remove the snapshot for a session
    ///
    /// # Errors
    ///
    /// Returns error if removal fails
    pub async fn delete(&self, session_id: &str) -> Result<bool, StoreError> {
        tracing::trace!(session_id, "Deleting queue snapshot");
        self.store.remove(session_id).await
    }

    /// Same as [`get`](Self::get)
    ///
    /// # Errors
    ///
    /// Returns error if the backend fails or the value cannot be decoded
    pub async fn sync(&self, session_id: &str) -> Result<Option<StoredQueue>, StoreError> {
        self.get(session_id).await
    }

    /// Start building a queue for a session, seeded from the stored snapshot
    ///
    /// A session with no stored record starts empty.
    ///
    /// # Errors
    ///
    /// Returns error if the backend fails or the value cannot be decoded
    pub async fn restore(&self, session_id: impl Into<String>) -> Result<QueueBuilder, StoreError> {
        let session_id = session_id.into();
        let stored = self.get(&session_id).await?;
        tracing::debug!(session_id = %session_id, found = stored.is_some(), "Restoring queue");

        let builder = QueueBuilder::new(session_id, self.clone());
        Ok(match stored {
            Some(data) => builder.with_data(data),
            None => builder,
        })
    }
}

impl std::fmt::Debug for QueueSaver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueueSaver")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
