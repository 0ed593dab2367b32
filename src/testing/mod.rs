//! Test doubles for queues: recording and failing watchers, a failing store,
//! and track constructors.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use crate::state::{QueueChangesWatcher, WatcherResult};
use crate::store::{MemoryQueueStore, QueueStore, StoreError};
use crate::types::{QueueTrack, StoredQueue, Track, TrackInfo, UnresolvedTrack};

/// Resolved track whose identifier is `id` and encoded form `enc-{id}`
#[must_use]
pub fn track(id: &str) -> Track {
    Track::new(
        format!("enc-{id}"),
        TrackInfo::new().with_identifier(id).with_title(format!("Title {id}")),
    )
}

/// [`track`] wrapped as a queue entry
#[must_use]
pub fn queued(id: &str) -> QueueTrack {
    track(id).into()
}

/// Resolved track with a duration in milliseconds
#[must_use]
pub fn track_with_duration(id: &str, duration_ms: u64) -> QueueTrack {
    let mut t = track(id);
    t.info.duration = Some(duration_ms);
    t.into()
}

/// Unresolved track known only by title
#[must_use]
pub fn unresolved(title: &str) -> QueueTrack {
    UnresolvedTrack::new(TrackInfo::new().with_title(title)).into()
}

/// Identifiers of the given entries, in order
#[must_use]
pub fn ids(tracks: &[QueueTrack]) -> Vec<String> {
    tracks
        .iter()
        .map(|t| t.info().identifier.clone().unwrap_or_default())
        .collect()
}

/// One recorded watcher call
#[derive(Debug, Clone, PartialEq)]
pub enum WatcherCall {
    /// `tracks_add` was called
    TracksAdd {
        /// Added tracks
        added: Vec<QueueTrack>,
        /// Insertion position
        at_index: usize,
        /// Snapshot before
        before: StoredQueue,
        /// Snapshot after
        after: StoredQueue,
    },
    /// `tracks_removed` was called
    TracksRemoved {
        /// Removed tracks
        removed: Vec<QueueTrack>,
        /// Requested positions
        indices: Vec<usize>,
        /// Snapshot before
        before: StoredQueue,
        /// Snapshot after
        after: StoredQueue,
    },
    /// `shuffled` was called
    Shuffled {
        /// Snapshot before
        before: StoredQueue,
        /// Snapshot after
        after: StoredQueue,
    },
}

/// Watcher that records every call
#[derive(Debug, Default)]
pub struct RecordingWatcher {
    calls: Mutex<Vec<WatcherCall>>,
}

impl RecordingWatcher {
    /// Create an empty recorder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All calls so far
    #[must_use]
    pub fn calls(&self) -> Vec<WatcherCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, call: WatcherCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

impl QueueChangesWatcher for RecordingWatcher {
    fn tracks_add(
        &self,
        _session_id: &str,
        added: &[QueueTrack],
        at_index: usize,
        before: &StoredQueue,
        after: &StoredQueue,
    ) -> WatcherResult {
        self.record(WatcherCall::TracksAdd {
            added: added.to_vec(),
            at_index,
            before: before.clone(),
            after: after.clone(),
        });
        Ok(())
    }

    fn tracks_removed(
        &self,
        _session_id: &str,
        removed: &[QueueTrack],
        indices: &[usize],
        before: &StoredQueue,
        after: &StoredQueue,
    ) -> WatcherResult {
        self.record(WatcherCall::TracksRemoved {
            removed: removed.to_vec(),
            indices: indices.to_vec(),
            before: before.clone(),
            after: after.clone(),
        });
        Ok(())
    }

    fn shuffled(
        &self,
        _session_id: &str,
        before: &StoredQueue,
        after: &StoredQueue,
    ) -> WatcherResult {
        self.record(WatcherCall::Shuffled {
            before: before.clone(),
            after: after.clone(),
        });
        Ok(())
    }
}

/// Watcher whose hooks always fail
#[derive(Debug, Default)]
pub struct FailingWatcher;

impl QueueChangesWatcher for FailingWatcher {
    fn tracks_add(
        &self,
        _session_id: &str,
        _added: &[QueueTrack],
        _at_index: usize,
        _before: &StoredQueue,
        _after: &StoredQueue,
    ) -> WatcherResult {
        Err("tracks_add hook failed".into())
    }

    fn tracks_removed(
        &self,
        _session_id: &str,
        _removed: &[QueueTrack],
        _indices: &[usize],
        _before: &StoredQueue,
        _after: &StoredQueue,
    ) -> WatcherResult {
        Err("tracks_removed hook failed".into())
    }

    fn shuffled(
        &self,
        _session_id: &str,
        _before: &StoredQueue,
        _after: &StoredQueue,
    ) -> WatcherResult {
        Err("shuffled hook failed".into())
    }
}

/// Memory store whose writes can be switched to fail
#[derive(Debug, Default)]
pub struct FailingStore {
    inner: MemoryQueueStore,
    fail_writes: AtomicBool,
}

impl FailingStore {
    /// Create a store that fails every write from the start
    #[must_use]
    pub fn failing() -> Self {
        let store = Self::default();
        store.set_failing(true);
        store
    }

    /// Toggle write failures
    pub fn set_failing(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(StoreError::NotAvailable)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl QueueStore for FailingStore {
    type Encoded = StoredQueue;

    async fn get(&self, session_id: &str) -> Result<Option<StoredQueue>, StoreError> {
        self.inner.get(session_id).await
    }

    async fn set(&self, session_id: &str, value: StoredQueue) -> Result<bool, StoreError> {
        self.check()?;
        self.inner.set(session_id, value).await
    }

    async fn delete(&self, session_id: &str) -> Result<bool, StoreError> {
        self.check()?;
        self.inner.delete(session_id).await
    }

    fn serialize(&self, queue: StoredQueue) -> Result<StoredQueue, StoreError> {
        Ok(queue)
    }

    fn deserialize(&self, value: StoredQueue) -> Result<StoredQueue, StoreError> {
        Ok(value)
    }
}
