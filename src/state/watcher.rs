//! Audit hooks for queue changes

use crate::types::{QueueTrack, StoredQueue};

/// Error a watcher hook may report; it is logged and discarded
pub type WatcherError = Box<dyn std::error::Error + Send + Sync>;

/// Outcome of a watcher hook
pub type WatcherResult = Result<(), WatcherError>;

/// Observer notified synchronously after queue mutations
///
/// All hooks default to doing nothing. `before` and `after` are snapshots
/// taken around the mutation. Errors returned by a hook never change the
/// outcome of the mutation that triggered it.
pub trait QueueChangesWatcher: Send + Sync {
    /// Tracks were inserted starting at `at_index`
    fn tracks_add(
        &self,
        _session_id: &str,
        _added: &[QueueTrack],
        _at_index: usize,
        _before: &StoredQueue,
        _after: &StoredQueue,
    ) -> WatcherResult {
        Ok(())
    }

    /// Tracks were removed; `indices` are the positions the caller asked for
    fn tracks_removed(
        &self,
        _session_id: &str,
        _removed: &[QueueTrack],
        _indices: &[usize],
        _before: &StoredQueue,
        _after: &StoredQueue,
    ) -> WatcherResult {
        Ok(())
    }

    /// The pending tracks were shuffled
    fn shuffled(
        &self,
        _session_id: &str,
        _before: &StoredQueue,
        _after: &StoredQueue,
    ) -> WatcherResult {
        Ok(())
    }
}

/// Run a hook and drop its error
///
/// Returns whether the hook succeeded so callers and tests can observe it.
pub(crate) fn notify(session_id: &str, hook: &str, result: WatcherResult) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            tracing::debug!(session_id, hook, error = %e, "Queue watcher hook failed");
            false
        }
    }
}
