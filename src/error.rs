use thiserror::Error;

use crate::store::StoreError;

/// Errors that can occur during queue operations
#[derive(Debug, Error)]
pub enum QueueError {
    /// The backend holds no record for the session
    #[error("no data found to sync for session: {session_id}")]
    NotFound {
        /// The session whose record is missing
        session_id: String,
    },

    /// The persistence backend failed
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
}

impl QueueError {
    /// Check if this error means the backend has no record
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error came from the persistence backend
    #[must_use]
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}

/// Result type alias for queue operations
pub type Result<T> = std::result::Result<T, QueueError>;
