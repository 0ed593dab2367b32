//! # playqueue
//!
//! Ordered playback queue for a single session, with a bounded history,
//! pluggable persistence and change notifications.
//!
//! ## Features
//!
//! - Append, splice, identity-based removal, clear and shuffle
//! - History capped at a configurable length
//! - Storage-agnostic persistence through [`QueueStore`]
//! - Domain events on an [`EventBus`] and audit hooks through
//!   [`QueueChangesWatcher`]
//!
//! ## Example
//!
//! ```rust,no_run
//! use playqueue::{MemoryQueueStore, QueueOptions, QueueSaver, Track, TrackInfo};
//!
//! # async fn example() -> Result<(), playqueue::QueueError> {
//! let saver = QueueSaver::new(MemoryQueueStore::new(), QueueOptions::default());
//! let mut queue = saver.restore("guild-1").await?.build();
//!
//! let track = Track::new("QAAA...", TrackInfo::new().with_title("Intro"));
//! queue.add([track], None).await?;
//! queue.shuffle().await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - **Queue**: [`Queue`] owns the in-memory state and every mutation
//! - **Persistence**: [`QueueSaver`] wraps a [`QueueStore`] backend
//! - **Notification**: [`EventBus`] for domain events, [`QueueChangesWatcher`] for audit

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Public modules
/// Error types
pub mod error;
/// Change notification
pub mod state;
/// Persistence backends
pub mod store;
/// Core types
pub mod types;

/// Testing utilities
pub mod testing;

pub mod control;

// Re-exports
pub use control::{
    Queue, QueueBuilder, RemoveQuery, RemoveTarget, RemovedTracks, Spliced, SyncOptions,
};
pub use error::{QueueError, Result};
pub use state::{EventBus, EventFilter, QueueChangesWatcher, QueueEvent, WatcherResult};
pub use store::{FileQueueStore, MemoryQueueStore, QueueSaver, QueueStore, StoreError};
pub use types::{QueueOptions, QueueTrack, StoredQueue, Track, TrackInfo, UnresolvedTrack};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude for common imports
///
/// Convenient re-exports
pub mod prelude {
    pub use crate::{
        EventBus, MemoryQueueStore, Queue, QueueError, QueueEvent, QueueOptions, QueueSaver,
        QueueStore, QueueTrack, RemoveQuery, StoredQueue, Track, TrackInfo, UnresolvedTrack,
    };
}
