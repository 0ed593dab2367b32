//! Change notification: domain events and audit hooks

mod events;
mod watcher;

pub use events::{EventBus, EventFilter, QueueEvent};
pub(crate) use watcher::notify;
pub use watcher::{QueueChangesWatcher, WatcherError, WatcherResult};
