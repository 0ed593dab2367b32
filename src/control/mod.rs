//! Queue control module

pub mod queue;
pub mod remove;

#[cfg(test)]
mod tests;

pub use queue::{Queue, QueueBuilder, Spliced, SyncOptions, fisher_yates};
pub use remove::{RemoveQuery, RemoveTarget, RemovedTracks};
