//! Core types module

mod config;
mod snapshot;
mod track;


pub use config::{QueueOptions, QueueOptionsBuilder};
pub use snapshot::StoredQueue;
pub use track::{QueueTrack, Track, TrackInfo, UnresolvedTrack};
