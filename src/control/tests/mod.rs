mod events;
mod remove;
mod shuffle;

use std::sync::Arc;

use crate::control::Queue;
use crate::store::{MemoryQueueStore, QueueSaver};
use crate::testing::queued;
use crate::types::QueueOptions;

fn saver() -> (Arc<MemoryQueueStore>, QueueSaver) {
    let store = Arc::new(MemoryQueueStore::new());
    let saver = QueueSaver::from_arc(store.clone(), QueueOptions::default());
    (store, saver)
}

/// Queue for session "g1" already holding tracks with the given identifiers
async fn queue_with(ids: &[&str]) -> (Arc<MemoryQueueStore>, Queue) {
    let (store, saver) = saver();
    let mut queue = Queue::new("g1", saver);
    queue
        .add(ids.iter().map(|id| queued(id)), None)
        .await
        .unwrap();
    (store, queue)
}
