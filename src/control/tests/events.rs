use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;

use super::saver;
use crate::control::{Queue, RemovedTracks};
use crate::state::{EventBus, QueueChangesWatcher, QueueEvent, WatcherResult};
use crate::testing::{queued, track};
use crate::types::{QueueTrack, StoredQueue};

fn queue_on(bus: &EventBus) -> Queue {
    let (_, saver) = saver();
    Queue::builder("g1", saver).with_events(bus.clone()).build()
}

#[tokio::test]
async fn test_add_emits_song_added() {
    let bus = EventBus::new();
    let mut rx = bus.subscribe();
    let mut queue = queue_on(&bus);

    queue.add([track("a"), track("b")], None).await.unwrap();

    assert_eq!(
        rx.recv().await.unwrap(),
        QueueEvent::SongAdded {
            session_id: "g1".to_string(),
            tracks: vec![queued("a"), queued("b")],
        }
    );
}

#[tokio::test]
async fn test_add_of_nothing_emits_nothing() {
    let bus = EventBus::new();
    let mut rx = bus.subscribe();
    let mut queue = queue_on(&bus);

    queue.add(Vec::<QueueTrack>::new(), None).await.unwrap();

    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_splice_emits_added_then_removed() {
    let bus = EventBus::new();
    let mut queue = queue_on(&bus);
    queue.add([queued("a"), queued("b")], None).await.unwrap();

    let mut rx = bus.subscribe();
    queue.splice(0, 1, vec![queued("x")]).await.unwrap();

    assert!(matches!(rx.recv().await.unwrap(), QueueEvent::SongAdded { .. }));
    assert_eq!(
        rx.recv().await.unwrap(),
        QueueEvent::SongRemoved {
            session_id: "g1".to_string(),
            removed: RemovedTracks {
                removed: vec![queued("a")]
            },
        }
    );
}

#[tokio::test]
async fn test_remove_emits_one_event_for_all_removed() {
    let bus = EventBus::new();
    let mut queue = queue_on(&bus);
    queue
        .add([queued("a"), queued("b"), queued("c")], None)
        .await
        .unwrap();

    let mut rx = bus.subscribe();
    queue.remove(vec![0_usize, 0]).await.unwrap();

    let QueueEvent::SongRemoved { removed, .. } = rx.recv().await.unwrap() else {
        panic!("expected SongRemoved");
    };
    assert_eq!(removed.len(), 2);
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_clear_emits_cleared_once() {
    let bus = EventBus::new();
    let mut queue = queue_on(&bus);
    queue.add([queued("a")], None).await.unwrap();

    let mut rx = bus.subscribe();
    queue.clear().await.unwrap();
    queue.clear().await.unwrap();

    assert_eq!(
        rx.recv().await.unwrap(),
        QueueEvent::Cleared {
            session_id: "g1".to_string()
        }
    );
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_queue_without_bus_still_mutates() {
    let (_, saver) = saver();
    let mut queue = Queue::new("g1", saver);

    assert_eq!(queue.add([queued("a")], None).await.unwrap(), 1);
    assert!(queue.clear().await.unwrap());
}

/// Records, for each add hook call, whether the matching event was already on the bus
struct EventFirstWatcher {
    rx: Mutex<broadcast::Receiver<QueueEvent>>,
    seen: Mutex<Vec<bool>>,
}

impl QueueChangesWatcher for EventFirstWatcher {
    fn tracks_add(
        &self,
        _session_id: &str,
        _added: &[QueueTrack],
        _at_index: usize,
        _before: &StoredQueue,
        _after: &StoredQueue,
    ) -> WatcherResult {
        let delivered = self
            .rx
            .lock()
            .map(|mut rx| matches!(rx.try_recv(), Ok(QueueEvent::SongAdded { .. })))
            .unwrap_or(false);
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(delivered);
        }
        Ok(())
    }
}

#[tokio::test]
async fn test_event_precedes_add_hook_on_both_paths() {
    let bus = EventBus::new();
    let watcher = Arc::new(EventFirstWatcher {
        rx: Mutex::new(bus.subscribe()),
        seen: Mutex::new(Vec::new()),
    });
    let (_, saver) = saver();
    let mut queue = Queue::builder("g1", saver)
        .with_events(bus.clone())
        .with_watcher(watcher.clone())
        .build();

    // Append path
    queue.add([queued("a"), queued("b")], None).await.unwrap();
    // Insert path
    queue.add([queued("c")], Some(0)).await.unwrap();

    assert_eq!(*watcher.seen.lock().unwrap(), vec![true, true]);
}
