use std::collections::HashSet;
use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;

use super::queue_with;
use crate::control::{Queue, fisher_yates};
use crate::store::QueueStore;
use crate::testing::{RecordingWatcher, WatcherCall, ids, queued};

#[tokio::test]
async fn test_shuffle_empty_and_single_are_noops() {
    let (store, mut queue) = queue_with(&[]).await;
    assert_eq!(queue.shuffle().await.unwrap(), 0);

    queue.add([queued("a")], None).await.unwrap();
    store.delete("g1").await.unwrap();

    assert_eq!(queue.shuffle().await.unwrap(), 1);
    assert_eq!(ids(queue.tracks()), ["a"]);
    // Nothing was persisted
    assert!(store.get("g1").await.unwrap().is_none());
}

#[tokio::test]
async fn test_shuffle_two_always_swaps() {
    let (_, mut queue) = queue_with(&["a", "b"]).await;

    assert_eq!(queue.shuffle().await.unwrap(), 2);
    assert_eq!(ids(queue.tracks()), ["b", "a"]);

    queue.shuffle().await.unwrap();
    assert_eq!(ids(queue.tracks()), ["a", "b"]);
}

#[tokio::test]
async fn test_shuffle_keeps_every_track() {
    let names: Vec<String> = (0..20).map(|i| format!("t{i}")).collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let (store, mut queue) = queue_with(&refs).await;

    assert_eq!(queue.shuffle().await.unwrap(), 20);

    let shuffled: HashSet<String> = ids(queue.tracks()).into_iter().collect();
    let original: HashSet<String> = names.into_iter().collect();
    assert_eq!(shuffled, original);

    let stored = store.get("g1").await.unwrap().unwrap();
    assert_eq!(ids(&stored.tracks), ids(queue.tracks()));
}

#[tokio::test]
async fn test_shuffle_with_seeded_rng_is_deterministic() {
    let (_, mut first) = queue_with(&["a", "b", "c", "d", "e", "f"]).await;
    let (_, mut second) = queue_with(&["a", "b", "c", "d", "e", "f"]).await;

    first
        .shuffle_with(&mut StdRng::seed_from_u64(7))
        .await
        .unwrap();
    second
        .shuffle_with(&mut StdRng::seed_from_u64(7))
        .await
        .unwrap();

    assert_eq!(ids(first.tracks()), ids(second.tracks()));
}

#[tokio::test]
async fn test_shuffle_watcher_gets_before_and_after() {
    let (_, saver) = super::saver();
    let watcher = Arc::new(RecordingWatcher::new());
    let mut queue = Queue::builder("g1", saver)
        .with_watcher(watcher.clone())
        .build();
    queue
        .add([queued("a"), queued("b"), queued("c")], None)
        .await
        .unwrap();

    queue.shuffle().await.unwrap();

    let calls = watcher.calls();
    let Some(WatcherCall::Shuffled { before, after }) = calls.last() else {
        panic!("expected shuffled, got {calls:?}");
    };
    assert_eq!(ids(&before.tracks), ["a", "b", "c"]);
    assert_eq!(ids(&after.tracks), ids(queue.tracks()));
}

#[test]
fn test_fisher_yates_is_a_permutation() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut items: Vec<u32> = (0..100).collect();

    fisher_yates(&mut items, &mut rng);

    let mut sorted = items.clone();
    sorted.sort_unstable();
    assert_eq!(sorted, (0..100).collect::<Vec<_>>());
}

#[test]
fn test_fisher_yates_short_slices() {
    let mut rng = StdRng::seed_from_u64(1);

    let mut empty: Vec<u8> = Vec::new();
    fisher_yates(&mut empty, &mut rng);
    assert!(empty.is_empty());

    let mut one = vec![9];
    fisher_yates(&mut one, &mut rng);
    assert_eq!(one, vec![9]);
}

#[test]
fn test_fisher_yates_reaches_every_position() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut seen_first = HashSet::new();

    for _ in 0..200 {
        let mut items = vec![0, 1, 2];
        fisher_yates(&mut items, &mut rng);
        seen_first.insert(items[0]);
    }

    assert_eq!(seen_first.len(), 3);
}
