use std::sync::Arc;

use super::{queue_with, saver};
use crate::control::{Queue, RemoveQuery, RemoveTarget, RemovedTracks};
use crate::store::QueueStore;
use crate::testing::{RecordingWatcher, WatcherCall, ids, queued, unresolved};
use crate::types::{QueueTrack, TrackInfo, UnresolvedTrack};

fn by_identifier(id: &str) -> QueueTrack {
    UnresolvedTrack::new(TrackInfo::new().with_identifier(id)).into()
}

#[tokio::test]
async fn test_remove_by_identity() {
    let (store, mut queue) = queue_with(&["a", "b", "c"]).await;

    let result = queue.remove(by_identifier("b")).await.unwrap();

    assert_eq!(
        result,
        Some(RemovedTracks {
            removed: vec![queued("b")]
        })
    );
    assert_eq!(ids(queue.tracks()), ["a", "c"]);
    assert_eq!(ids(&store.get("g1").await.unwrap().unwrap().tracks), ["a", "c"]);
}

#[tokio::test]
async fn test_remove_by_identity_matches_index_removal() {
    let (_, mut by_track) = queue_with(&["a", "b", "c"]).await;
    let (_, mut by_index) = queue_with(&["a", "b", "c"]).await;

    let a = by_track.remove(by_identifier("c")).await.unwrap();
    let b = by_index.remove(2_usize).await.unwrap();

    assert_eq!(a, b);
    assert_eq!(by_track.to_snapshot(), by_index.to_snapshot());
}

#[tokio::test]
async fn test_remove_identity_takes_first_match_only() {
    let (_, mut queue) = queue_with(&["a", "b", "a"]).await;

    let result = queue.remove(by_identifier("a")).await.unwrap().unwrap();

    assert_eq!(result.len(), 1);
    assert_eq!(ids(queue.tracks()), ["b", "a"]);
}

#[tokio::test]
async fn test_remove_by_title_for_unresolved() {
    let (_, saver) = saver();
    let mut queue = Queue::new("g1", saver);
    queue
        .add([unresolved("one"), unresolved("two")], None)
        .await
        .unwrap();

    let result = queue.remove(unresolved("two")).await.unwrap().unwrap();

    assert_eq!(result.removed, vec![unresolved("two")]);
    assert_eq!(queue.len(), 1);
}

#[tokio::test]
async fn test_remove_no_match_returns_none() {
    let (store, mut queue) = queue_with(&["a"]).await;

    assert!(queue.remove(by_identifier("zzz")).await.unwrap().is_none());
    assert!(queue.remove(5_usize).await.unwrap().is_none());
    assert!(queue.remove(vec![7_usize, 9]).await.unwrap().is_none());
    assert!(queue.remove(Vec::<QueueTrack>::new()).await.unwrap().is_none());
    assert_eq!(queue.len(), 1);
    assert_eq!(store.get("g1").await.unwrap().unwrap().tracks.len(), 1);
}

#[tokio::test]
async fn test_remove_indices_apply_to_live_list() {
    let (_, mut queue) = queue_with(&["a", "b", "c", "d"]).await;

    // After removing index 0 the list is [b, c, d], so index 1 is "c"
    let result = queue.remove(vec![0_usize, 1]).await.unwrap().unwrap();

    assert_eq!(ids(&result.removed), ["a", "c"]);
    assert_eq!(ids(queue.tracks()), ["b", "d"]);
}

#[tokio::test]
async fn test_remove_indices_skip_positions_past_the_end() {
    let (_, mut queue) = queue_with(&["a", "b", "c"]).await;

    // Index 2 no longer exists once two entries are gone
    let result = queue.remove(vec![0_usize, 0, 2]).await.unwrap().unwrap();

    assert_eq!(ids(&result.removed), ["a", "b"]);
    assert_eq!(ids(queue.tracks()), ["c"]);
}

#[tokio::test]
async fn test_remove_mixed_matches_then_shifts() {
    let (_, mut queue) = queue_with(&["a", "b", "c", "d", "e"]).await;

    // Matches are positions 1 ("b") and 2 ("c"), found up front.
    // Removing position 1 shifts "d" into position 2, so "d" goes instead of "c".
    let query = RemoveQuery::mixed(vec![
        RemoveTarget::Index(1),
        RemoveTarget::Track(by_identifier("c")),
    ]);
    let result = queue.remove(query).await.unwrap().unwrap();

    assert_eq!(ids(&result.removed), ["b", "d"]);
    assert_eq!(ids(queue.tracks()), ["a", "c", "e"]);
}

#[tokio::test]
async fn test_remove_list_of_tracks() {
    let (_, mut queue) = queue_with(&["a", "b", "c", "d"]).await;

    let result = queue
        .remove(vec![by_identifier("a"), by_identifier("d")])
        .await
        .unwrap()
        .unwrap();

    assert_eq!(ids(&result.removed), ["a"]);
    // "d" sat at position 3, which is past the end after the first removal shifted it to 2
    assert_eq!(ids(queue.tracks()), ["b", "c", "d"]);
}

#[test]
fn test_mixed_of_indices_becomes_indices() {
    let query: RemoveQuery = vec![RemoveTarget::Index(3), RemoveTarget::Index(1)].into();
    assert_eq!(query, RemoveQuery::Indices(vec![3, 1]));

    let query = RemoveQuery::mixed(vec![
        RemoveTarget::Index(2),
        RemoveTarget::Track(queued("x")),
    ]);
    assert_eq!(query.indices(), vec![2]);
    assert!(RemoveQuery::from(queued("x")).indices().is_empty());
}

#[tokio::test]
async fn test_remove_watcher_gets_aggregate_and_indices() {
    let (_, saver) = saver();
    let watcher = Arc::new(RecordingWatcher::new());
    let mut queue = Queue::builder("g1", saver)
        .with_watcher(watcher.clone())
        .build();
    queue
        .add([queued("a"), queued("b"), queued("c")], None)
        .await
        .unwrap();

    queue.remove(vec![2_usize, 0]).await.unwrap();

    let calls = watcher.calls();
    assert_eq!(calls.len(), 2);
    let WatcherCall::TracksRemoved {
        removed,
        indices,
        before,
        after,
    } = &calls[1]
    else {
        panic!("expected tracks_removed");
    };
    assert_eq!(ids(removed), ["c", "a"]);
    assert_eq!(indices, &vec![2, 0]);
    assert_eq!(before.tracks.len(), 3);
    assert_eq!(ids(&after.tracks), ["b"]);
}
