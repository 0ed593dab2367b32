//! Playback queue management

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;

use super::remove::{RemoveQuery, RemovedTracks};
use crate::error::{QueueError, Result};
use crate::state::{EventBus, QueueChangesWatcher, QueueEvent, notify};
use crate::store::QueueSaver;
use crate::types::{QueueOptions, QueueTrack, StoredQueue, Track};

/// Result of [`Queue::splice`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Spliced {
    /// The queue was empty, so the items were appended; holds the new length
    Appended(usize),
    /// Exactly one track was removed
    One(QueueTrack),
    /// Zero or several tracks were removed
    Many(Vec<QueueTrack>),
}

impl Spliced {
    fn from_removed(mut removed: Vec<QueueTrack>) -> Self {
        if removed.len() == 1 {
            if let Some(track) = removed.pop() {
                return Self::One(track);
            }
        }
        Self::Many(removed)
    }

    /// Removed tracks as a list
    #[must_use]
    pub fn into_removed(self) -> Vec<QueueTrack> {
        match self {
            Self::Appended(_) => Vec::new(),
            Self::One(track) => vec![track],
            Self::Many(tracks) => tracks,
        }
    }
}

/// How [`Queue::sync`] reconciles with the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOptions {
    /// Replace local tracks and history with the stored ones (default: true);
    /// when false the stored ones are appended
    pub override_local: bool,
    /// Take the stored current track when none is playing locally (default: false)
    pub sync_current: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            override_local: true,
            sync_current: false,
        }
    }
}

/// Builder for [`Queue`]
pub struct QueueBuilder {
    session_id: String,
    saver: QueueSaver,
    data: StoredQueue,
    max_previous_tracks: Option<usize>,
    watcher: Option<Arc<dyn QueueChangesWatcher>>,
    events: Option<EventBus>,
}

impl QueueBuilder {
    /// Create a builder for an empty queue
    #[must_use]
    pub fn new(session_id: impl Into<String>, saver: QueueSaver) -> Self {
        Self {
            session_id: session_id.into(),
            saver,
            data: StoredQueue::default(),
            max_previous_tracks: None,
            watcher: None,
            events: None,
        }
    }

    /// Seed the queue with a stored snapshot
    #[must_use]
    pub fn with_data(mut self, data: StoredQueue) -> Self {
        self.data = data;
        self
    }

    /// Override the history cap inherited from the saver
    #[must_use]
    pub fn max_previous_tracks(mut self, max: usize) -> Self {
        self.max_previous_tracks = Some(max);
        self
    }

    /// Register an audit watcher
    #[must_use]
    pub fn with_watcher(mut self, watcher: Arc<dyn QueueChangesWatcher>) -> Self {
        self.watcher = Some(watcher);
        self
    }

    /// Emit domain events on the given bus
    #[must_use]
    pub fn with_events(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    /// Build the queue
    ///
    /// Entries of the seed data with an invalid shape are dropped.
    #[must_use]
    pub fn build(self) -> Queue {
        let inherited = self.saver.options();
        let options = QueueOptions {
            max_previous_tracks: self
                .max_previous_tracks
                .filter(|&max| max > 0)
                .unwrap_or(inherited.max_previous_tracks),
        };
        let data = self.data.sanitized();
        let mut previous = data.previous;
        previous.truncate(options.max_previous_tracks);

        Queue {
            session_id: self.session_id,
            current: data.current,
            previous,
            tracks: data.tracks,
            options,
            saver: self.saver,
            watcher: self.watcher,
            events: self.events,
        }
    }
}

/// Ordered playback queue of one session
///
/// Every mutation updates memory first, then notifies the event bus and the
/// watcher, then persists the resulting snapshot. A persistence failure is
/// returned to the caller with the in-memory change already applied.
pub struct Queue {
    session_id: String,
    current: Option<Track>,
    /// History, most recent first
    previous: Vec<Track>,
    /// Pending tracks, index 0 plays next
    tracks: Vec<QueueTrack>,
    options: QueueOptions,
    saver: QueueSaver,
    watcher: Option<Arc<dyn QueueChangesWatcher>>,
    events: Option<EventBus>,
}

impl Queue {
    /// Start building a queue for a session
    #[must_use]
    pub fn builder(session_id: impl Into<String>, saver: QueueSaver) -> QueueBuilder {
        QueueBuilder::new(session_id, saver)
    }

    /// Create an empty queue with the saver's options
    #[must_use]
    pub fn new(session_id: impl Into<String>, saver: QueueSaver) -> Self {
        QueueBuilder::new(session_id, saver).build()
    }

    /// Session this queue belongs to
    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Currently playing track
    #[must_use]
    pub fn current(&self) -> Option<&Track> {
        self.current.as_ref()
    }

    /// Pending tracks in play order
    #[must_use]
    pub fn tracks(&self) -> &[QueueTrack] {
        &self.tracks
    }

    /// History, most recent first
    #[must_use]
    pub fn previous(&self) -> &[Track] {
        &self.previous
    }

    /// Number of pending tracks
    #[must_use]
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Whether no tracks are pending
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Options in effect for this queue
    #[must_use]
    pub fn options(&self) -> QueueOptions {
        self.options
    }

    /// Point-in-time copy with history limited to the cap
    #[must_use]
    pub fn to_snapshot(&self) -> StoredQueue {
        StoredQueue {
            current: self.current.clone(),
            previous: self
                .previous
                .iter()
                .take(self.options.max_previous_tracks)
                .cloned()
                .collect(),
            tracks: self.tracks.clone(),
        }
    }

    /// Sum of the durations of the current and all pending tracks
    #[must_use]
    pub fn total_duration(&self) -> Duration {
        let current = self.current.as_ref().and_then(|t| t.info.duration).unwrap_or(0);
        let total = self
            .tracks
            .iter()
            .fold(current, |acc, t| acc.saturating_add(t.duration_ms()));
        Duration::from_millis(total)
    }

    /// Trim history to the cap and persist the snapshot
    ///
    /// # Errors
    ///
    /// Returns error if the backend fails
    pub async fn save(&mut self) -> Result<bool> {
        self.previous.truncate(self.options.max_previous_tracks);
        Ok(self.saver.set(&self.session_id, self.to_snapshot()).await?)
    }

    /// Delete the backing record; the queue itself is left as it is
    ///
    /// # Errors
    ///
    /// Returns error if the backend fails
    pub async fn destroy(&self) -> Result<bool> {
        tracing::debug!(session_id = %self.session_id, "Deleting stored queue");
        Ok(self.saver.delete(&self.session_id).await?)
    }

    /// Reconcile with the stored snapshot, then persist the result
    ///
    /// Stored lists that are empty leave the local ones untouched.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::NotFound`] if the backend has no record for
    /// this session, or the backend's error if it fails
    pub async fn sync(&mut self, options: SyncOptions) -> Result<()> {
        let Some(data) = self.saver.sync(&self.session_id).await? else {
            return Err(QueueError::NotFound {
                session_id: self.session_id.clone(),
            });
        };
        let data = data.sanitized();

        if options.sync_current && self.current.is_none() {
            self.current = data.current;
        }
        if !data.tracks.is_empty() {
            if options.override_local {
                self.tracks = data.tracks;
            } else {
                self.tracks.extend(data.tracks);
            }
        }
        if !data.previous.is_empty() {
            if options.override_local {
                self.previous = data.previous;
            } else {
                self.previous.extend(data.previous);
            }
        }

        tracing::debug!(
            session_id = %self.session_id,
            tracks = self.tracks.len(),
            previous = self.previous.len(),
            "Queue synced from store"
        );
        self.save().await?;
        Ok(())
    }

    /// Add tracks to the queue
    ///
    /// Entries with an invalid shape are dropped. With an `index` inside the
    /// current bounds the tracks are inserted there, otherwise appended.
    /// Returns the new queue length.
    ///
    /// # Errors
    ///
    /// Returns error if the backend fails
    pub async fn add<I, T>(&mut self, items: I, index: Option<usize>) -> Result<usize>
    where
        I: IntoIterator<Item = T>,
        T: Into<QueueTrack>,
    {
        let items = accept(items);
        match index {
            Some(index) if index < self.tracks.len() => {
                self.splice_at(index, 0, items).await?;
                Ok(self.tracks.len())
            }
            _ => self.append(items).await,
        }
    }

    /// Remove `amount` tracks at `index` and insert `items` in their place
    ///
    /// On an empty queue the items are appended instead. Out-of-range
    /// positions are clamped to the end of the queue.
    ///
    /// # Errors
    ///
    /// Returns error if the backend fails
    pub async fn splice(
        &mut self,
        index: usize,
        amount: usize,
        items: Vec<QueueTrack>,
    ) -> Result<Spliced> {
        let items = accept(items);
        if self.tracks.is_empty() {
            if items.is_empty() {
                return Ok(Spliced::Many(Vec::new()));
            }
            return self.append(items).await.map(Spliced::Appended);
        }

        let removed = self.splice_at(index, amount, items).await?;
        Ok(Spliced::from_removed(removed))
    }

    /// Remove tracks by position or identity
    ///
    /// Returns `None` when nothing matched.
    ///
    /// # Errors
    ///
    /// Returns error if the backend fails
    pub async fn remove(&mut self, query: impl Into<RemoveQuery>) -> Result<Option<RemovedTracks>> {
        let query = query.into();
        let before = self.watch_snapshot();

        let removed = match &query {
            RemoveQuery::Index(index) => {
                if *index >= self.tracks.len() {
                    return Ok(None);
                }
                vec![self.tracks.remove(*index)]
            }
            RemoveQuery::Indices(indices) => {
                let mut removed = Vec::new();
                for &index in indices {
                    if index < self.tracks.len() {
                        removed.push(self.tracks.remove(index));
                    }
                }
                removed
            }
            RemoveQuery::Track(query) => {
                let Some(position) = self.tracks.iter().position(|v| query.matches_identity(v))
                else {
                    return Ok(None);
                };
                vec![self.tracks.remove(position)]
            }
            RemoveQuery::Mixed(targets) => {
                let matched: Vec<usize> = self
                    .tracks
                    .iter()
                    .enumerate()
                    .filter(|(i, v)| targets.iter().any(|t| t.selects(*i, v)))
                    .map(|(i, _)| i)
                    .collect();

                // Positions come from the list before removal but are applied to the live list
                let mut removed = Vec::new();
                for index in matched {
                    if index < self.tracks.len() {
                        removed.push(self.tracks.remove(index));
                    }
                }
                removed
            }
        };

        if removed.is_empty() {
            return Ok(None);
        }

        tracing::debug!(
            session_id = %self.session_id,
            removed = removed.len(),
            length = self.tracks.len(),
            "Tracks removed from queue"
        );

        let removed = RemovedTracks { removed };
        self.emit(QueueEvent::SongRemoved {
            session_id: self.session_id.clone(),
            removed: removed.clone(),
        });

        if let (Some(watcher), Some(before)) = (&self.watcher, &before) {
            let after = self.to_snapshot();
            notify(
                &self.session_id,
                "tracks_removed",
                watcher.tracks_removed(
                    &self.session_id,
                    &removed.removed,
                    &query.indices(),
                    before,
                    &after,
                ),
            );
        }

        self.save().await?;
        Ok(Some(removed))
    }

    /// Remove every pending track
    ///
    /// Returns false without doing anything if the queue is already empty.
    ///
    /// # Errors
    ///
    /// Returns error if the backend fails
    pub async fn clear(&mut self) -> Result<bool> {
        if self.tracks.is_empty() {
            return Ok(false);
        }

        let before = self.watch_snapshot();
        let removed = std::mem::take(&mut self.tracks);
        tracing::debug!(session_id = %self.session_id, removed = removed.len(), "Queue cleared");

        self.emit(QueueEvent::Cleared {
            session_id: self.session_id.clone(),
        });

        if let (Some(watcher), Some(before)) = (&self.watcher, &before) {
            let after = self.to_snapshot();
            notify(
                &self.session_id,
                "tracks_removed",
                watcher.tracks_removed(&self.session_id, &removed, &[], before, &after),
            );
        }

        self.save().await?;
        Ok(true)
    }

    /// Randomize the order of the pending tracks
    ///
    /// Returns the queue length.
    ///
    /// # Errors
    ///
    /// Returns error if the backend fails
    pub async fn shuffle(&mut self) -> Result<usize> {
        if self.tracks.len() <= 1 {
            return Ok(self.tracks.len());
        }

        let before = self.watch_snapshot();
        self.permute(&mut rand::thread_rng());
        self.finish_shuffle(before).await
    }

    /// Same as [`shuffle`](Self::shuffle) with a caller-supplied RNG
    ///
    /// # Errors
    ///
    /// Returns error if the backend fails
    pub async fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<usize> {
        if self.tracks.len() <= 1 {
            return Ok(self.tracks.len());
        }

        let before = self.watch_snapshot();
        self.permute(rng);
        self.finish_shuffle(before).await
    }

    /// Take the most recent track out of the history
    ///
    /// # Errors
    ///
    /// Returns error if the backend fails
    pub async fn shift_previous(&mut self) -> Result<Option<Track>> {
        if self.previous.is_empty() {
            return Ok(None);
        }

        let track = self.previous.remove(0);
        self.save().await?;
        Ok(Some(track))
    }

    /// Record a played track at the head of the history
    ///
    /// Returns the history length after trimming to the cap. Invalid tracks
    /// are ignored.
    ///
    /// # Errors
    ///
    /// Returns error if the backend fails
    pub async fn push_previous(&mut self, track: Track) -> Result<usize> {
        if !track.is_valid() {
            return Ok(self.previous.len());
        }

        self.previous.insert(0, track);
        self.save().await?;
        Ok(self.previous.len())
    }

    /// Replace the currently playing track, returning the old one
    ///
    /// An invalid track clears the current slot.
    ///
    /// # Errors
    ///
    /// Returns error if the backend fails
    pub async fn set_current(&mut self, track: Option<Track>) -> Result<Option<Track>> {
        let old = std::mem::replace(&mut self.current, track.filter(Track::is_valid));
        self.save().await?;
        Ok(old)
    }

    async fn append(&mut self, items: Vec<QueueTrack>) -> Result<usize> {
        let before = self.watch_snapshot();
        let at_index = self.tracks.len();
        self.tracks.extend(items.iter().cloned());

        if !items.is_empty() {
            tracing::debug!(
                session_id = %self.session_id,
                added = items.len(),
                length = self.tracks.len(),
                "Tracks added to queue"
            );

            self.emit(QueueEvent::SongAdded {
                session_id: self.session_id.clone(),
                tracks: items.clone(),
            });

            if let (Some(watcher), Some(before)) = (&self.watcher, &before) {
                let after = self.to_snapshot();
                notify(
                    &self.session_id,
                    "tracks_add",
                    watcher.tracks_add(&self.session_id, &items, at_index, before, &after),
                );
            }
        }

        self.save().await?;
        Ok(self.tracks.len())
    }

    async fn splice_at(
        &mut self,
        index: usize,
        amount: usize,
        items: Vec<QueueTrack>,
    ) -> Result<Vec<QueueTrack>> {
        let before = self.watch_snapshot();
        let start = index.min(self.tracks.len());
        let end = start.saturating_add(amount).min(self.tracks.len());

        let removed: Vec<QueueTrack> = self
            .tracks
            .splice(start..end, items.iter().cloned())
            .collect();

        tracing::debug!(
            session_id = %self.session_id,
            index = start,
            removed = removed.len(),
            added = items.len(),
            "Queue spliced"
        );

        if !items.is_empty() {
            self.emit(QueueEvent::SongAdded {
                session_id: self.session_id.clone(),
                tracks: items.clone(),
            });
        }
        if !removed.is_empty() {
            self.emit(QueueEvent::SongRemoved {
                session_id: self.session_id.clone(),
                removed: RemovedTracks {
                    removed: removed.clone(),
                },
            });
        }

        if let (Some(watcher), Some(before)) = (&self.watcher, &before) {
            let after = self.to_snapshot();
            if !items.is_empty() {
                notify(
                    &self.session_id,
                    "tracks_add",
                    watcher.tracks_add(&self.session_id, &items, start, before, &after),
                );
            }
            if !removed.is_empty() {
                let indices: Vec<usize> = (start..end).collect();
                notify(
                    &self.session_id,
                    "tracks_removed",
                    watcher.tracks_removed(&self.session_id, &removed, &indices, before, &after),
                );
            }
        }

        self.save().await?;
        Ok(removed)
    }

    fn permute<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if self.tracks.len() == 2 {
            self.tracks.swap(0, 1);
        } else {
            fisher_yates(&mut self.tracks, rng);
        }
    }

    async fn finish_shuffle(&mut self, before: Option<StoredQueue>) -> Result<usize> {
        tracing::debug!(
            session_id = %self.session_id,
            length = self.tracks.len(),
            "Queue shuffled"
        );

        if let (Some(watcher), Some(before)) = (&self.watcher, &before) {
            let after = self.to_snapshot();
            notify(
                &self.session_id,
                "shuffled",
                watcher.shuffled(&self.session_id, before, &after),
            );
        }

        self.save().await?;
        Ok(self.tracks.len())
    }

    /// Snapshot for the watcher, only taken when one is registered
    fn watch_snapshot(&self) -> Option<StoredQueue> {
        self.watcher.as_ref().map(|_| self.to_snapshot())
    }

    fn emit(&self, event: QueueEvent) {
        if let Some(events) = &self.events {
            events.emit(event);
        }
    }
}

impl std::fmt::Debug for Queue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Queue")
            .field("session_id", &self.session_id)
            .field("current", &self.current)
            .field("tracks", &self.tracks)
            .field("previous", &self.previous)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Shuffle in place, drawing `j` uniformly from `0..=i` for each `i` from the end down to 1
pub fn fisher_yates<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

fn accept<I, T>(items: I) -> Vec<QueueTrack>
where
    I: IntoIterator<Item = T>,
    T: Into<QueueTrack>,
{
    items
        .into_iter()
        .map(Into::into)
        .filter(QueueTrack::is_valid)
        .collect()
}
