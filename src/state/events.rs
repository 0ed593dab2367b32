//! Event bus for queue events

use futures::Stream;
use tokio::sync::broadcast;

use crate::control::RemovedTracks;
use crate::types::QueueTrack;

/// Domain events emitted by a queue
#[derive(Debug, Clone, PartialEq)]
pub enum QueueEvent {
    /// Tracks were added to the queue
    SongAdded {
        /// Session the queue belongs to
        session_id: String,
        /// Added tracks, in queue order
        tracks: Vec<QueueTrack>,
    },
    /// Tracks were removed from the queue
    SongRemoved {
        /// Session the queue belongs to
        session_id: String,
        /// Removed tracks
        removed: RemovedTracks,
    },
    /// The queue was cleared
    Cleared {
        /// Session the queue belongs to
        session_id: String,
    },
}

impl QueueEvent {
    /// Session the event belongs to
    #[must_use]
    pub fn session_id(&self) -> &str {
        match self {
            Self::SongAdded { session_id, .. }
            | Self::SongRemoved { session_id, .. }
            | Self::Cleared { session_id } => session_id,
        }
    }
}

/// Event bus for distributing events
///
/// Clones share the same channel, so one bus can serve every session.
#[derive(Debug, Clone)]
pub struct EventBus {
    /// Broadcast sender
    tx: broadcast::Sender<QueueEvent>,
}

impl EventBus {
    /// Create a new event bus
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Create a new event bus buffering up to `capacity` events per subscriber
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Subscribe to events
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<QueueEvent> {
        self.tx.subscribe()
    }

    /// Emit an event
    pub fn emit(&self, event: QueueEvent) {
        // Ignore error if no receivers
        let _ = self.tx.send(event);
    }

    /// Get subscriber count
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Event filter for selective subscription
pub struct EventFilter {
    rx: broadcast::Receiver<QueueEvent>,
    filter: Box<dyn Fn(&QueueEvent) -> bool + Send>,
}

impl EventFilter {
    /// Create a filtered event receiver
    pub fn new<F>(bus: &EventBus, filter: F) -> Self
    where
        F: Fn(&QueueEvent) -> bool + Send + 'static,
    {
        Self {
            rx: bus.subscribe(),
            filter: Box::new(filter),
        }
    }

    /// Only events of one session
    #[must_use]
    pub fn for_session(bus: &EventBus, session_id: impl Into<String>) -> Self {
        let session_id = session_id.into();
        Self::new(bus, move |e| e.session_id() == session_id)
    }

    /// Receive next matching event
    pub async fn recv(&mut self) -> Option<QueueEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) if (self.filter)(&event) => return Some(event),
                Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => {}
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Turn the filter into a stream that ends when the bus is dropped
    pub fn into_stream(self) -> impl Stream<Item = QueueEvent> + Send {
        futures::stream::unfold(self, |mut filter| async move {
            filter.recv().await.map(|event| (event, filter))
        })
    }
}
