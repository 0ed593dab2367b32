//! Removal queries

use serde::{Deserialize, Serialize};

use crate::types::{QueueTrack, Track, UnresolvedTrack};

/// One element of a mixed removal query
#[derive(Debug, Clone, PartialEq)]
pub enum RemoveTarget {
    /// Position in the queue
    Index(usize),
    /// Track matched by identity
    Track(QueueTrack),
}

impl RemoveTarget {
    /// Whether the entry at `index` is selected by this target
    pub(crate) fn selects(&self, index: usize, candidate: &QueueTrack) -> bool {
        match self {
            Self::Index(i) => *i == index,
            Self::Track(query) => query.matches_identity(candidate),
        }
    }
}

impl From<usize> for RemoveTarget {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl From<QueueTrack> for RemoveTarget {
    fn from(track: QueueTrack) -> Self {
        Self::Track(track)
    }
}

impl From<Track> for RemoveTarget {
    fn from(track: Track) -> Self {
        Self::Track(track.into())
    }
}

impl From<UnresolvedTrack> for RemoveTarget {
    fn from(track: UnresolvedTrack) -> Self {
        Self::Track(track.into())
    }
}

/// What to remove from the pending tracks
///
/// Index-based removals are applied one after another against the live
/// list, so a later index refers to the list as left by the earlier
/// removals of the same call.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoveQuery {
    /// A single position
    Index(usize),
    /// Several positions, applied in the given order
    Indices(Vec<usize>),
    /// The first track matching by identity
    Track(QueueTrack),
    /// Positions and tracks together
    ///
    /// Matches are collected against the list as it was when the call
    /// started, then removed in ascending order from the live list.
    Mixed(Vec<RemoveTarget>),
}

impl RemoveQuery {
    /// Build a query from mixed targets
    ///
    /// A list holding only positions becomes [`RemoveQuery::Indices`].
    #[must_use]
    pub fn mixed(targets: Vec<RemoveTarget>) -> Self {
        if targets.iter().all(|t| matches!(t, RemoveTarget::Index(_))) {
            let indices = targets
                .into_iter()
                .filter_map(|t| match t {
                    RemoveTarget::Index(i) => Some(i),
                    RemoveTarget::Track(_) => None,
                })
                .collect();
            return Self::Indices(indices);
        }
        Self::Mixed(targets)
    }

    /// Positions named by the query, in the order given
    #[must_use]
    pub fn indices(&self) -> Vec<usize> {
        match self {
            Self::Index(i) => vec![*i],
            Self::Indices(list) => list.clone(),
            Self::Track(_) => Vec::new(),
            Self::Mixed(targets) => targets
                .iter()
                .filter_map(|t| match t {
                    RemoveTarget::Index(i) => Some(*i),
                    RemoveTarget::Track(_) => None,
                })
                .collect(),
        }
    }
}

impl From<usize> for RemoveQuery {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl From<Vec<usize>> for RemoveQuery {
    fn from(indices: Vec<usize>) -> Self {
        Self::Indices(indices)
    }
}

impl From<QueueTrack> for RemoveQuery {
    fn from(track: QueueTrack) -> Self {
        Self::Track(track)
    }
}

impl From<Track> for RemoveQuery {
    fn from(track: Track) -> Self {
        Self::Track(track.into())
    }
}

impl From<UnresolvedTrack> for RemoveQuery {
    fn from(track: UnresolvedTrack) -> Self {
        Self::Track(track.into())
    }
}

impl From<Vec<QueueTrack>> for RemoveQuery {
    fn from(tracks: Vec<QueueTrack>) -> Self {
        Self::mixed(tracks.into_iter().map(RemoveTarget::Track).collect())
    }
}

impl From<Vec<RemoveTarget>> for RemoveQuery {
    fn from(targets: Vec<RemoveTarget>) -> Self {
        Self::mixed(targets)
    }
}

/// Tracks taken out of the queue by a removal
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovedTracks {
    /// Removed tracks, in removal order
    pub removed: Vec<QueueTrack>,
}

impl RemovedTracks {
    /// Number of removed tracks
    #[must_use]
    pub fn len(&self) -> usize {
        self.removed.len()
    }

    /// Whether nothing was removed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty()
    }
}
