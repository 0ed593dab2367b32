//! Stored form of a queue

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::track::{QueueTrack, Track};

/// Point-in-time copy of a queue, the unit handed to a `QueueStore`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoredQueue {
    /// Currently playing track
    pub current: Option<Track>,
    /// History, most recent first
    pub previous: Vec<Track>,
    /// Upcoming tracks in play order
    pub tracks: Vec<QueueTrack>,
}

impl StoredQueue {
    /// Drop every entry that does not have a valid track shape
    #[must_use]
    pub fn sanitized(self) -> Self {
        Self {
            current: self.current.filter(Track::is_valid),
            previous: self.previous.into_iter().filter(Track::is_valid).collect(),
            tracks: self.tracks.into_iter().filter(QueueTrack::is_valid).collect(),
        }
    }

    /// Decode a snapshot entry by entry
    ///
    /// Entries that fail to decode or have an invalid shape are skipped. A
    /// non-object value yields an empty snapshot.
    #[must_use]
    pub fn from_json_value(value: Value) -> Self {
        let Value::Object(mut map) = value else {
            return Self::default();
        };

        let current = map
            .remove("current")
            .and_then(|v| serde_json::from_value::<Track>(v).ok());
        let previous = decode_entries::<Track>(map.remove("previous"));
        let tracks = decode_entries::<QueueTrack>(map.remove("tracks"));

        Self {
            current,
            previous,
            tracks,
        }
        .sanitized()
    }

    /// Parse JSON text and decode it leniently
    ///
    /// # Errors
    ///
    /// Returns error if the text is not JSON at all
    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(text)?;
        Ok(Self::from_json_value(value))
    }

    /// Whether the snapshot holds nothing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.current.is_none() && self.previous.is_empty() && self.tracks.is_empty()
    }
}

fn decode_entries<T: serde::de::DeserializeOwned>(value: Option<Value>) -> Vec<T> {
    match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    }
}
