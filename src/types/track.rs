use serde::{Deserialize, Serialize};

/// Metadata describing a track
///
/// Every field is optional; the queue only looks at the identity fields
/// (`identifier`, `uri`, `title`, `isrc`, `artwork_url`) and `duration`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrackInfo {
    /// Source-specific identifier
    pub identifier: Option<String>,

    /// Track title
    pub title: Option<String>,

    /// Author or artist name
    pub author: Option<String>,

    /// URI the track was loaded from
    pub uri: Option<String>,

    /// International Standard Recording Code
    pub isrc: Option<String>,

    /// URL to artwork
    pub artwork_url: Option<String>,

    /// Name of the source that produced the track
    pub source_name: Option<String>,

    /// Track duration in milliseconds
    pub duration: Option<u64>,

    /// Whether the track is a live stream
    pub is_stream: bool,

    /// Whether the track supports seeking
    pub is_seekable: bool,
}

impl TrackInfo {
    /// Create empty track info
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set identifier
    #[must_use]
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    /// Builder method to set title
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Builder method to set author
    #[must_use]
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Builder method to set URI
    #[must_use]
    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    /// Builder method to set ISRC
    #[must_use]
    pub fn with_isrc(mut self, isrc: impl Into<String>) -> Self {
        self.isrc = Some(isrc.into());
        self
    }

    /// Builder method to set artwork URL
    #[must_use]
    pub fn with_artwork(mut self, artwork_url: impl Into<String>) -> Self {
        self.artwork_url = Some(artwork_url.into());
        self
    }

    /// Builder method to set duration in milliseconds
    #[must_use]
    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration = Some(duration_ms);
        self
    }
}

/// A fully resolved, playable track
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    /// Encoded form understood by the audio backend
    #[serde(default)]
    pub encoded: Option<String>,

    /// Track metadata
    #[serde(default)]
    pub info: TrackInfo,

    /// Who requested the track
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requester: Option<String>,
}

impl Track {
    /// Create a resolved track from its encoded form and metadata
    pub fn new(encoded: impl Into<String>, info: TrackInfo) -> Self {
        Self {
            encoded: Some(encoded.into()),
            info,
            requester: None,
        }
    }

    /// Builder method to set requester
    #[must_use]
    pub fn with_requester(mut self, requester: impl Into<String>) -> Self {
        self.requester = Some(requester.into());
        self
    }

    /// A resolved track must carry its encoded form
    #[must_use]
    pub fn is_valid(&self) -> bool {
        present(self.encoded.as_ref()).is_some()
    }
}

/// A track that still needs to be resolved before it can be played
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnresolvedTrack {
    /// Encoded form, if already known
    #[serde(default)]
    pub encoded: Option<String>,

    /// Partial metadata used to resolve the track
    #[serde(default)]
    pub info: TrackInfo,

    /// Who requested the track
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requester: Option<String>,
}

impl UnresolvedTrack {
    /// Create an unresolved track from partial metadata
    #[must_use]
    pub fn new(info: TrackInfo) -> Self {
        Self {
            encoded: None,
            info,
            requester: None,
        }
    }

    /// Builder method to set requester
    #[must_use]
    pub fn with_requester(mut self, requester: impl Into<String>) -> Self {
        self.requester = Some(requester.into());
        self
    }

    /// An unresolved track needs something to resolve from
    #[must_use]
    pub fn is_valid(&self) -> bool {
        present(self.encoded.as_ref()).is_some()
            || present(self.info.title.as_ref()).is_some()
            || present(self.info.uri.as_ref()).is_some()
    }
}

/// An entry of the pending queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QueueTrack {
    /// Ready to play
    Resolved(Track),
    /// Needs resolving first
    Unresolved(UnresolvedTrack),
}

impl QueueTrack {
    /// Encoded form, if any
    #[must_use]
    pub fn encoded(&self) -> Option<&str> {
        match self {
            Self::Resolved(track) => track.encoded.as_deref(),
            Self::Unresolved(track) => track.encoded.as_deref(),
        }
    }

    /// Track metadata
    #[must_use]
    pub fn info(&self) -> &TrackInfo {
        match self {
            Self::Resolved(track) => &track.info,
            Self::Unresolved(track) => &track.info,
        }
    }

    /// Whether this entry is resolved
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    /// The resolved track, if this entry is one
    #[must_use]
    pub fn as_resolved(&self) -> Option<&Track> {
        match self {
            Self::Resolved(track) => Some(track),
            Self::Unresolved(_) => None,
        }
    }

    /// Consume into the resolved track, if this entry is one
    #[must_use]
    pub fn into_resolved(self) -> Option<Track> {
        match self {
            Self::Resolved(track) => Some(track),
            Self::Unresolved(_) => None,
        }
    }

    /// Whether the entry has the shape its variant requires
    #[must_use]
    pub fn is_valid(&self) -> bool {
        match self {
            Self::Resolved(track) => track.is_valid(),
            Self::Unresolved(track) => track.is_valid(),
        }
    }

    /// Duration in milliseconds, 0 when unknown
    #[must_use]
    pub fn duration_ms(&self) -> u64 {
        self.info().duration.unwrap_or(0)
    }

    /// Identity match of `candidate` against `self` used as a query
    ///
    /// Fields are checked in the order encoded, identifier, uri, title, isrc,
    /// artwork URL. A field counts only when it is non-empty on the query side,
    /// and the first field that is present on both sides with equal values
    /// decides the match.
    #[must_use]
    pub fn matches_identity(&self, candidate: &QueueTrack) -> bool {
        let query = self.info();
        let other = candidate.info();

        same(self.encoded(), candidate.encoded())
            || same(query.identifier.as_deref(), other.identifier.as_deref())
            || same(query.uri.as_deref(), other.uri.as_deref())
            || same(query.title.as_deref(), other.title.as_deref())
            || same(query.isrc.as_deref(), other.isrc.as_deref())
            || same(query.artwork_url.as_deref(), other.artwork_url.as_deref())
    }
}

impl From<Track> for QueueTrack {
    fn from(track: Track) -> Self {
        Self::Resolved(track)
    }
}

impl From<UnresolvedTrack> for QueueTrack {
    fn from(track: UnresolvedTrack) -> Self {
        Self::Unresolved(track)
    }
}

fn present(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.is_empty())
}

fn same(query: Option<&str>, candidate: Option<&str>) -> bool {
    match query {
        Some(q) if !q.is_empty() => candidate == Some(q),
        _ => false,
    }
}
