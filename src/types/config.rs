use serde::{Deserialize, Serialize};

/// Configuration shared by every queue created against a `QueueSaver`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueueOptions {
    /// Maximum number of tracks kept in history (default: 25)
    pub max_previous_tracks: usize,
}

impl QueueOptions {
    /// History cap used when none (or zero) is configured
    pub const DEFAULT_MAX_PREVIOUS_TRACKS: usize = 25;

    /// Create a new options builder
    #[must_use]
    pub fn builder() -> QueueOptionsBuilder {
        QueueOptionsBuilder::default()
    }

    /// History cap, falling back to the default when configured as zero
    #[must_use]
    pub fn history_cap(&self) -> usize {
        if self.max_previous_tracks == 0 {
            Self::DEFAULT_MAX_PREVIOUS_TRACKS
        } else {
            self.max_previous_tracks
        }
    }
}

impl Default for QueueOptions {
    fn default() -> Self {
        Self {
            max_previous_tracks: Self::DEFAULT_MAX_PREVIOUS_TRACKS,
        }
    }
}

/// Builder for `QueueOptions`
#[derive(Debug, Clone, Default)]
pub struct QueueOptionsBuilder {
    options: QueueOptions,
}

impl QueueOptionsBuilder {
    /// Set the history cap
    #[must_use]
    pub fn max_previous_tracks(mut self, max: usize) -> Self {
        self.options.max_previous_tracks = max;
        self
    }

    /// Build the options
    #[must_use]
    pub fn build(self) -> QueueOptions {
        QueueOptions {
            max_previous_tracks: self.options.history_cap(),
        }
    }
}
