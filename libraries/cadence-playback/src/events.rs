//! Playback Events
//!
//! Event-based communication for UI synchronization. The coordinator queues
//! events as state changes and consumers drain them:
//! - Transport changes (play/pause, engine lifecycle)
//! - Track changes (any pointer move)
//! - Position and duration updates
//! - User-facing notices (premium required, track unavailable)

use crate::types::{EngineState, RepeatMode};
use cadence_core::TrackId;
use serde::{Deserialize, Serialize};

/// Events emitted by the playback coordinator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum PlaybackEvent {
    /// Transport flag or engine lifecycle changed
    StateChanged {
        /// Transport intent
        is_playing: bool,
        /// Engine lifecycle
        engine_state: EngineState,
    },

    /// Current track pointer moved
    TrackChanged {
        /// ID of the new (current) track
        track_id: TrackId,
        /// ID of the previous track
        previous_track_id: TrackId,
    },

    /// Active playlist replaced
    PlaylistChanged {
        /// Number of tracks in the new playlist
        length: usize,
    },

    /// Engine reported the real duration of the current track
    DurationResolved {
        /// Track the duration belongs to
        track_id: TrackId,
        /// Duration in milliseconds
        duration_ms: u64,
    },

    /// Progress moved (engine timing update or seek)
    PositionUpdate {
        /// Progress in percent (0-100)
        progress_percent: f64,
        /// Duration in milliseconds (0 while loading)
        duration_ms: u64,
    },

    /// Track played to its natural end
    TrackFinished {
        /// ID of the finished track
        track_id: TrackId,
    },

    /// Volume changed
    VolumeChanged {
        /// New volume level (0-100)
        level: u8,
        /// Whether audio is muted
        is_muted: bool,
    },

    /// Repeat mode changed
    RepeatModeChanged {
        /// New mode
        mode: RepeatMode,
    },

    /// Shuffle flag changed
    ShuffleChanged {
        /// New flag
        enabled: bool,
    },

    /// Dismissible, user-visible notification
    Notice(Notice),
}

/// User-visible notifications
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Notice {
    /// Playback of a premium track was refused
    PremiumRequired {
        /// Requested track
        track_id: TrackId,
    },

    /// Track could not be loaded
    TrackUnavailable {
        /// Affected track
        track_id: TrackId,
        /// Engine-provided reason
        reason: String,
    },
}

impl PlaybackEvent {
    /// Whether this event carries a user-visible notice
    pub fn is_notice(&self) -> bool {
        matches!(self, PlaybackEvent::Notice(_))
    }
}
