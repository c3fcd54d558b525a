//! Core types for playback coordination

use cadence_core::TrackId;
use serde::{Deserialize, Serialize};

/// Engine lifecycle as seen by the coordinator
///
/// `Playing` and `Paused` are not separate states: they are the transport
/// flag (`is_playing`) layered over `Ready`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineState {
    /// No usable source (load failed)
    Idle,

    /// Source set, metadata not yet known
    Loading,

    /// Duration known, transport can run
    Ready,

    /// Natural completion with nothing left to advance to
    Ended,
}

/// Repeat mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    /// Stop after the last track of the traversal order
    #[default]
    #[serde(rename = "none", alias = "off")]
    Off,

    /// Loop the active playlist
    All,

    /// Loop the current track only
    One,
}

/// How `next`/`previous` walk the active playlist
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraversalPolicy {
    /// Playlist order
    #[default]
    Linear,

    /// A permutation computed once when shuffle is turned on
    Shuffled,
}

/// Algorithm used to build the shuffled traversal order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShuffleAlgorithm {
    /// Uniform Fisher-Yates
    #[default]
    Random,

    /// Spread artists apart
    Smart,
}

/// Mapping from volume level to engine gain
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolumeCurve {
    /// `gain = level / 100`
    #[default]
    Linear,

    /// 0-100% mapped onto -60 dB..0 dB
    Logarithmic,
}

/// Configuration for the playback coordinator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Initial volume (0-100, default: 80)
    pub volume: u8,

    /// Level-to-gain mapping (default: Linear)
    pub volume_curve: VolumeCurve,

    /// Initial repeat mode (default: Off)
    pub repeat: RepeatMode,

    /// Initial shuffle flag (default: false)
    pub shuffle: bool,

    /// Algorithm used when shuffle is on (default: Random)
    pub shuffle_algorithm: ShuffleAlgorithm,

    /// Number of resolved durations kept (default: 512)
    pub duration_cache_size: usize,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            volume: 80,
            volume_curve: VolumeCurve::Linear,
            repeat: RepeatMode::Off,
            shuffle: false,
            shuffle_algorithm: ShuffleAlgorithm::Random,
            duration_cache_size: 512,
        }
    }
}

/// Point-in-time view of the coordinator for rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackSnapshot {
    pub current_index: usize,
    pub current_track_id: TrackId,
    pub active_playlist: Option<Vec<TrackId>>,
    pub is_playing: bool,
    pub engine_state: EngineState,
    pub progress_percent: f64,
    pub duration_seconds: f64,
    pub volume: u8,
    pub is_muted: bool,
    pub repeat_mode: RepeatMode,
    pub shuffle_enabled: bool,
    pub play_pending: bool,
}
