//! Error types for playback coordination

use cadence_core::TrackId;
use thiserror::Error;

/// Playback errors
///
/// An action that returns one of these has not changed coordinator state.
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Catalog has no tracks, so there is no valid current index
    #[error("Catalog is empty")]
    EmptyCatalog,

    /// Track id is not in the catalog
    #[error("Invalid track reference: {0}")]
    InvalidTrackReference(TrackId),

    /// Session lacks the entitlement for a premium track
    #[error("Premium required to play {0}")]
    EntitlementDenied(TrackId),

    /// Playlist with no tracks
    #[error("Playlist is empty")]
    EmptyPlaylist,

    /// Audio engine error
    #[error("Audio engine error: {0}")]
    Engine(#[from] EngineError),
}

/// Errors reported by an audio engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Platform refused programmatic playback without a user gesture
    #[error("Autoplay rejected")]
    AutoplayRejected,

    /// Source could not be loaded or decoded
    #[error("Load failed: {0}")]
    Load(String),

    /// Seek refused by the source
    #[error("Seek failed: {0}")]
    Seek(String),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
