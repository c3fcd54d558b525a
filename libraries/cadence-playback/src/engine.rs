//! Audio engine abstraction
//!
//! The engine owns decode and output. Calls into it are fire-and-forget; the
//! engine reports progress back asynchronously as `EngineEvent`s, which the
//! host forwards to the coordinator on the coordinator's thread.

use crate::error::EngineError;
use std::time::Duration;

/// Platform audio engine
///
/// Exactly one engine exists per session and only the coordinator drives it.
pub trait AudioEngine: Send {
    /// Replace the current source
    ///
    /// Returns an error only for sources rejected up front. Failures found
    /// while loading are reported later as `EngineEvent::LoadFailed`.
    fn load(&mut self, source: &str) -> Result<(), EngineError>;

    /// Start or resume output of the current source
    ///
    /// # Returns
    /// * `Err(EngineError::AutoplayRejected)` - platform requires a user gesture
    fn play(&mut self) -> Result<(), EngineError>;

    /// Pause output (no-op when nothing is loaded)
    fn pause(&mut self);

    /// Seek within the current source
    fn seek(&mut self, position: Duration) -> Result<(), EngineError>;

    /// Set output gain (0.0 - 1.0)
    fn set_gain(&mut self, gain: f32);
}

/// Notifications emitted by the engine
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// Source metadata is known
    MetadataLoaded {
        /// Total duration of the source
        duration: Duration,
    },

    /// Periodic playback position
    TimeUpdate {
        /// Current position in the source
        position: Duration,
    },

    /// Source played to its natural end
    Ended,

    /// Source could not be loaded or decoded
    LoadFailed {
        /// Engine-provided reason
        reason: String,
    },
}

/// Calls observed by `RecordingEngine`
#[cfg(test)]
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    Load(String),
    Play,
    Pause,
    Seek(Duration),
    SetGain(f32),
}

/// Engine that records every call for assertions
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct RecordingEngine {
    pub calls: std::sync::Arc<std::sync::Mutex<Vec<EngineCall>>>,
    pub reject_play: bool,
}

#[cfg(test)]
impl RecordingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<EngineCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: EngineCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[cfg(test)]
impl AudioEngine for RecordingEngine {
    fn load(&mut self, source: &str) -> Result<(), EngineError> {
        self.record(EngineCall::Load(source.to_string()));
        if source.is_empty() {
            return Err(EngineError::Load("empty source".to_string()));
        }
        Ok(())
    }

    fn play(&mut self) -> Result<(), EngineError> {
        self.record(EngineCall::Play);
        if self.reject_play {
            Err(EngineError::AutoplayRejected)
        } else {
            Ok(())
        }
    }

    fn pause(&mut self) {
        self.record(EngineCall::Pause);
    }

    fn seek(&mut self, position: Duration) -> Result<(), EngineError> {
        self.record(EngineCall::Seek(position));
        Ok(())
    }

    fn set_gain(&mut self, gain: f32) {
        self.record(EngineCall::SetGain(gain));
    }
}
