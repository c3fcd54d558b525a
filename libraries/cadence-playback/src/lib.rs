//! Cadence - Playback Coordination
//!
//! Platform-agnostic coordination between the UI and a single audio engine.
//!
//! This crate provides:
//! - Track selection from the catalog or an explicit playlist
//! - Two-phase track start (pause + load, then commit `play()`)
//! - Linear and shuffled traversal (Random + Smart)
//! - Repeat modes (Off, All, One)
//! - Seek by percentage or absolute position
//! - Volume control (linear or logarithmic, mute/unmute)
//! - Engine-reported duration cache
//!
//! # Architecture
//!
//! `cadence-playback` owns no audio I/O. The platform supplies an
//! [`AudioEngine`] and forwards its notifications as [`EngineEvent`]s. The
//! catalog and entitlement checks come from `cadence-core` as trait objects,
//! and views reach the coordinator through a cloneable [`PlaybackHandle`].
//!
//! # Example
//!
//! ```rust
//! use cadence_core::{StaticCatalog, StaticEntitlements, Track, TrackId};
//! use cadence_playback::{
//!     AudioEngine, EngineError, EngineEvent, PlaybackConfig, PlaybackCoordinator,
//! };
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! struct SilentEngine;
//!
//! impl AudioEngine for SilentEngine {
//!     fn load(&mut self, _source: &str) -> Result<(), EngineError> { Ok(()) }
//!     fn play(&mut self) -> Result<(), EngineError> { Ok(()) }
//!     fn pause(&mut self) {}
//!     fn seek(&mut self, _position: Duration) -> Result<(), EngineError> { Ok(()) }
//!     fn set_gain(&mut self, _gain: f32) {}
//! }
//!
//! let catalog = StaticCatalog::new(vec![
//!     Track::new("1", "Intro", "Band", "intro.mp3"),
//!     Track::new("2", "Encore", "Band", "encore.mp3"),
//! ])
//! .unwrap();
//!
//! let mut coordinator = PlaybackCoordinator::new(
//!     PlaybackConfig::default(),
//!     Arc::new(catalog),
//!     Arc::new(StaticEntitlements::free()),
//!     Box::new(SilentEngine),
//! )
//! .unwrap();
//!
//! coordinator.play_track(&TrackId::from("2")).unwrap();
//! coordinator.commit_play();
//! assert!(coordinator.is_playing());
//!
//! coordinator.handle_engine_event(EngineEvent::MetadataLoaded {
//!     duration: Duration::from_secs(200),
//! });
//! coordinator.handle_progress_change(50.0);
//! assert_eq!(coordinator.progress_percent(), 50.0);
//! ```

mod coordinator;
mod durations;
mod engine;
mod error;
mod events;
mod handle;
mod playlist;
mod shuffle;
pub mod types;
mod volume;

// Public exports
pub use coordinator::PlaybackCoordinator;
pub use durations::DurationCache;
pub use engine::{AudioEngine, EngineEvent};
pub use error::{EngineError, PlaybackError, Result};
pub use events::{Notice, PlaybackEvent};
pub use handle::PlaybackHandle;
pub use playlist::{ActivePlaylist, Direction};
pub use types::{
    EngineState, PlaybackConfig, PlaybackSnapshot, RepeatMode, ShuffleAlgorithm,
    TraversalPolicy, VolumeCurve,
};
pub use volume::Volume;
