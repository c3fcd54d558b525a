//! Cadence Player Library
//!
//! Headless host for the playback coordinator: configuration, a simulated
//! audio engine and the line-command surface.
//!
//! This library exposes the core components for testing purposes.

pub mod command;
pub mod config;
pub mod engine;
pub mod error;

// Re-export commonly used types for convenience
pub use command::{dispatch, render_status, Command, Outcome};
pub use config::{EngineSettings, PlayerConfig};
pub use engine::{EngineClock, SimulatedEngine};
pub use error::{PlayerError, Result};
