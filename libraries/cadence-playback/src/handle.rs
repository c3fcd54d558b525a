//! Shared handle to the playback coordinator
//!
//! Views and the engine event pump receive a `PlaybackHandle` instead of
//! reaching the coordinator through a global. Cloning the handle is cheap;
//! every clone drives the same coordinator.

use crate::{
    coordinator::PlaybackCoordinator,
    engine::EngineEvent,
    error::Result,
    events::PlaybackEvent,
    types::{PlaybackSnapshot, RepeatMode},
};
use cadence_core::TrackId;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::trace;

/// Cloneable, thread-safe access to one `PlaybackCoordinator`
///
/// Track starts run the two phases with a scheduler turn between them: the
/// engine is paused and the new source loaded under the lock, the lock is
/// released, and `play()` is committed afterwards. A second start arriving
/// in between simply moves the pointer again; the commit plays whatever is
/// current.
#[derive(Clone)]
pub struct PlaybackHandle {
    inner: Arc<Mutex<PlaybackCoordinator>>,
}

impl PlaybackHandle {
    /// Wrap a coordinator for shared use
    pub fn new(coordinator: PlaybackCoordinator) -> Self {
        Self {
            inner: Arc::new(Mutex::new(coordinator)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, PlaybackCoordinator> {
        // A panic while holding the lock leaves plain data behind; keep going
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn commit(&self) {
        tokio::task::yield_now().await;
        let committed = self.lock().commit_play();
        trace!(committed, "Play commit");
    }

    // ===== Track Selection =====

    /// Play a catalog track, committing `play()` after a scheduler turn
    ///
    /// Errors (unknown id, entitlement) are returned before anything is
    /// committed.
    pub async fn play_track(&self, id: &TrackId) -> Result<()> {
        self.lock().play_track(id)?;
        self.commit().await;
        Ok(())
    }

    /// Play an ordered sequence starting with its first track
    pub async fn play_playlist(&self, ids: &[TrackId]) -> Result<()> {
        self.lock().play_playlist(ids)?;
        self.commit().await;
        Ok(())
    }

    /// Step forward in the active playlist; returns whether the pointer moved
    pub async fn next_song(&self) -> bool {
        let moved = self.lock().next_song();
        if moved {
            self.commit().await;
        }
        moved
    }

    /// Step backward in the active playlist; returns whether the pointer moved
    pub async fn previous_song(&self) -> bool {
        let moved = self.lock().previous_song();
        if moved {
            self.commit().await;
        }
        moved
    }

    // ===== Transport =====

    /// Flip between playing and paused
    pub fn toggle_play(&self) {
        self.lock().toggle_play();
    }

    /// Start or resume the current track
    pub fn play(&self) {
        self.lock().play();
    }

    /// Pause playback
    pub fn pause(&self) {
        self.lock().pause();
    }

    /// Seek by percentage (0-100) of the current track
    pub fn handle_progress_change(&self, percent: f64) {
        self.lock().handle_progress_change(percent);
    }

    /// Seek to an absolute position
    pub fn seek_to(&self, position: Duration) {
        self.lock().seek_to(position);
    }

    // ===== Settings =====

    /// Set volume (0-100)
    pub fn set_volume(&self, level: u8) {
        self.lock().set_volume(level);
    }

    /// Mute audio
    pub fn mute(&self) {
        self.lock().mute();
    }

    /// Unmute audio
    pub fn unmute(&self) {
        self.lock().unmute();
    }

    /// Toggle mute state
    pub fn toggle_mute(&self) {
        self.lock().toggle_mute();
    }

    /// Set repeat mode
    pub fn set_repeat_mode(&self, mode: RepeatMode) {
        self.lock().set_repeat_mode(mode);
    }

    /// Enable or disable shuffled traversal
    pub fn set_shuffle_enabled(&self, enabled: bool) {
        self.lock().set_shuffle_enabled(enabled);
    }

    // ===== Engine & Views =====

    /// Forward an engine notification to the coordinator
    pub fn engine_event(&self, event: EngineEvent) {
        self.lock().handle_engine_event(event);
    }

    /// Point-in-time view for rendering
    pub fn snapshot(&self) -> PlaybackSnapshot {
        self.lock().snapshot()
    }

    /// Take all events queued since the last drain
    pub fn drain_events(&self) -> Vec<PlaybackEvent> {
        self.lock().drain_events()
    }

    /// Duration string for a track, engine-reported when known
    pub fn display_duration(&self, id: &TrackId) -> Option<String> {
        self.lock().display_duration(id)
    }
}
