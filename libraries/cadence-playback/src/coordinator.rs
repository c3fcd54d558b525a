//! Playback coordinator - core orchestration
//!
//! Owns the single audio engine and mediates every transition between UI
//! intents and engine events: track pointer, active playlist, transport,
//! progress, volume, repeat and shuffle.

use crate::{
    durations::DurationCache,
    engine::{AudioEngine, EngineEvent},
    error::{PlaybackError, Result},
    events::{Notice, PlaybackEvent},
    playlist::{ActivePlaylist, Direction},
    types::{
        EngineState, PlaybackConfig, PlaybackSnapshot, RepeatMode, ShuffleAlgorithm,
        TraversalPolicy,
    },
    volume::Volume,
};
use cadence_core::{EntitlementGate, Track, TrackCatalog, TrackId};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Single source of truth for what is playing and how
///
/// All actions mutate in-memory state synchronously. Starting a new track is
/// split in two phases so the engine never starts the previous source:
///
/// 1. `play_track` / `play_playlist` / `next_song` / `previous_song` pause the
///    engine, move the pointer, reset progress, load the new source and record
///    a *pending play*.
/// 2. `commit_play` (or the engine's `MetadataLoaded` ready signal) issues
///    `play()` against whatever the pointer is at that moment.
///
/// Failed actions leave state untouched. User-facing failures are queued as
/// `PlaybackEvent::Notice`; nothing is surfaced as a panic.
pub struct PlaybackCoordinator {
    // Collaborators
    catalog: Arc<dyn TrackCatalog>,
    entitlements: Arc<dyn EntitlementGate>,
    engine: Box<dyn AudioEngine>,

    // Pointer and traversal
    current_index: usize,
    current_track: Track,
    playlist: Option<ActivePlaylist>,

    // Transport
    is_playing: bool,
    play_pending: bool,
    engine_state: EngineState,
    progress_percent: f64,
    duration: Duration,

    // Settings
    volume: Volume,
    repeat: RepeatMode,
    shuffle_enabled: bool,
    shuffle_algorithm: ShuffleAlgorithm,

    durations: DurationCache,

    // Event queue for UI synchronization
    pending_events: Vec<PlaybackEvent>,
}

impl PlaybackCoordinator {
    /// Create a coordinator positioned on the first catalog track, paused
    ///
    /// The first track is loaded into the engine immediately so a source is
    /// present from the start.
    pub fn new(
        config: PlaybackConfig,
        catalog: Arc<dyn TrackCatalog>,
        entitlements: Arc<dyn EntitlementGate>,
        engine: Box<dyn AudioEngine>,
    ) -> Result<Self> {
        let current_track = catalog.get(0).cloned().ok_or(PlaybackError::EmptyCatalog)?;

        let mut coordinator = Self {
            catalog,
            entitlements,
            engine,
            current_index: 0,
            current_track,
            playlist: None,
            is_playing: false,
            play_pending: false,
            engine_state: EngineState::Idle,
            progress_percent: 0.0,
            duration: Duration::ZERO,
            volume: Volume::new(config.volume, config.volume_curve),
            repeat: config.repeat,
            shuffle_enabled: config.shuffle,
            shuffle_algorithm: config.shuffle_algorithm,
            durations: DurationCache::new(config.duration_cache_size),
            pending_events: Vec::new(),
        };

        coordinator.engine.set_gain(coordinator.volume.gain());
        coordinator.load_current();
        // Keep notices from the initial load, e.g. an unavailable first track
        coordinator.pending_events.retain(PlaybackEvent::is_notice);

        info!(
            tracks = coordinator.catalog.len(),
            volume = coordinator.volume.level(),
            "Playback coordinator ready"
        );

        Ok(coordinator)
    }

    // ===== Track Selection =====

    /// Play a single track within the full catalog
    ///
    /// The active playlist becomes the whole catalog, so `next`/`previous`
    /// continue from this track in catalog order. The engine is paused and the
    /// new source loaded; `play()` follows on `commit_play`.
    pub fn play_track(&mut self, id: &TrackId) -> Result<()> {
        let (index, track) = self.resolve(id)?;
        self.check_entitlement(&track)?;

        let ids = self.catalog.all().iter().map(|t| t.id.clone()).collect();
        let playlist = ActivePlaylist::new(ids, index)
            .ok_or_else(|| PlaybackError::InvalidTrackReference(id.clone()))?;

        info!(track_id = %id, index, "Playing track from catalog");

        self.install_playlist(playlist);
        self.switch_to(index, track);
        self.request_play();
        Ok(())
    }

    /// Play an ordered sequence of tracks, starting with the first
    ///
    /// Traversal stays scoped to this sequence until another `play_track` or
    /// `play_playlist` replaces it.
    pub fn play_playlist(&mut self, ids: &[TrackId]) -> Result<()> {
        let Some(first) = ids.first() else {
            warn!("Ignoring empty playlist");
            return Err(PlaybackError::EmptyPlaylist);
        };

        if let Some(unknown) = ids.iter().find(|id| self.catalog.index_of(id).is_none()) {
            warn!(track_id = %unknown, "Playlist references a track missing from the catalog");
            return Err(PlaybackError::InvalidTrackReference(unknown.clone()));
        }

        let (index, track) = self.resolve(first)?;
        self.check_entitlement(&track)?;

        let playlist =
            ActivePlaylist::new(ids.to_vec(), 0).ok_or(PlaybackError::EmptyPlaylist)?;

        info!(length = ids.len(), first = %first, "Playing playlist");

        self.install_playlist(playlist);
        self.switch_to(index, track);
        self.request_play();
        Ok(())
    }

    /// Second phase of a track start
    ///
    /// Issues `play()` for the current pointer if a play is pending. Returns
    /// whether anything was committed; a stale second commit is a no-op.
    pub fn commit_play(&mut self) -> bool {
        if !self.play_pending {
            return false;
        }
        self.play_pending = false;

        if self.engine_state == EngineState::Idle {
            return false;
        }

        self.start_engine();
        true
    }

    /// Move to the next track of the active playlist (circular)
    ///
    /// No-op without an active playlist. Returns whether the pointer moved.
    pub fn next_song(&mut self) -> bool {
        self.step(Direction::Forward, true)
    }

    /// Move to the previous track of the active playlist (circular)
    pub fn previous_song(&mut self) -> bool {
        self.step(Direction::Backward, true)
    }

    // ===== Transport =====

    /// Flip the transport flag
    pub fn toggle_play(&mut self) {
        if self.is_playing {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Start or resume the current track
    ///
    /// From `Idle` the current source is loaded again first (retry after a
    /// load failure); from `Ended` the track restarts at 0. A track the
    /// session may not play is refused with a `PremiumRequired` notice.
    pub fn play(&mut self) {
        let track = self.current_track.clone();
        if self.check_entitlement(&track).is_err() {
            self.play_pending = false;
            return;
        }

        match self.engine_state {
            EngineState::Idle => {
                self.load_current();
                if self.engine_state == EngineState::Idle {
                    return;
                }
            }
            EngineState::Ended => self.restart_current(),
            EngineState::Loading | EngineState::Ready => {}
        }

        self.play_pending = false;
        self.start_engine();
    }

    /// Pause playback
    pub fn pause(&mut self) {
        self.is_playing = false;
        self.play_pending = false;
        self.engine.pause();
        self.emit_state_changed();
    }

    // ===== Seek =====

    /// Seek by percentage (0-100) of the known duration
    ///
    /// Progress is updated optimistically so the UI does not snap back before
    /// the next timing update. Ignored while the duration is unknown.
    pub fn handle_progress_change(&mut self, percent: f64) {
        if percent.is_nan() {
            debug!("Seek ignored, percentage is not a number");
            return;
        }
        let percent = percent.clamp(0.0, 100.0);

        if self.duration.is_zero() {
            debug!(percent, "Seek ignored, duration not yet known");
            return;
        }

        let target = self.duration.mul_f64(percent / 100.0);
        if let Err(e) = self.engine.seek(target) {
            warn!(error = %e, ?target, "Engine rejected seek");
            return;
        }

        self.progress_percent = percent;
        if self.engine_state == EngineState::Ended {
            self.engine_state = EngineState::Ready;
            self.emit_state_changed();
        }
        self.emit_position_update();
    }

    /// Seek to an absolute position (clamped to the known duration)
    pub fn seek_to(&mut self, position: Duration) {
        if self.duration.is_zero() {
            debug!(?position, "Seek ignored, duration not yet known");
            return;
        }

        let position = position.min(self.duration);
        let percent = position.as_secs_f64() / self.duration.as_secs_f64() * 100.0;
        self.handle_progress_change(percent);
    }

    // ===== Volume =====

    /// Set volume (clamped to 0-100)
    pub fn set_volume(&mut self, level: u8) {
        self.volume.set_level(level);
        self.apply_gain();
    }

    /// Mute audio
    pub fn mute(&mut self) {
        self.volume.mute();
        self.apply_gain();
    }

    /// Unmute audio
    pub fn unmute(&mut self) {
        self.volume.unmute();
        self.apply_gain();
    }

    /// Toggle mute state
    pub fn toggle_mute(&mut self) {
        self.volume.toggle_mute();
        self.apply_gain();
    }

    // ===== Repeat & Shuffle =====

    /// Set repeat mode (affects end-of-track handling only)
    pub fn set_repeat_mode(&mut self, mode: RepeatMode) {
        self.repeat = mode;
        self.pending_events
            .push(PlaybackEvent::RepeatModeChanged { mode });
    }

    /// Enable or disable shuffled traversal
    ///
    /// Enabling computes a new traversal order for the active playlist with
    /// the current track first; disabling restores playlist order.
    pub fn set_shuffle_enabled(&mut self, enabled: bool) {
        if self.shuffle_enabled == enabled {
            return;
        }
        self.shuffle_enabled = enabled;

        if let Some(playlist) = self.playlist.as_mut() {
            if enabled {
                let artists = artists_of(self.catalog.as_ref(), playlist.ids());
                playlist.shuffle(&artists, self.shuffle_algorithm, &mut rand::thread_rng());
            } else {
                playlist.unshuffle();
            }
        }

        self.pending_events
            .push(PlaybackEvent::ShuffleChanged { enabled });
    }

    // ===== Engine Events =====

    /// Apply an event reported by the audio engine
    pub fn handle_engine_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::MetadataLoaded { duration } => self.on_metadata_loaded(duration),
            EngineEvent::TimeUpdate { position } => self.on_time_update(position),
            EngineEvent::Ended => self.on_ended(),
            EngineEvent::LoadFailed { reason } => self.fail_load(reason),
        }
    }

    fn on_metadata_loaded(&mut self, duration: Duration) {
        debug!(track_id = %self.current_track.id, ?duration, "Metadata loaded");

        self.duration = duration;
        self.durations.insert(self.current_track.id.clone(), duration);
        self.pending_events.push(PlaybackEvent::DurationResolved {
            track_id: self.current_track.id.clone(),
            duration_ms: duration.as_millis() as u64,
        });

        if self.engine_state == EngineState::Loading {
            self.engine_state = EngineState::Ready;
            self.emit_state_changed();
        }

        // Engine-ready signal doubles as the commit point for a pending play
        self.commit_play();
    }

    fn on_time_update(&mut self, position: Duration) {
        if self.duration.is_zero() {
            return;
        }

        self.progress_percent =
            (position.as_secs_f64() / self.duration.as_secs_f64() * 100.0).clamp(0.0, 100.0);
        self.emit_position_update();
    }

    fn on_ended(&mut self) {
        let finished = self.current_track.id.clone();
        debug!(track_id = %finished, repeat = ?self.repeat, "Track ended");
        self.pending_events
            .push(PlaybackEvent::TrackFinished { track_id: finished });

        match self.repeat {
            RepeatMode::One => {
                self.restart_current();
                self.play_pending = false;
                self.start_engine();
            }
            RepeatMode::All => {
                if !self.step(Direction::Forward, true) {
                    // Single-track scope: loop it
                    self.restart_current();
                    self.play_pending = false;
                    self.start_engine();
                }
            }
            RepeatMode::Off => {
                if !self.step(Direction::Forward, false) {
                    self.finish();
                }
            }
        }
    }

    // ===== State Queries =====

    /// Catalog index of the current track
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Current track
    pub fn current_track(&self) -> &Track {
        &self.current_track
    }

    /// Active playlist, if any
    pub fn active_playlist(&self) -> Option<&ActivePlaylist> {
        self.playlist.as_ref()
    }

    /// Transport intent
    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Whether a started track still waits for `commit_play`
    pub fn is_play_pending(&self) -> bool {
        self.play_pending
    }

    /// Engine lifecycle
    pub fn engine_state(&self) -> EngineState {
        self.engine_state
    }

    /// Progress in percent (0-100)
    pub fn progress_percent(&self) -> f64 {
        self.progress_percent
    }

    /// Duration of the current track (zero until metadata loads)
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Current volume level (0-100)
    pub fn volume(&self) -> u8 {
        self.volume.level()
    }

    /// Check if muted
    pub fn is_muted(&self) -> bool {
        self.volume.is_muted()
    }

    /// Current repeat mode
    pub fn repeat_mode(&self) -> RepeatMode {
        self.repeat
    }

    /// Whether shuffle is on
    pub fn shuffle_enabled(&self) -> bool {
        self.shuffle_enabled
    }

    /// Traversal policy in effect for the active playlist
    pub fn traversal_policy(&self) -> TraversalPolicy {
        self.playlist
            .as_ref()
            .map_or(TraversalPolicy::Linear, ActivePlaylist::policy)
    }

    /// Engine-reported duration of any track seen this session
    pub fn resolved_duration(&self, id: &TrackId) -> Option<Duration> {
        self.durations.get(id)
    }

    /// Duration string for display
    ///
    /// Prefers the engine-reported duration and falls back to the catalog's
    /// published string.
    pub fn display_duration(&self, id: &TrackId) -> Option<String> {
        self.durations.display(id).or_else(|| {
            self.catalog
                .find_by_id(id)
                .map(|t| t.duration.clone())
                .filter(|d| !d.is_empty())
        })
    }

    /// Point-in-time view for rendering
    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            current_index: self.current_index,
            current_track_id: self.current_track.id.clone(),
            active_playlist: self.playlist.as_ref().map(|p| p.ids().to_vec()),
            is_playing: self.is_playing,
            engine_state: self.engine_state,
            progress_percent: self.progress_percent,
            duration_seconds: self.duration.as_secs_f64(),
            volume: self.volume.level(),
            is_muted: self.volume.is_muted(),
            repeat_mode: self.repeat,
            shuffle_enabled: self.shuffle_enabled,
            play_pending: self.play_pending,
        }
    }

    // ===== Events =====

    /// Drain all pending events
    ///
    /// Returns all events emitted since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Check if there are pending events
    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    // ===== Internals =====

    /// Resolve a track id to its catalog index and record
    fn resolve(&self, id: &TrackId) -> Result<(usize, Track)> {
        self.catalog
            .index_of(id)
            .and_then(|index| self.catalog.get(index).map(|t| (index, t.clone())))
            .ok_or_else(|| {
                warn!(track_id = %id, "Track missing from catalog");
                PlaybackError::InvalidTrackReference(id.clone())
            })
    }

    fn check_entitlement(&mut self, track: &Track) -> Result<()> {
        if self.entitlements.can_play(track) {
            return Ok(());
        }

        info!(track_id = %track.id, "Premium required");
        self.pending_events
            .push(PlaybackEvent::Notice(Notice::PremiumRequired {
                track_id: track.id.clone(),
            }));
        Err(PlaybackError::EntitlementDenied(track.id.clone()))
    }

    fn install_playlist(&mut self, mut playlist: ActivePlaylist) {
        if self.shuffle_enabled {
            let artists = artists_of(self.catalog.as_ref(), playlist.ids());
            playlist.shuffle(&artists, self.shuffle_algorithm, &mut rand::thread_rng());
        }

        self.pending_events.push(PlaybackEvent::PlaylistChanged {
            length: playlist.len(),
        });
        self.playlist = Some(playlist);
    }

    /// First phase of every track change
    fn switch_to(&mut self, index: usize, track: Track) {
        self.engine.pause();

        let previous = std::mem::replace(&mut self.current_track, track);
        self.current_index = index;
        self.progress_percent = 0.0;
        self.duration = Duration::ZERO;
        self.play_pending = false;

        self.pending_events.push(PlaybackEvent::TrackChanged {
            track_id: self.current_track.id.clone(),
            previous_track_id: previous.id,
        });
        self.emit_position_update();

        self.load_current();
    }

    fn request_play(&mut self) {
        if self.engine_state != EngineState::Idle {
            self.play_pending = true;
        }
    }

    /// Walk the active playlist to the next track the session may play
    ///
    /// With `wrap == false` the walk stops at the end of the traversal order.
    fn step(&mut self, direction: Direction, wrap: bool) -> bool {
        let Some(playlist) = self.playlist.as_ref() else {
            debug!("No active playlist, traversal ignored");
            return false;
        };

        let len = playlist.len();
        let mut slot = playlist.cursor();
        let mut target = None;

        for _ in 1..len {
            let wraps = match direction {
                Direction::Forward => slot + 1 == len,
                Direction::Backward => slot == 0,
            };
            if wraps && !wrap {
                break;
            }

            slot = playlist.neighbor(slot, direction);
            let id = playlist.id_at(slot);
            let Some(index) = self.catalog.index_of(id) else {
                warn!(track_id = %id, "Playlist entry missing from catalog, skipping");
                continue;
            };
            let Some(track) = self.catalog.get(index) else {
                continue;
            };
            if !self.entitlements.can_play(track) {
                debug!(track_id = %id, "Skipping premium track");
                continue;
            }

            target = Some((slot, index, track.clone()));
            break;
        }

        let Some((slot, index, track)) = target else {
            return false;
        };

        let resume = self.is_playing || self.play_pending;
        if let Some(playlist) = self.playlist.as_mut() {
            playlist.set_cursor(slot);
        }
        self.switch_to(index, track);
        if resume {
            self.request_play();
        }
        true
    }

    fn load_current(&mut self) {
        self.engine_state = EngineState::Loading;

        if let Err(e) = self.engine.load(&self.current_track.source) {
            self.fail_load(e.to_string());
            return;
        }

        debug!(
            track_id = %self.current_track.id,
            source = %self.current_track.source,
            "Loading source"
        );
        self.emit_state_changed();
    }

    fn fail_load(&mut self, reason: String) {
        error!(track_id = %self.current_track.id, %reason, "Failed to load track");

        self.engine_state = EngineState::Idle;
        self.is_playing = false;
        self.play_pending = false;

        self.pending_events
            .push(PlaybackEvent::Notice(Notice::TrackUnavailable {
                track_id: self.current_track.id.clone(),
                reason,
            }));
        self.emit_state_changed();
    }

    fn start_engine(&mut self) {
        self.is_playing = true;

        // Intent stays "playing" even when the platform refuses; the next
        // user interaction reconciles the engine.
        if let Err(e) = self.engine.play() {
            warn!(track_id = %self.current_track.id, error = %e, "Engine refused playback");
        }
        self.emit_state_changed();
    }

    fn restart_current(&mut self) {
        if let Err(e) = self.engine.seek(Duration::ZERO) {
            warn!(error = %e, "Engine rejected restart seek");
        }

        self.progress_percent = 0.0;
        self.engine_state = if self.duration.is_zero() {
            EngineState::Loading
        } else {
            EngineState::Ready
        };
        self.emit_position_update();
    }

    fn finish(&mut self) {
        info!(track_id = %self.current_track.id, "Reached end of playlist");

        self.is_playing = false;
        self.play_pending = false;
        self.engine_state = EngineState::Ended;
        self.emit_state_changed();
    }

    fn apply_gain(&mut self) {
        self.engine.set_gain(self.volume.gain());
        self.pending_events.push(PlaybackEvent::VolumeChanged {
            level: self.volume.level(),
            is_muted: self.volume.is_muted(),
        });
    }

    fn emit_state_changed(&mut self) {
        self.pending_events.push(PlaybackEvent::StateChanged {
            is_playing: self.is_playing,
            engine_state: self.engine_state,
        });
    }

    fn emit_position_update(&mut self) {
        self.pending_events.push(PlaybackEvent::PositionUpdate {
            progress_percent: self.progress_percent,
            duration_ms: self.duration.as_millis() as u64,
        });
    }
}

/// Artist of each playlist entry, aligned with `ids`
fn artists_of<'a>(catalog: &'a dyn TrackCatalog, ids: &[TrackId]) -> Vec<&'a str> {
    ids.iter()
        .map(|id| catalog.find_by_id(id).map_or("", |t| t.artist.as_str()))
        .collect()
}
