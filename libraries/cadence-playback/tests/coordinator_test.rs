//! Integration tests for the playback coordinator
//!
//! These tests drive the public API the way a host does: actions from the
//! UI, then engine notifications, then drained events.

use cadence_core::{Capability, StaticCatalog, StaticEntitlements, Track, TrackId};
use cadence_playback::{
    AudioEngine, EngineError, EngineEvent, EngineState, Notice, PlaybackConfig,
    PlaybackCoordinator, PlaybackError, PlaybackEvent, RepeatMode,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ===== Test Helpers =====

/// Engine that keeps a shared log of what it was asked to do
#[derive(Clone, Default)]
struct LogEngine {
    log: Arc<Mutex<Vec<String>>>,
    source: Arc<Mutex<Option<String>>>,
}

impl LogEngine {
    fn log(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    fn clear(&self) {
        self.log.lock().unwrap().clear();
    }

    fn source(&self) -> Option<String> {
        self.source.lock().unwrap().clone()
    }
}

impl AudioEngine for LogEngine {
    fn load(&mut self, source: &str) -> Result<(), EngineError> {
        if source.is_empty() {
            return Err(EngineError::Load("empty source".into()));
        }
        *self.source.lock().unwrap() = Some(source.to_string());
        self.log.lock().unwrap().push(format!("load {source}"));
        Ok(())
    }

    fn play(&mut self) -> Result<(), EngineError> {
        let source = self.source().unwrap_or_default();
        self.log.lock().unwrap().push(format!("play {source}"));
        Ok(())
    }

    fn pause(&mut self) {
        self.log.lock().unwrap().push("pause".into());
    }

    fn seek(&mut self, position: Duration) -> Result<(), EngineError> {
        self.log
            .lock()
            .unwrap()
            .push(format!("seek {}", position.as_secs()));
        Ok(())
    }

    fn set_gain(&mut self, _gain: f32) {}
}

/// Ten tracks with ids "1".."10"; track 7 is premium, track 8 has no source
fn catalog() -> StaticCatalog {
    let tracks = (1..=10u32)
        .map(|n| {
            let source = if n == 8 {
                String::new()
            } else {
                format!("track-{n}.mp3")
            };
            Track::new(n, format!("Song {n}"), format!("Artist {}", n % 3), source)
                .with_premium(n == 7)
        })
        .collect();
    StaticCatalog::new(tracks).unwrap()
}

fn coordinator_with_access(premium: bool) -> (PlaybackCoordinator, LogEngine) {
    let engine = LogEngine::default();
    let mut coordinator = PlaybackCoordinator::new(
        PlaybackConfig::default(),
        Arc::new(catalog()),
        Arc::new(StaticEntitlements { premium }),
        Box::new(engine.clone()),
    )
    .unwrap();
    coordinator.drain_events();
    engine.clear();
    (coordinator, engine)
}

fn coordinator() -> (PlaybackCoordinator, LogEngine) {
    coordinator_with_access(false)
}

fn ids(raw: &[u32]) -> Vec<TrackId> {
    raw.iter().copied().map(TrackId::from).collect()
}

// ===== Scenarios =====

#[test]
fn test_default_state() {
    let (coordinator, _engine) = coordinator();

    assert_eq!(coordinator.current_index(), 0);
    assert!(coordinator.active_playlist().is_none());
    assert!(!coordinator.is_playing());
    assert_eq!(coordinator.progress_percent(), 0.0);
    assert_eq!(coordinator.volume(), 80);
    assert_eq!(coordinator.repeat_mode(), RepeatMode::Off);
    assert!(!coordinator.shuffle_enabled());
}

#[test]
fn test_play_playlist_scenario() {
    let (mut coordinator, engine) = coordinator();

    coordinator.play_playlist(&ids(&[5, 2, 9])).unwrap();
    assert!(!coordinator.is_playing(), "play waits for the commit");

    assert!(coordinator.commit_play());

    let playlist = coordinator.active_playlist().unwrap();
    assert_eq!(playlist.ids(), ids(&[5, 2, 9]).as_slice());
    assert_eq!(coordinator.current_index(), 4);
    assert!(coordinator.is_playing());
    assert_eq!(coordinator.progress_percent(), 0.0);
    assert_eq!(
        engine.log(),
        vec!["pause", "load track-5.mp3", "play track-5.mp3"]
    );
}

#[test]
fn test_previous_within_playlist() {
    let (mut coordinator, _engine) = coordinator();
    coordinator.play_playlist(&ids(&[5, 2, 9])).unwrap();
    coordinator.next_song();
    assert_eq!(coordinator.current_track().id, TrackId::from(2u32));

    coordinator.previous_song();

    assert_eq!(coordinator.current_track().id, TrackId::from(5u32));
}

#[test]
fn test_circularity() {
    let (mut coordinator, _engine) = coordinator();
    coordinator.play_playlist(&ids(&[1, 2, 3])).unwrap();
    coordinator.next_song();
    coordinator.next_song();
    assert_eq!(coordinator.current_track().id, TrackId::from(3u32));

    coordinator.next_song();
    assert_eq!(coordinator.current_track().id, TrackId::from(1u32));

    coordinator.previous_song();
    assert_eq!(coordinator.current_track().id, TrackId::from(3u32));
}

#[test]
fn test_entitlement_gate() {
    let (mut coordinator, engine) = coordinator();
    coordinator.play_playlist(&ids(&[1, 2])).unwrap();
    coordinator.commit_play();
    coordinator.drain_events();
    engine.clear();

    let index = coordinator.current_index();
    let playlist = coordinator.active_playlist().cloned();

    let result = coordinator.play_track(&TrackId::from(7u32));

    assert!(matches!(result, Err(PlaybackError::EntitlementDenied(_))));
    assert_eq!(coordinator.current_index(), index);
    assert!(coordinator.is_playing());
    assert_eq!(coordinator.active_playlist().cloned(), playlist);
    assert!(engine.log().is_empty());

    let notices: Vec<PlaybackEvent> = coordinator
        .drain_events()
        .into_iter()
        .filter(PlaybackEvent::is_notice)
        .collect();
    assert_eq!(
        notices,
        vec![PlaybackEvent::Notice(Notice::PremiumRequired {
            track_id: TrackId::from(7u32),
        })]
    );
}

#[test]
fn test_entitlement_from_closure() {
    let engine = LogEngine::default();
    let gate = |capability: Capability| matches!(capability, Capability::PremiumContent);
    let mut coordinator = PlaybackCoordinator::new(
        PlaybackConfig::default(),
        Arc::new(catalog()),
        Arc::new(gate),
        Box::new(engine),
    )
    .unwrap();

    assert!(coordinator.play_track(&TrackId::from(7u32)).is_ok());
}

#[test]
fn test_repeat_one() {
    let (mut coordinator, engine) = coordinator();
    coordinator.set_repeat_mode(RepeatMode::One);
    coordinator.play_track(&TrackId::from(4u32)).unwrap();
    coordinator.handle_engine_event(EngineEvent::MetadataLoaded {
        duration: Duration::from_secs(120),
    });
    coordinator.handle_engine_event(EngineEvent::TimeUpdate {
        position: Duration::from_secs(119),
    });
    engine.clear();

    coordinator.handle_engine_event(EngineEvent::Ended);

    assert_eq!(coordinator.current_index(), 3);
    assert!(coordinator.is_playing());
    assert_eq!(coordinator.progress_percent(), 0.0);
    assert_eq!(engine.log(), vec!["seek 0", "play track-4.mp3"]);
}

#[test]
fn test_auto_advance_through_playlist() {
    let (mut coordinator, engine) = coordinator();
    coordinator.play_playlist(&ids(&[1, 2, 3])).unwrap();

    for _ in 0..3 {
        coordinator.handle_engine_event(EngineEvent::MetadataLoaded {
            duration: Duration::from_secs(60),
        });
        coordinator.handle_engine_event(EngineEvent::Ended);
    }

    assert_eq!(coordinator.current_track().id, TrackId::from(3u32));
    assert_eq!(coordinator.engine_state(), EngineState::Ended);
    assert!(!coordinator.is_playing());

    let plays: Vec<String> = engine
        .log()
        .into_iter()
        .filter(|line| line.starts_with("play"))
        .collect();
    assert_eq!(
        plays,
        vec!["play track-1.mp3", "play track-2.mp3", "play track-3.mp3"]
    );

    let finished: Vec<PlaybackEvent> = coordinator
        .drain_events()
        .into_iter()
        .filter(|e| matches!(e, PlaybackEvent::TrackFinished { .. }))
        .collect();
    assert_eq!(finished.len(), 3);
}

#[test]
fn test_load_rejected_up_front() {
    let (mut coordinator, engine) = coordinator();

    coordinator.play_track(&TrackId::from(8u32)).unwrap();

    assert_eq!(coordinator.current_index(), 7);
    assert_eq!(coordinator.engine_state(), EngineState::Idle);
    assert!(!coordinator.is_play_pending());
    assert!(!coordinator.commit_play());
    assert!(!coordinator.is_playing());
    assert!(!engine.log().iter().any(|line| line.starts_with("play")));
    assert!(coordinator.drain_events().iter().any(|e| matches!(
        e,
        PlaybackEvent::Notice(Notice::TrackUnavailable { track_id, .. })
            if *track_id == TrackId::from(8u32)
    )));

    // Skip past the broken track
    assert!(coordinator.next_song());
    assert_eq!(coordinator.current_index(), 8);
    assert_eq!(coordinator.engine_state(), EngineState::Loading);
}

#[test]
fn test_progress_reset_on_track_change() {
    let (mut coordinator, _engine) = coordinator();
    coordinator.play_playlist(&ids(&[1, 2])).unwrap();
    coordinator.handle_engine_event(EngineEvent::MetadataLoaded {
        duration: Duration::from_secs(100),
    });
    coordinator.handle_progress_change(70.0);
    assert_eq!(coordinator.progress_percent(), 70.0);

    coordinator.next_song();

    assert_eq!(coordinator.progress_percent(), 0.0);
    assert_eq!(coordinator.duration(), Duration::ZERO);
    assert_eq!(coordinator.engine_state(), EngineState::Loading);
}

#[test]
fn test_volume_persists_across_tracks() {
    let (mut coordinator, _engine) = coordinator();
    coordinator.set_volume(35);
    coordinator.play_playlist(&ids(&[1, 2])).unwrap();
    coordinator.next_song();

    assert_eq!(coordinator.volume(), 35);
}

#[test]
fn test_events_serialize_for_ui() {
    let (mut coordinator, _engine) = coordinator();
    coordinator.play_track(&TrackId::from(7u32)).ok();

    let events = coordinator.drain_events();
    let json = serde_json::to_value(&events[0]).unwrap();

    assert_eq!(json["type"], "notice");
    assert_eq!(json["kind"], "premiumRequired");
    assert_eq!(json["trackId"], "7");
}
