//! Simulated audio engine
//!
//! Stands in for a platform engine: it keeps a transport position, advances
//! it on every clock tick, and reports back through an `EngineEvent`
//! channel the same way a real engine reports asynchronously.

use cadence_core::TrackCatalog;
use cadence_playback::{AudioEngine, EngineError, EngineEvent};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, trace};

#[derive(Debug, Default)]
struct Transport {
    source: Option<String>,
    duration: Duration,
    position: Duration,
    playing: bool,
    announced: bool,
    gain: f32,
}

type Shared = Arc<Mutex<Transport>>;

fn lock(shared: &Shared) -> MutexGuard<'_, Transport> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// `AudioEngine` half, owned by the coordinator
pub struct SimulatedEngine {
    transport: Shared,
    durations: HashMap<String, Duration>,
    default_duration: Duration,
}

/// Clock half, driven by the host loop
pub struct EngineClock {
    transport: Shared,
    events: mpsc::UnboundedSender<EngineEvent>,
}

impl SimulatedEngine {
    /// Create an engine that knows the catalog's sources
    ///
    /// Each source plays for its published duration, or `default_duration`
    /// when the catalog has none.
    pub fn new(
        catalog: &dyn TrackCatalog,
        default_duration: Duration,
    ) -> (Self, EngineClock, mpsc::UnboundedReceiver<EngineEvent>) {
        let durations = catalog
            .all()
            .iter()
            .filter_map(|t| t.published_duration().map(|d| (t.source.clone(), d)))
            .collect();

        let transport = Shared::default();
        let (tx, rx) = mpsc::unbounded_channel();

        let engine = Self {
            transport: Arc::clone(&transport),
            durations,
            default_duration,
        };
        let clock = EngineClock {
            transport,
            events: tx,
        };
        (engine, clock, rx)
    }
}

impl AudioEngine for SimulatedEngine {
    fn load(&mut self, source: &str) -> Result<(), EngineError> {
        if source.trim().is_empty() {
            return Err(EngineError::Load("empty source".to_string()));
        }

        let duration = self
            .durations
            .get(source)
            .copied()
            .unwrap_or(self.default_duration);

        let mut transport = lock(&self.transport);
        transport.source = Some(source.to_string());
        transport.duration = duration;
        transport.position = Duration::ZERO;
        transport.playing = false;
        transport.announced = false;

        debug!(source, ?duration, "Simulated load");
        Ok(())
    }

    fn play(&mut self) -> Result<(), EngineError> {
        let mut transport = lock(&self.transport);
        if transport.source.is_none() {
            return Err(EngineError::Load("no source loaded".to_string()));
        }
        transport.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        lock(&self.transport).playing = false;
    }

    fn seek(&mut self, position: Duration) -> Result<(), EngineError> {
        let mut transport = lock(&self.transport);
        if transport.source.is_none() {
            return Err(EngineError::Seek("no source loaded".to_string()));
        }
        transport.position = position.min(transport.duration);
        Ok(())
    }

    fn set_gain(&mut self, gain: f32) {
        lock(&self.transport).gain = gain;
        trace!(gain, "Simulated gain");
    }
}

impl EngineClock {
    /// Advance the simulated transport by `elapsed`
    ///
    /// The first tick after a load announces the duration; later ticks
    /// report position while playing and `Ended` at the end of the source.
    pub fn tick(&self, elapsed: Duration) {
        let mut transport = lock(&self.transport);
        if transport.source.is_none() {
            return;
        }

        if !transport.announced {
            transport.announced = true;
            self.send(EngineEvent::MetadataLoaded {
                duration: transport.duration,
            });
            return;
        }

        if !transport.playing {
            return;
        }

        transport.position = (transport.position + elapsed).min(transport.duration);
        self.send(EngineEvent::TimeUpdate {
            position: transport.position,
        });

        if transport.position >= transport.duration {
            transport.playing = false;
            self.send(EngineEvent::Ended);
        }
    }

    /// Current output gain
    pub fn gain(&self) -> f32 {
        lock(&self.transport).gain
    }

    fn send(&self, event: EngineEvent) {
        // Receiver gone means the host is shutting down
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_core::{StaticCatalog, Track};

    fn setup() -> (SimulatedEngine, EngineClock, mpsc::UnboundedReceiver<EngineEvent>) {
        let catalog = StaticCatalog::new(vec![
            Track::new("1", "Short", "A", "short.mp3").with_duration("0:02"),
            Track::new("2", "Unknown", "B", "unknown.mp3"),
        ])
        .unwrap();
        SimulatedEngine::new(&catalog, Duration::from_secs(30))
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<EngineEvent>) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[test]
    fn announces_duration_on_first_tick() {
        let (mut engine, clock, mut rx) = setup();
        engine.load("unknown.mp3").unwrap();

        clock.tick(Duration::from_millis(250));
        clock.tick(Duration::from_millis(250));

        assert_eq!(
            drain(&mut rx),
            vec![EngineEvent::MetadataLoaded {
                duration: Duration::from_secs(30)
            }]
        );
    }

    #[test]
    fn plays_to_end() {
        let (mut engine, clock, mut rx) = setup();
        engine.load("short.mp3").unwrap();
        clock.tick(Duration::ZERO);
        engine.play().unwrap();

        clock.tick(Duration::from_secs(1));
        clock.tick(Duration::from_secs(5));
        clock.tick(Duration::from_secs(1));

        assert_eq!(
            drain(&mut rx),
            vec![
                EngineEvent::MetadataLoaded {
                    duration: Duration::from_secs(2)
                },
                EngineEvent::TimeUpdate {
                    position: Duration::from_secs(1)
                },
                EngineEvent::TimeUpdate {
                    position: Duration::from_secs(2)
                },
                EngineEvent::Ended,
            ]
        );
    }

    #[test]
    fn rejects_empty_source_and_unloaded_play() {
        let (mut engine, _clock, _rx) = setup();
        assert!(matches!(engine.play(), Err(EngineError::Load(_))));
        assert!(matches!(engine.load(""), Err(EngineError::Load(_))));
        assert!(matches!(
            engine.seek(Duration::from_secs(1)),
            Err(EngineError::Seek(_))
        ));
    }

    #[test]
    fn gain_is_visible_to_clock() {
        let (mut engine, clock, _rx) = setup();
        engine.set_gain(0.25);
        assert_eq!(clock.gain(), 0.25);
    }
}
