//! Resolved track durations
//!
//! The catalog publishes a human-readable duration that may be missing or
//! approximate. Once the engine reports the real duration it is remembered
//! here, keyed by track id, instead of being written back into the catalog.

use cadence_core::{format_duration, TrackId};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::time::Duration;

/// Bounded read-through cache of engine-reported durations
#[derive(Debug)]
pub struct DurationCache {
    entries: LruCache<TrackId, Duration>,
}

impl DurationCache {
    /// Create a cache holding at most `capacity` entries (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
        }
    }

    /// Remember the resolved duration of a track
    pub fn insert(&mut self, id: TrackId, duration: Duration) {
        self.entries.put(id, duration);
    }

    /// Resolved duration, if the engine has reported one
    pub fn get(&self, id: &TrackId) -> Option<Duration> {
        self.entries.peek(id).copied()
    }

    /// Resolved duration formatted like the catalog (`m:ss`)
    pub fn display(&self, id: &TrackId) -> Option<String> {
        self.get(id).map(format_duration)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
