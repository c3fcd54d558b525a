//! Active playlist and traversal order
//!
//! The playlist keeps the ids in the order the caller supplied. Traversal walks
//! a separate `order` (a permutation of playlist positions) through a cursor:
//!
//! ```text
//! ids:    [5, 2, 9, 4]
//! order:  [2, 0, 3, 1]   (Shuffled) or [0, 1, 2, 3] (Linear)
//! cursor:  ^ slot 0 -> ids[order[0]] = 9
//! ```
//!
//! Keeping a cursor instead of searching by id makes repeated ids in a
//! playlist unambiguous.

use crate::shuffle::shuffle_positions;
use crate::types::{ShuffleAlgorithm, TraversalPolicy};
use cadence_core::TrackId;
use rand::Rng;

/// Traversal direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Ordered, coordinator-scoped track sequence
#[derive(Debug, Clone, PartialEq)]
pub struct ActivePlaylist {
    /// Track ids in caller order
    ids: Vec<TrackId>,

    /// Traversal order (permutation of positions into `ids`)
    order: Vec<usize>,

    /// Current slot in `order`
    cursor: usize,

    /// Whether `order` is the identity
    policy: TraversalPolicy,
}

impl ActivePlaylist {
    /// Create a linear playlist positioned at `start`
    ///
    /// Returns `None` for an empty id list or an out-of-range start.
    pub fn new(ids: Vec<TrackId>, start: usize) -> Option<Self> {
        if start >= ids.len() {
            return None;
        }

        Some(Self {
            order: (0..ids.len()).collect(),
            ids,
            cursor: start,
            policy: TraversalPolicy::Linear,
        })
    }

    /// Track ids in caller order
    pub fn ids(&self) -> &[TrackId] {
        &self.ids
    }

    /// Number of tracks
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the playlist has no tracks (never true once constructed)
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Whether `id` is a member
    pub fn contains(&self, id: &TrackId) -> bool {
        self.ids.contains(id)
    }

    /// Current traversal policy
    pub fn policy(&self) -> TraversalPolicy {
        self.policy
    }

    /// Current slot in traversal order
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Track under the cursor
    pub fn current(&self) -> &TrackId {
        self.id_at(self.cursor)
    }

    /// Track at a traversal slot (wraps out-of-range slots)
    pub fn id_at(&self, slot: usize) -> &TrackId {
        let slot = slot % self.order.len();
        &self.ids[self.order[slot]]
    }

    /// Ids in traversal order
    pub fn traversal_order(&self) -> Vec<&TrackId> {
        self.order.iter().map(|&p| &self.ids[p]).collect()
    }

    /// Neighbouring slot, wrapping at both ends
    pub fn neighbor(&self, slot: usize, direction: Direction) -> usize {
        let len = self.order.len();
        match direction {
            Direction::Forward => (slot + 1) % len,
            Direction::Backward => (slot + len - 1) % len,
        }
    }

    /// Move the cursor to `slot`
    pub fn set_cursor(&mut self, slot: usize) {
        self.cursor = slot % self.order.len();
    }

    /// Replace the traversal order with a shuffled permutation
    ///
    /// The track under the cursor moves to slot 0 so one full cycle visits
    /// every other track before it comes round again.
    pub fn shuffle<R: Rng + ?Sized>(
        &mut self,
        artists: &[&str],
        algorithm: ShuffleAlgorithm,
        rng: &mut R,
    ) {
        let anchor = self.order[self.cursor];
        let mut rest: Vec<usize> = (0..self.ids.len()).filter(|&p| p != anchor).collect();
        shuffle_positions(&mut rest, artists, algorithm, rng);

        self.order = std::iter::once(anchor).chain(rest).collect();
        self.cursor = 0;
        self.policy = TraversalPolicy::Shuffled;
    }

    /// Restore playlist order, keeping the cursor on the same track
    pub fn unshuffle(&mut self) {
        let position = self.order[self.cursor];
        self.order = (0..self.ids.len()).collect();
        self.cursor = position;
        self.policy = TraversalPolicy::Linear;
    }
}
