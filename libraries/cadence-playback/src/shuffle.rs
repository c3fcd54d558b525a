//! Shuffle algorithms for traversal order
//!
//! Both algorithms permute playlist positions; the playlist itself keeps the
//! order the caller gave it.

use crate::types::ShuffleAlgorithm;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;

/// Shuffle playlist positions in place
///
/// `artists[p]` is the artist of the track at playlist position `p`; it is only
/// consulted by the smart algorithm.
pub fn shuffle_positions<R: Rng + ?Sized>(
    positions: &mut [usize],
    artists: &[&str],
    algorithm: ShuffleAlgorithm,
    rng: &mut R,
) {
    match algorithm {
        ShuffleAlgorithm::Random => positions.shuffle(rng),
        ShuffleAlgorithm::Smart => shuffle_smart(positions, artists, rng),
    }
}

/// Smart shuffle algorithm
///
/// Goals:
/// - Avoid same artist playing consecutively (when possible)
/// - Distribute artists evenly throughout playback
/// - Maintain some randomness (not fully deterministic)
///
/// Algorithm:
/// 1. Group positions by artist
/// 2. Randomize within each group and randomize group order
/// 3. Round-robin through the groups
fn shuffle_smart<R: Rng + ?Sized>(positions: &mut [usize], artists: &[&str], rng: &mut R) {
    if positions.len() <= 2 {
        positions.shuffle(rng);
        return;
    }

    let mut by_artist: HashMap<&str, Vec<usize>> = HashMap::new();
    for &position in positions.iter() {
        let artist = artists.get(position).copied().unwrap_or_default();
        by_artist.entry(artist).or_default().push(position);
    }

    let mut groups: Vec<Vec<usize>> = by_artist.into_values().collect();
    // HashMap iteration order is not a shuffle; sort first so the rng alone
    // decides group order.
    groups.sort_by_key(|group| group.first().copied());
    for group in &mut groups {
        group.shuffle(rng);
    }
    groups.shuffle(rng);

    let mut result = Vec::with_capacity(positions.len());
    let longest = groups.iter().map(Vec::len).max().unwrap_or(0);
    for round in 0..longest {
        for group in &groups {
            if let Some(&position) = group.get(round) {
                result.push(position);
            }
        }
    }

    positions.copy_from_slice(&result);
}
