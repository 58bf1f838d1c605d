//! V8 cache-index alignment.
//!
//! `Math.random()` delivers xs128 outputs from a 64-entry cache in LIFO
//! order: after a refill, calls consume `cache[63], cache[62], ..., cache[0]`
//! before the next refill. The recovery driver does not know which cache
//! slot was about to be consumed at the first observed call, so it brute
//! forces every possibility in `0..64` and, for each guess, remaps observed
//! call positions into xs128 emission order.

use std::collections::BTreeMap;

use crate::known_bits::KnownBits;

/// Size of V8's `Math.random()` cache.
pub const CACHE_SIZE: u64 = 64;

/// Remaps `observations` (keyed by call position) into xs128 emission
/// order, assuming `cache_idx` was the cache index about to be consumed at
/// the first observed call.
///
/// Returns one [`KnownBits`] per xs128 step since the refill preceding the
/// first observation, far enough to cover every observed position plus one
/// full extra cache's worth of slack.
pub fn align(observations: &BTreeMap<u64, KnownBits>, cache_idx: u8) -> Vec<KnownBits> {
    assert!((cache_idx as u64) < CACHE_SIZE);
    let max_position = observations.keys().copied().max().unwrap_or(0);
    let blocks = (max_position + 1 + CACHE_SIZE - 1) / CACHE_SIZE;
    let steps = CACHE_SIZE * (blocks + 1);

    let mut known_states_bits = Vec::with_capacity(steps as usize);
    for i in 0..steps as i64 {
        let cache_n = i / CACHE_SIZE as i64;
        let value_index = cache_n * CACHE_SIZE as i64 + cache_idx as i64 - (i % CACHE_SIZE as i64);
        let bits = if value_index >= 0 {
            observations
                .get(&(value_index as u64))
                .copied()
                .unwrap_or_else(KnownBits::all_unknown)
        } else {
            KnownBits::all_unknown()
        };
        known_states_bits.push(bits);
    }
    known_states_bits
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_observation_at_position_zero_lands_on_cache_idx_step() {
        let mut obs = BTreeMap::new();
        obs.insert(0u64, KnownBits::all_ones());
        for cache_idx in 0..64u8 {
            let aligned = align(&obs, cache_idx);
            for (i, bits) in aligned.iter().enumerate() {
                if i == cache_idx as usize {
                    assert_eq!(bits.known_count(), 64, "cache_idx={cache_idx}");
                } else {
                    assert_eq!(bits.known_count(), 0, "cache_idx={cache_idx} i={i}");
                }
            }
        }
    }

    #[test]
    fn blocks_of_64_revert_order() {
        // With cache_idx = 63, position 0 is consumed at the very first
        // xs128 step of the refill, and position 63 at the last step before
        // the refill that starts the next block.
        let mut obs = BTreeMap::new();
        obs.insert(0u64, KnownBits::all_ones());
        obs.insert(63u64, KnownBits::all_ones());
        let aligned = align(&obs, 63);
        assert_eq!(aligned[0].known_count(), 64);
        assert_eq!(aligned[63].known_count(), 64);
    }

    #[test]
    fn covers_at_least_one_full_cache_past_the_max_position() {
        let mut obs = BTreeMap::new();
        obs.insert(70u64, KnownBits::all_ones());
        let aligned = align(&obs, 0);
        assert!(aligned.len() >= 70 + 64);
    }
}
