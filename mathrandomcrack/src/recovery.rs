//! Orchestrates bounds extraction, cache alignment, equation tracing and
//! GF(2) solving into a lazy stream of candidate [`MathRandom`] states.

use std::collections::BTreeMap;

use crate::bounds;
use crate::cache;
use crate::error::RecoveryError;
use crate::known_bits::KnownBits;
use crate::math_random::MathRandom;
use crate::tracer;

/// Number of cache-index guesses the driver brute-forces per recovery call.
const CACHE_GUESSES: u8 = 64;

/// Recovers every `Math.random()` state consistent with `observations`,
/// trying every possible starting cache index in turn.
///
/// `positions` defaults to `0..known_bits.len()` when absent. `max_candidates`
/// caps the number of candidates yielded in total; `None` enumerates every
/// solution of every cache-index guess, which can be astronomically large
/// for a severely under-determined system.
pub fn recover_from_known_bits(
    known_bits: Vec<KnownBits>,
    positions: Option<Vec<u64>>,
    max_candidates: Option<usize>,
) -> Box<dyn Iterator<Item = MathRandom>> {
    let positions = positions.unwrap_or_else(|| (0..known_bits.len() as u64).collect());
    assert_eq!(positions.len(), known_bits.len());
    let observations: BTreeMap<u64, KnownBits> = positions.into_iter().zip(known_bits).collect();

    let candidates = (0..CACHE_GUESSES).flat_map(move |cache_idx| {
        log::debug!("trying cache_idx guess {cache_idx}");
        let aligned = cache::align(&observations, cache_idx);
        let equations = tracer::trace_equations(&aligned);
        match crate::gf2::solve(&equations) {
            Ok(solution) => {
                let iter = solution.enumerate().map(move |(seed0, seed1)| {
                    let mut mr = MathRandom::new(0, 0);
                    mr.from_prev_state(seed0, seed1, cache_idx);
                    mr
                });
                Box::new(iter) as Box<dyn Iterator<Item = MathRandom>>
            }
            Err(_) => Box::new(std::iter::empty()),
        }
    });

    match max_candidates {
        Some(n) => Box::new(candidates.take(n)),
        None => Box::new(candidates),
    }
}

/// Recovers possible states from a list of exact `Math.random()` doubles.
pub fn recover_from_doubles(
    doubles: &[f64],
    positions: Option<Vec<u64>>,
    max_candidates: Option<usize>,
) -> Result<Box<dyn Iterator<Item = MathRandom>>, RecoveryError> {
    let known_bits = doubles
        .iter()
        .map(|&d| bounds::from_double(d))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(recover_from_known_bits(known_bits, positions, max_candidates))
}

/// Recovers possible states from a list of `floor(r * factor + translation)`
/// observations.
pub fn recover_from_scaled(
    scaled: &[u64],
    factor: i64,
    translation: i64,
    positions: Option<Vec<u64>>,
    max_candidates: Option<usize>,
) -> Result<Box<dyn Iterator<Item = MathRandom>>, RecoveryError> {
    let known_bits = scaled
        .iter()
        .map(|&k| bounds::from_scaled(k, factor, translation))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(recover_from_known_bits(known_bits, positions, max_candidates))
}

/// Recovers possible states from a list of `[lo, hi]` bounds on observed
/// `Math.random()` outputs.
pub fn recover_from_bounds(
    bounds_list: &[(f64, f64)],
    positions: Option<Vec<u64>>,
    max_candidates: Option<usize>,
) -> Result<Box<dyn Iterator<Item = MathRandom>>, RecoveryError> {
    let known_bits = bounds_list
        .iter()
        .map(|&(lo, hi)| bounds::from_bounds(lo, hi))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(recover_from_known_bits(known_bits, positions, max_candidates))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recovers_seed_from_exact_successive_doubles() {
        let mut source = MathRandom::new(0xDEAD_BEEF, 0xCAFE_F00D);
        let doubles: Vec<f64> = (0..4).map(|_| source.next()).collect();

        let mut candidates = recover_from_doubles(&doubles, None, None).unwrap();
        let mut found = false;
        for mut candidate in candidates.by_ref().take(5000) {
            let replay: Vec<f64> = (0..4).map(|_| candidate.next()).collect();
            if replay == doubles {
                found = true;
                break;
            }
        }
        assert!(found, "true seed should be among the recovered candidates");
    }

    #[test]
    fn scattered_positions_still_recover_the_seed() {
        let mut source = MathRandom::new(9, 10);
        let all: Vec<f64> = (0..10).map(|_| source.next()).collect();
        let positions = vec![0u64, 4, 5, 9];
        let doubles: Vec<f64> = positions.iter().map(|&p| all[p as usize]).collect();

        let mut candidates =
            recover_from_doubles(&doubles, Some(positions), None).unwrap();
        let mut found = false;
        for mut candidate in candidates.by_ref().take(20000) {
            let replay: Vec<f64> = (0..10).map(|_| candidate.next()).collect();
            if replay == all {
                found = true;
                break;
            }
        }
        assert!(found);
    }

    #[test]
    fn invalid_double_is_rejected_before_solving() {
        assert!(recover_from_doubles(&[1.5], None, None).is_err());
    }

    #[test]
    fn max_candidates_caps_the_stream() {
        let mut source = MathRandom::new(1, 1);
        let doubles: Vec<f64> = (0..1).map(|_| source.next()).collect();
        let candidates = recover_from_doubles(&doubles, None, Some(3)).unwrap();
        assert!(candidates.count() <= 3);
    }
}
