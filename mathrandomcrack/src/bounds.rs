//! Converts observed `Math.random()` outputs into [`KnownBits`].
//!
//! Three observation shapes are supported: an exact double, a scaled integer
//! `floor(r * factor + translation)`, and a bounding interval. All three
//! reduce to "which of the 64 xs128 output bits are pinned down", which is
//! what the recovery core actually consumes.

use crate::error::CoreError;
use crate::known_bits::KnownBits;

/// `r = (state0 >> 12) | 0x3FF0_0000_0000_0000`, reinterpreted as an IEEE-754
/// double, minus 1.0. Loses the low 12 bits of `state0`.
pub fn state_to_double(state0: u64) -> f64 {
    let bits = (state0 >> 12) | 0x3FF0_0000_0000_0000;
    f64::from_bits(bits) - 1.0
}

/// Inverse of [`state_to_double`], up to the 12 bits it cannot recover:
/// `double_to_state(state_to_double(x)) == x & 0xFFFF_FFFF_FFFF_F000`.
pub fn double_to_state(d: f64) -> u64 {
    if d == 1.0 {
        return u64::MAX;
    }
    let q = (d + 1.0).to_bits() & 0x000F_FFFF_FFFF_FFFF;
    q << 12
}

/// Converts a `Math.random()` double observation into [`KnownBits`].
pub fn from_double(d: f64) -> Result<KnownBits, CoreError> {
    if !(0.0..=1.0).contains(&d) {
        return Err(CoreError::DoubleOutOfRange(d.to_string()));
    }
    if d == 1.0 {
        return Ok(KnownBits::all_ones());
    }
    let value = double_to_state(d);
    Ok(KnownBits::from_value_above(value, 12))
}

/// Converts a `floor(r * factor + translation)` observation into
/// [`KnownBits`], by finding the bits common to every xs128 state consistent
/// with that integer result.
pub fn from_scaled(k: u64, factor: i64, translation: i64) -> Result<KnownBits, CoreError> {
    if factor < 2 {
        return Err(CoreError::FactorTooSmall(factor));
    }
    let lo_double = (k as f64 - translation as f64) / factor as f64;
    let hi_double = (k as f64 - translation as f64 + 1.0) / factor as f64;
    let lo = double_to_state(lo_double);
    let hi = double_to_state(hi_double) | 0xFFF;
    Ok(KnownBits::from_msb_prefix(&common_prefix(lo, hi)))
}

/// Converts a `[lo, hi]` bound on a `Math.random()` output into
/// [`KnownBits`].
pub fn from_bounds(lo: f64, hi: f64) -> Result<KnownBits, CoreError> {
    if !(0.0..=1.0).contains(&lo) || !(0.0..=1.0).contains(&hi) || lo > hi {
        return Err(CoreError::InvalidBounds { lo, hi });
    }
    let lo_state = double_to_state(lo);
    let hi_state = double_to_state(hi) | 0xFFF;
    Ok(KnownBits::from_msb_prefix(&common_prefix(lo_state, hi_state)))
}

/// Returns the most-significant bits shared by every value in `[lo, hi]`,
/// MSB-first, stopping at the first bit position where values in the range
/// disagree.
///
/// Scans bit position 63 down to 0, tracking the running minimum-of-range
/// `s`: a bit is certainly 1 if setting it still keeps the whole range
/// `>= s + 2^exp` (i.e. `s + 2^exp <= lo`), certainly 0 if the whole range
/// stays `< s + 2^exp` (i.e. `hi <= s + 2^exp`), otherwise the scan stops.
pub fn common_prefix(lo: u64, hi: u64) -> Vec<bool> {
    debug_assert!(lo <= hi);
    let mut common = Vec::new();
    let mut s: u64 = 0;
    for exp in (0..64u32).rev() {
        let v = 1u64 << exp;
        if let Some(candidate) = s.checked_add(v) {
            if candidate <= lo {
                common.push(true);
                s = candidate;
                continue;
            }
            if hi <= candidate {
                common.push(false);
                continue;
            }
        }
        break;
    }
    common
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_round_trip_loses_low_12_bits() {
        let mut x = 0x1234_5678_9ABC_DEF0u64;
        x &= 0xFFFF_FFFF_FFFF_F000;
        let d = state_to_double(x);
        assert_eq!(double_to_state(d), x);
    }

    #[test]
    fn one_point_zero_is_all_ones() {
        assert_eq!(double_to_state(1.0), u64::MAX);
    }

    #[test]
    fn from_double_rejects_out_of_range() {
        assert!(from_double(-0.1).is_err());
        assert!(from_double(1.1).is_err());
    }

    #[test]
    fn from_double_exposes_top_52_bits() {
        let kb = from_double(0.5).unwrap();
        assert_eq!(kb.known_count(), 52);
        for i in 0..12 {
            assert_eq!(kb.get(i), None);
        }
    }

    #[test]
    fn from_scaled_rejects_small_factor() {
        assert!(from_scaled(5, 1, 0).is_err());
    }

    #[test]
    fn common_prefix_is_monotone_under_widening() {
        let lo = 0x1000_0000_0000_0000u64;
        let hi_narrow = lo + 0x10;
        let hi_wide = lo + 0x1_0000;
        let narrow = common_prefix(lo, hi_narrow);
        let wide = common_prefix(lo, hi_wide);
        assert!(wide.len() <= narrow.len());
    }

    #[test]
    fn common_prefix_full_range_is_empty() {
        assert!(common_prefix(0, u64::MAX).is_empty());
    }

    #[test]
    fn common_prefix_single_point_is_full() {
        let x = 0xABCD_EF01_2345_6789u64;
        assert_eq!(common_prefix(x, x).len(), 64);
    }
}
