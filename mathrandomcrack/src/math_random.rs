//! A stateful simulator of V8's `Math.random()`.

use xs128::{step, step_inverse};

use crate::bounds::{double_to_state, state_to_double};

/// Number of xs128 outputs V8 caches per refill.
pub const CACHE_SIZE: usize = 64;

/// Simulates V8's `Math.random()`: a 128-bit xs128 generator feeding a
/// 64-entry cache that is drained in LIFO order.
///
/// `s0`/`s1` always hold the seed that the *next* [`MathRandom::refill`]
/// will consume — not the seed that produced the currently cached block.
#[derive(Debug, Clone, Copy)]
pub struct MathRandom {
    s0: u64,
    s1: u64,
    cache: [u64; CACHE_SIZE],
    cache_idx: i8,
}

impl PartialEq for MathRandom {
    fn eq(&self, other: &Self) -> bool {
        self.s0 == other.s0
            && self.s1 == other.s1
            && self.cache_idx == other.cache_idx
            && self.cache == other.cache
    }
}
impl Eq for MathRandom {}

impl MathRandom {
    /// Constructs a generator from an explicit xs128 seed, immediately
    /// performing the first cache refill.
    pub fn new(seed0: u64, seed1: u64) -> Self {
        let mut mr = Self {
            s0: seed0,
            s1: seed1,
            cache: [0; CACHE_SIZE],
            cache_idx: -1,
        };
        mr.refill();
        mr
    }

    /// Constructs a generator seeded from the operating system's source of
    /// entropy. Not used by state recovery; useful for generating fixtures
    /// or as a drop-in V8-compatible generator.
    pub fn new_random() -> Self {
        use rand::{rngs::OsRng, RngCore};
        let mut rng = OsRng;
        Self::new(rng.next_u64(), rng.next_u64())
    }

    /// Refills the cache from xs128.
    ///
    /// # Panics
    /// Panics if `cache_idx != -1` (mirrors the precondition on V8's own
    /// cache-refill routine).
    pub fn refill(&mut self) {
        assert_eq!(self.cache_idx, -1, "refill() requires an exhausted cache");
        for slot in self.cache.iter_mut() {
            let (new_s0, new_s1) = step(self.s0, self.s1);
            self.s0 = new_s0;
            self.s1 = new_s1;
            *slot = new_s0;
        }
        self.cache_idx = (CACHE_SIZE - 1) as i8;
    }

    /// Returns the next `Math.random()` output, refilling the cache first
    /// if it is exhausted.
    pub fn next(&mut self) -> f64 {
        if self.cache_idx < 0 {
            self.refill();
        }
        let value = state_to_double(self.cache[self.cache_idx as usize]);
        self.cache_idx -= 1;
        value
    }

    /// Returns the `Math.random()` output that immediately preceded the
    /// last [`MathRandom::next`] call, rewinding one full refill (via the
    /// xs128 inverse) if that output was produced before the current cache
    /// was filled.
    pub fn previous(&mut self) -> f64 {
        self.cache_idx += 1;
        if self.cache_idx > (CACHE_SIZE - 1) as i8 {
            self.rewind_one_refill();
            self.cache_idx = 0;
        }
        state_to_double(self.cache[self.cache_idx as usize])
    }

    /// Recovers the seed of the refill one block before the current one and
    /// regenerates that block's cache in place.
    ///
    /// `self.s0, self.s1` always holds `xs128^64(entry)` for the seed
    /// `entry` that produced the *current* cache. Reversing 128 xs128 steps
    /// (two full cache widths) from there recovers the seed that produced
    /// the *previous* cache; refilling from it regenerates that cache and
    /// leaves `self.s0, self.s1` holding `entry` again, exactly as if the
    /// current refill had not yet happened.
    fn rewind_one_refill(&mut self) {
        let mut s0 = self.s0;
        let mut s1 = self.s1;
        for _ in 0..2 * CACHE_SIZE {
            let (prev_s0, prev_s1) = step_inverse(s0, s1);
            s0 = prev_s0;
            s1 = prev_s1;
        }
        self.s0 = s0;
        self.s1 = s1;
        self.cache_idx = -1;
        self.refill();
    }

    /// Hydrates this generator from a recovered xs128 seed: the state
    /// immediately before the refill that produced the cache containing
    /// the first observed call, plus the cache index that call consumed.
    ///
    /// Mirrors the source's `refill` precondition exactly even though it
    /// appears to conflict with it: `cache_idx` is forced to `-1`, `refill`
    /// is called (satisfying its own precondition), and only then is
    /// `cache_idx` set to the caller's desired value.
    pub fn from_prev_state(&mut self, prev_s0: u64, prev_s1: u64, desired_cache_idx: u8) {
        self.s0 = prev_s0;
        self.s1 = prev_s1;
        self.cache_idx = -1;
        self.refill();
        self.cache_idx = desired_cache_idx as i8;
    }

    /// The cache index of the next value [`MathRandom::next`] will return.
    pub fn cache_idx(&self) -> i8 {
        self.cache_idx
    }
}
