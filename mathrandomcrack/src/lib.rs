//! Recovers the XorShift128 state behind V8's `Math.random()` from a handful
//! of observed outputs, and replays that generator forwards and backwards.
//!
//! ```
//! use mathrandomcrack::{recover_from_doubles, MathRandom};
//!
//! let mut source = MathRandom::new(0x1234_5678_9abc_def0, 0x0fed_cba9_8765_4321);
//! let observed: Vec<f64> = (0..4).map(|_| source.next()).collect();
//!
//! let candidates = recover_from_doubles(&observed, None, Some(10_000)).unwrap();
//! let recovered = candidates.into_iter().find(|c| {
//!     let mut c = *c;
//!     (0..4).map(|_| c.next()).collect::<Vec<_>>() == observed
//! });
//! assert!(recovered.is_some());
//! ```

#![warn(missing_docs, rust_2018_idioms)]

mod bounds;
mod cache;
mod error;
mod gf2;
mod known_bits;
mod math_random;
mod recovery;
mod tracer;

pub use bounds::{common_prefix, double_to_state, state_to_double};
pub use error::{CoreError, RecoveryError};
pub use gf2::{Inconsistent, Solution, SolutionIter, StateEquation};
pub use known_bits::KnownBits;
pub use math_random::MathRandom;
pub use recovery::{
    recover_from_bounds, recover_from_doubles, recover_from_known_bits, recover_from_scaled,
};
