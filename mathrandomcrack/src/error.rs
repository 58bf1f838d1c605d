//! Library-wide error types.

/// Errors from the state-recovery core.
///
/// Matches the error kinds in the design: invalid observations are rejected
/// at the extractor boundary; inconsistent systems for a single `cache_idx`
/// guess are not errors at all (the driver just tries the next guess), so
/// they never surface here.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CoreError {
    /// A `doubles`-mode observation was outside `[0.0, 1.0]`.
    #[error("double observation {0} is outside [0.0, 1.0]")]
    DoubleOutOfRange(String),
    /// A `scaled`-mode factor was smaller than 2.
    #[error("scaled factor must be >= 2, got {0}")]
    FactorTooSmall(i64),
    /// A `bounds`-mode observation had `lo > hi`, or either bound outside
    /// `[0.0, 1.0]`.
    #[error("invalid bounds [{lo}, {hi}]")]
    InvalidBounds {
        /// Lower bound as given.
        lo: f64,
        /// Upper bound as given.
        hi: f64,
    },
}

/// Errors from the recovery driver.
#[derive(Debug, thiserror::Error)]
pub enum RecoveryError {
    /// An observation failed validation before any solving was attempted.
    #[error("invalid observation: {0}")]
    InvalidObservation(#[from] CoreError),
}
