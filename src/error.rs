//! Errors produced by the core.
//!
//! Every failure in a run is fatal to that run; there is no local recovery.
//! This mirrors the hand-rolled error enum the teacher uses for runner
//! failures (`RunnerError`) rather than reaching for an error-derive crate.

use std::fmt;

/// All ways a driver, thread generator, or estimator can fail.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A settings field (or a settings/likelihood combination) is invalid.
    InvalidSettings(String),
    /// `logx_start <= logx_end` was passed to the thread generator.
    InvalidInterval {
        /// Starting log prior volume.
        logx_start: f64,
        /// Ending log prior volume.
        logx_end: f64,
    },
    /// A thread generator produced zero retained points.
    EmptyThread,
    /// A lookup of a sample row by log-likelihood matched the wrong number
    /// of rows (the invariant requires exactly one).
    AmbiguousLookup {
        /// The `logl` value used as the lookup key.
        logl: f64,
        /// How many rows matched (0 or >1; 1 is the only valid count).
        matches: usize,
    },
    /// The adaptive reference integrator failed to converge, or the
    /// analytic termination volume the collaborator needs is unavailable.
    NumericalFailure(String),
    /// The requested analytic value has no closed form for this estimator
    /// and problem combination.
    NotApplicable,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::InvalidSettings(msg) => write!(f, "invalid settings: {}", msg),
            Error::InvalidInterval { logx_start, logx_end } => write!(
                f,
                "invalid thread interval: logx_start ({}) must be greater than logx_end ({})",
                logx_start, logx_end
            ),
            Error::EmptyThread => write!(f, "thread generator produced zero retained points"),
            Error::AmbiguousLookup { logl, matches } => write!(
                f,
                "lookup at logl = {} matched {} rows, expected exactly 1",
                logl, matches
            ),
            Error::NumericalFailure(msg) => write!(f, "numerical failure: {}", msg),
            Error::NotApplicable => write!(f, "no analytic value is available for this estimator"),
        }
    }
}

impl std::error::Error for Error {}

/// Result type used throughout the core.
pub type Result<T> = std::result::Result<T, Error>;
