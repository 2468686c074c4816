//! Error types for truncdyn-solve

use crate::method::Scheme;
use thiserror::Error;

/// Result type for solve operations
pub type Result<T> = std::result::Result<T, SolveError>;

/// Errors that can occur while configuring or running a solve.
///
/// All variants are fatal and propagate to the caller unchanged; the
/// accuracy-degradation warning is *not* an error (see
/// [`AccuracyWarning`](crate::AccuracyWarning)).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolveError {
    /// The time grid has no sample times
    #[error("Time grid must contain at least one sample time")]
    EmptyTimeGrid,

    /// The time grid is not strictly increasing
    #[error("Time grid must be strictly increasing at position {position} ({previous} >= {value})")]
    TimeGrid {
        position: usize,
        previous: f64,
        value: f64,
    },

    /// The initial time lies after the first sample time
    #[error("Initial time {t0} must not exceed the first sample time {first}")]
    InitialTimeAfterFirstSample { t0: f64, first: f64 },

    /// Fixed step size must be positive and finite
    #[error("Fixed step size must be positive and finite, got {dt}")]
    InvalidStepSize { dt: f64 },

    /// The estimator threshold is derived from the adaptive controller's
    /// tolerances, which fixed-step schemes do not carry
    #[error("The truncation-error estimator requires an adaptive method, got {scheme:?}")]
    EstimatorNeedsAdaptive { scheme: Scheme },

    /// The engine exhausted its step cap before reaching the final time.
    /// Surfaced unchanged, never retried.
    #[error("Maximum number of steps ({max_steps}) reached before the final time")]
    MaxStepsExceeded { max_steps: usize },

    /// Any other fatal condition reported by the external engine
    #[error("Integration engine failed: {0}")]
    Engine(String),
}
