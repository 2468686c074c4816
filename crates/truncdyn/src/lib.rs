//! Truncated-Hilbert-space quantum dynamics.
//!
//! Facade crate: re-exports the tensorisation reducer (`truncdyn-basis`)
//! and the augmented integration driver (`truncdyn-solve`). The per-crate
//! `Result` aliases are not re-exported; use [`BasisError`] and
//! [`SolveError`] directly.

// Re-export the basis reducer
pub use truncdyn_basis::{
    compact_ranges, complement_indices, contiguous_blocks, expected_gain, BasisError, Block,
    Constraint, MultiIndex, ScoreFn, Tensorisation,
};

// Re-export the integration driver
pub use truncdyn_solve::{
    solve, solve_batched, solve_with_estimator, AccuracyWarning, AdaptiveStep, AdjointStrategy,
    AugmentedState, EngineOutput, EngineStats, FixedStep, Gradient, Infos, IntegrationEngine,
    Method, OdeSystem, SavePlan, Scheme, SolveError, SolveOptions, SolveProblem, SolveResult,
    SolveState, StepController, DEFAULT_MAX_STEPS,
};
