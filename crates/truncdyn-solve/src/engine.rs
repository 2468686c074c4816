//! Contract with the external integration engine.
//!
//! The actual stepping, local error control, and adjoint machinery live
//! outside this crate. An engine consumes one fully specified
//! [`SolveProblem`] and returns samples, the final capture, and its step
//! statistics. The driver never inspects how the engine advances the
//! state; it only requires the engine to honor the save plan and the step
//! cap.

use crate::error::Result;
use crate::gradient::AdjointStrategy;
use crate::method::{Scheme, StepController};

/// Dynamics terms: the vector field the engine advances.
///
/// For an augmented solve the engine is handed terms over
/// [`AugmentedState`](crate::AugmentedState) that advance the physical
/// state and the error estimate jointly; how error accrues is the
/// collaborator's concern.
pub trait OdeSystem<T> {
    /// Evaluate `dy/dt` at time `t`
    fn vector_field(&self, t: f64, y: &T) -> T;
}

impl<T, F> OdeSystem<T> for F
where
    F: Fn(f64, &T) -> T,
{
    fn vector_field(&self, t: f64, y: &T) -> T {
        self(t, y)
    }
}

/// Save plan for one solve: the state is sampled at each time in `ts`
/// (possibly none), and the final state is *always* captured in addition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SavePlan<'a> {
    /// Strictly increasing sample times
    pub ts: &'a [f64],
}

/// One fully specified forward solve, handed to the engine.
pub struct SolveProblem<'a, T> {
    /// Dynamics terms to advance
    pub terms: &'a dyn OdeSystem<T>,
    /// Which integration primitive to use
    pub scheme: Scheme,
    /// Initial time
    pub t0: f64,
    /// Final time
    pub t1: f64,
    /// Initial step size; `None` lets the engine choose
    pub dt0: Option<f64>,
    /// Initial state, physical or augmented
    pub y0: T,
    /// Sampling schedule
    pub save_plan: SavePlan<'a>,
    /// Step-size controller configuration
    pub controller: StepController,
    /// Adjoint strategy for reverse-mode differentiation
    pub adjoint: AdjointStrategy,
    /// Hard cap on the number of steps
    pub max_steps: usize,
}

/// Step statistics reported by the engine.
///
/// `num_steps` is always present; the accepted/rejected split is required
/// for adaptive schemes and absent for fixed-step schemes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineStats {
    pub num_steps: u64,
    pub num_accepted_steps: Option<u64>,
    pub num_rejected_steps: Option<u64>,
}

/// Output of one engine solve.
#[derive(Debug, Clone)]
pub struct EngineOutput<T> {
    /// One sample per entry of the save plan, in order
    pub samples: Vec<T>,
    /// Unconditional final-state capture
    pub final_state: T,
    /// Step statistics
    pub stats: EngineStats,
}

/// An external integration engine.
///
/// Implementations must fail with
/// [`SolveError::MaxStepsExceeded`](crate::SolveError::MaxStepsExceeded)
/// when the step cap is exhausted before `t1` is reached.
pub trait IntegrationEngine<T> {
    /// Run one forward solve
    fn solve(&self, problem: SolveProblem<'_, T>) -> Result<EngineOutput<T>>;
}
