//! Augmented integration driver for truncated quantum dynamics.
//!
//! This crate orchestrates single forward solves of time-dependent
//! quantum-system equations over a truncated basis, with an optional
//! scalar truncation-error estimator co-propagated alongside the physical
//! state. The numerical stepping itself is supplied by an external
//! [`IntegrationEngine`]; this crate owns the policy layer around it:
//!
//! - [`Method`]: fixed-step and adaptive integration policies (scheme,
//!   step-size controller, step cap, diagnostics shape).
//! - [`Gradient`] / [`AdjointStrategy`]: differentiation strategy
//!   selection, resolved once per solve.
//! - [`solve`] / [`solve_with_estimator`] / [`solve_batched`]: the driver
//!   entry points.
//! - [`AccuracyWarning`]: the non-fatal runtime accuracy check. When the
//!   final error estimate exceeds
//!   `estimator_rtol * (atol + nuclear_norm(final) * rtol)` the driver
//!   emits one `tracing` warning and records the raw values in the result.
//!
//! # Quick Start
//!
//! ```
//! use truncdyn_solve::{
//!     EngineOutput, EngineStats, FixedStep, IntegrationEngine, Method, Result, SolveOptions,
//!     SolveProblem, solve,
//! };
//!
//! // A trivial engine that never advances the state (real engines live
//! // outside this crate).
//! struct FrozenEngine;
//!
//! impl IntegrationEngine<Vec<f64>> for FrozenEngine {
//!     fn solve(&self, problem: SolveProblem<'_, Vec<f64>>) -> Result<EngineOutput<Vec<f64>>> {
//!         Ok(EngineOutput {
//!             samples: vec![problem.y0.clone(); problem.save_plan.ts.len()],
//!             final_state: problem.y0,
//!             stats: EngineStats { num_steps: 10, ..Default::default() },
//!         })
//!     }
//! }
//!
//! let terms = |_t: f64, y: &Vec<f64>| vec![0.0; y.len()];
//! let result = solve(
//!     &FrozenEngine,
//!     &terms,
//!     vec![1.0, 0.0],
//!     &[0.0, 0.5, 1.0],
//!     &Method::Euler(FixedStep::new(0.1)),
//!     None,
//!     &SolveOptions::default(),
//! )
//! .unwrap();
//! assert_eq!(result.states.len(), 3);
//! assert_eq!(result.infos.to_string(), "10 steps");
//! ```
//!
//! # Concurrency
//!
//! Each solve is one synchronous unit of work with no internal
//! concurrency. Batched solves are plain data parallelism over independent
//! states; see [`solve_batched`].

mod driver;
mod engine;
mod error;
mod gradient;
mod method;
mod state;

pub use driver::{
    solve, solve_batched, solve_with_estimator, AccuracyWarning, Infos, SolveOptions, SolveResult,
};
pub use engine::{EngineOutput, EngineStats, IntegrationEngine, OdeSystem, SavePlan, SolveProblem};
pub use error::{Result, SolveError};
pub use gradient::{AdjointStrategy, Gradient};
pub use method::{AdaptiveStep, FixedStep, Method, Scheme, StepController, DEFAULT_MAX_STEPS};
pub use state::{AugmentedState, SolveState};
