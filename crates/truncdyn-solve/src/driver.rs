//! The augmented integration driver.
//!
//! Executes exactly one forward solve per call and, optionally, one
//! truncation-accuracy check: the initial state is augmented with a
//! zero-initialized error estimate, the engine advances both components
//! jointly, and at completion the final estimate is compared against a
//! threshold derived from the adaptive controller's own tolerances. The
//! comparison never alters the computed result; crossing the threshold
//! produces a single structured warning.

use tracing::warn;

use crate::engine::{EngineStats, IntegrationEngine, OdeSystem, SavePlan, SolveProblem};
use crate::error::{Result, SolveError};
use crate::gradient::{AdjointStrategy, Gradient};
use crate::method::Method;
use crate::state::{AugmentedState, SolveState};

/// Per-call solve options.
///
/// Explicit and immutable; defaults are applied here at the API boundary,
/// there is no process-wide default state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveOptions {
    /// Save the state at every sample time; when false only the final
    /// state is returned. Default: true
    pub save_states: bool,
    /// Initial time. Default: the first sample time
    pub t0: Option<f64>,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            save_states: true,
            t0: None,
        }
    }
}

impl SolveOptions {
    /// Create options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether intermediate states are saved.
    #[must_use]
    pub fn with_save_states(mut self, save_states: bool) -> Self {
        self.save_states = save_states;
        self
    }

    /// Override the initial time.
    #[must_use]
    pub fn with_t0(mut self, t0: f64) -> Self {
        self.t0 = Some(t0);
        self
    }
}

/// Non-fatal accuracy-degradation warning: the estimated truncation error
/// crossed the threshold derived from the solver tolerances.
///
/// Emitted at most once per solve, at completion. The computed result is
/// unaffected; the caller decides whether to re-run with a larger basis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccuracyWarning {
    /// Final value of the co-propagated error estimate
    pub estimate: f64,
    /// Threshold `estimator_rtol * (atol + nuclear_norm(final) * rtol)`
    pub threshold: f64,
    /// The configured estimator relative tolerance
    pub estimator_rtol: f64,
}

/// Scheme-specific step diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Infos {
    /// Fixed-step schemes report the total step count
    Fixed { nsteps: u64 },
    /// Adaptive schemes additionally split accepted and rejected steps
    Adaptive {
        nsteps: u64,
        naccepted: u64,
        nrejected: u64,
    },
}

impl std::fmt::Display for Infos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fixed { nsteps } => write!(f, "{nsteps} steps"),
            Self::Adaptive {
                nsteps,
                naccepted,
                nrejected,
            } => write!(f, "{nsteps} steps ({naccepted} accepted, {nrejected} rejected)"),
        }
    }
}

/// Result of one forward solve. Produced once, immutable afterward.
#[derive(Debug, Clone)]
pub struct SolveResult<S> {
    /// Physical states sampled at the requested times (empty when
    /// `save_states` is false)
    pub states: Vec<S>,
    /// Physical state at the final time
    pub final_state: S,
    /// Scheme-specific step diagnostics
    pub infos: Infos,
    /// Final truncation-error estimate, present when the estimator ran
    pub estimate: Option<f64>,
    /// Accuracy warning, present when the estimate crossed its threshold
    pub warning: Option<AccuracyWarning>,
}

/// Validate the time grid and resolve `(t0, t1)`.
fn resolve_time_span(tsave: &[f64], options: &SolveOptions) -> Result<(f64, f64)> {
    let (&first, &last) = match (tsave.first(), tsave.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(SolveError::EmptyTimeGrid),
    };
    for (position, pair) in tsave.windows(2).enumerate() {
        if pair[1] <= pair[0] {
            return Err(SolveError::TimeGrid {
                position: position + 1,
                previous: pair[0],
                value: pair[1],
            });
        }
    }
    let t0 = options.t0.unwrap_or(first);
    if t0 > first {
        return Err(SolveError::InitialTimeAfterFirstSample { t0, first });
    }
    Ok((t0, last))
}

fn check_method(method: &Method) -> Result<()> {
    if let Some(dt) = method.dt0() {
        if !(dt > 0.0 && dt.is_finite()) {
            return Err(SolveError::InvalidStepSize { dt });
        }
    }
    Ok(())
}

fn build_infos(method: &Method, stats: EngineStats) -> Result<Infos> {
    if method.is_adaptive() {
        match (stats.num_accepted_steps, stats.num_rejected_steps) {
            (Some(naccepted), Some(nrejected)) => Ok(Infos::Adaptive {
                nsteps: stats.num_steps,
                naccepted,
                nrejected,
            }),
            _ => Err(SolveError::Engine(
                "adaptive engine did not report accepted/rejected step counts".into(),
            )),
        }
    } else {
        Ok(Infos::Fixed {
            nsteps: stats.num_steps,
        })
    }
}

fn sample_times<'a>(tsave: &'a [f64], options: &SolveOptions) -> &'a [f64] {
    if options.save_states {
        tsave
    } else {
        &[]
    }
}

/// Run one forward solve on the plain physical state.
///
/// `tsave` is the strictly increasing sample schedule; its last entry is
/// the final time. Fatal conditions (malformed grid, step-cap exhaustion)
/// propagate unchanged.
///
/// # Errors
///
/// [`SolveError::EmptyTimeGrid`] / [`SolveError::TimeGrid`] /
/// [`SolveError::InitialTimeAfterFirstSample`] on a malformed schedule,
/// [`SolveError::InvalidStepSize`] on a non-positive fixed step, and
/// whatever fatal condition the engine reports.
pub fn solve<S, E, D>(
    engine: &E,
    terms: &D,
    y0: S,
    tsave: &[f64],
    method: &Method,
    gradient: Option<Gradient>,
    options: &SolveOptions,
) -> Result<SolveResult<S>>
where
    S: SolveState,
    E: IntegrationEngine<S>,
    D: OdeSystem<S>,
{
    let (t0, t1) = resolve_time_span(tsave, options)?;
    check_method(method)?;

    let output = engine.solve(SolveProblem {
        terms,
        scheme: method.scheme(),
        t0,
        t1,
        dt0: method.dt0(),
        y0,
        save_plan: SavePlan {
            ts: sample_times(tsave, options),
        },
        controller: method.controller(),
        adjoint: AdjointStrategy::resolve(gradient),
        max_steps: method.max_steps(),
    })?;

    Ok(SolveResult {
        states: output.samples,
        final_state: output.final_state,
        infos: build_infos(method, output.stats)?,
        estimate: None,
        warning: None,
    })
}

/// Run one forward solve with the truncation-error estimator
/// co-propagated alongside the physical state.
///
/// The initial state is augmented with a zero error estimate and the
/// engine advances both components jointly according to `terms`. At
/// completion the final estimate is compared against
/// `estimator_rtol * (atol + nuclear_norm(final) * rtol)`, with `atol` and
/// `rtol` taken from the adaptive method's own controller. Crossing the
/// threshold emits one warning and records it in the result; the
/// trajectory itself is identical to an unmonitored solve of the same
/// physical dynamics.
///
/// # Errors
///
/// Everything [`solve`] can fail with, plus
/// [`SolveError::EstimatorNeedsAdaptive`] for fixed-step methods.
pub fn solve_with_estimator<S, E, D>(
    engine: &E,
    terms: &D,
    y0: S,
    tsave: &[f64],
    method: &Method,
    gradient: Option<Gradient>,
    estimator_rtol: f64,
    options: &SolveOptions,
) -> Result<SolveResult<S>>
where
    S: SolveState,
    E: IntegrationEngine<AugmentedState<S>>,
    D: OdeSystem<AugmentedState<S>>,
{
    let (atol, rtol) = method
        .tolerances()
        .ok_or(SolveError::EstimatorNeedsAdaptive {
            scheme: method.scheme(),
        })?;
    let (t0, t1) = resolve_time_span(tsave, options)?;

    let output = engine.solve(SolveProblem {
        terms,
        scheme: method.scheme(),
        t0,
        t1,
        dt0: method.dt0(),
        y0: AugmentedState::new(y0),
        save_plan: SavePlan {
            ts: sample_times(tsave, options),
        },
        controller: method.controller(),
        adjoint: AdjointStrategy::resolve(gradient),
        max_steps: method.max_steps(),
    })?;

    let infos = build_infos(method, output.stats)?;
    // Project the regular samples back to the physical component
    let states: Vec<S> = output.samples.into_iter().map(|y| y.state).collect();
    let (final_state, estimate) = output.final_state.into_parts();

    let threshold = estimator_rtol * (atol + final_state.nuclear_norm() * rtol);
    let warning = if estimate > threshold {
        warn!(
            estimate,
            threshold,
            estimator_rtol,
            "estimated truncation error exceeds tolerance: the results can no \
             longer be guaranteed accurate at this basis truncation, enlarge \
             the truncation"
        );
        Some(AccuracyWarning {
            estimate,
            threshold,
            estimator_rtol,
        })
    } else {
        None
    };

    Ok(SolveResult {
        states,
        final_state,
        infos,
        estimate: Some(estimate),
        warning,
    })
}

/// Run the same policy and time grid independently over a batch of initial
/// states.
///
/// Batch elements share no mutable state and carry independent diagnostics
/// and warnings; they may be computed in any order. The first fatal error
/// aborts the batch.
pub fn solve_batched<S, E, D>(
    engine: &E,
    terms: &D,
    y0s: &[S],
    tsave: &[f64],
    method: &Method,
    gradient: Option<Gradient>,
    options: &SolveOptions,
) -> Result<Vec<SolveResult<S>>>
where
    S: SolveState,
    E: IntegrationEngine<S>,
    D: OdeSystem<S>,
{
    y0s.iter()
        .map(|y0| solve(engine, terms, y0.clone(), tsave, method, gradient, options))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineOutput;
    use crate::method::{AdaptiveStep, FixedStep, Scheme};

    /// Engine stub that replays a canned output and records nothing.
    struct CannedEngine {
        stats: EngineStats,
        final_err: f64,
    }

    impl IntegrationEngine<Vec<f64>> for CannedEngine {
        fn solve(&self, problem: SolveProblem<'_, Vec<f64>>) -> Result<EngineOutput<Vec<f64>>> {
            Ok(EngineOutput {
                samples: vec![problem.y0.clone(); problem.save_plan.ts.len()],
                final_state: problem.y0,
                stats: self.stats,
            })
        }
    }

    impl IntegrationEngine<AugmentedState<Vec<f64>>> for CannedEngine {
        fn solve(
            &self,
            problem: SolveProblem<'_, AugmentedState<Vec<f64>>>,
        ) -> Result<EngineOutput<AugmentedState<Vec<f64>>>> {
            let mut final_state = problem.y0.clone();
            final_state.err = self.final_err;
            Ok(EngineOutput {
                samples: vec![problem.y0; problem.save_plan.ts.len()],
                final_state,
                stats: self.stats,
            })
        }
    }

    fn adaptive_stats() -> EngineStats {
        EngineStats {
            num_steps: 12,
            num_accepted_steps: Some(10),
            num_rejected_steps: Some(2),
        }
    }

    fn noop_terms(_t: f64, y: &Vec<f64>) -> Vec<f64> {
        y.zeros_like()
    }

    fn noop_augmented(_t: f64, y: &AugmentedState<Vec<f64>>) -> AugmentedState<Vec<f64>> {
        y.zeros_like()
    }

    /// Terms provided as a named type rather than a closure.
    struct ZeroField;

    impl crate::engine::OdeSystem<Vec<f64>> for ZeroField {
        fn vector_field(&self, _t: f64, y: &Vec<f64>) -> Vec<f64> {
            y.zeros_like()
        }
    }

    #[test]
    fn test_terms_accept_struct_impls_closures_and_fn_items() {
        let engine = CannedEngine {
            stats: EngineStats::default(),
            final_err: 0.0,
        };
        let method = Method::Euler(FixedStep::new(0.5));
        let options = SolveOptions::default();
        let tsave = [0.0, 1.0];

        solve(&engine, &ZeroField, vec![1.0], &tsave, &method, None, &options).unwrap();
        let closure = |_t: f64, y: &Vec<f64>| y.zeros_like();
        solve(&engine, &closure, vec![1.0], &tsave, &method, None, &options).unwrap();
        solve(&engine, &noop_terms, vec![1.0], &tsave, &method, None, &options).unwrap();
    }

    #[test]
    fn test_rejects_empty_time_grid() {
        let engine = CannedEngine {
            stats: EngineStats::default(),
            final_err: 0.0,
        };
        let result = solve(
            &engine,
            &noop_terms,
            vec![1.0],
            &[],
            &Method::Euler(FixedStep::new(0.1)),
            None,
            &SolveOptions::default(),
        );
        assert_eq!(result.unwrap_err(), SolveError::EmptyTimeGrid);
    }

    #[test]
    fn test_rejects_non_increasing_grid() {
        let engine = CannedEngine {
            stats: EngineStats::default(),
            final_err: 0.0,
        };
        let result = solve(
            &engine,
            &noop_terms,
            vec![1.0],
            &[0.0, 1.0, 1.0],
            &Method::Euler(FixedStep::new(0.1)),
            None,
            &SolveOptions::default(),
        );
        assert_eq!(
            result.unwrap_err(),
            SolveError::TimeGrid {
                position: 2,
                previous: 1.0,
                value: 1.0,
            }
        );
    }

    #[test]
    fn test_rejects_t0_after_first_sample() {
        let engine = CannedEngine {
            stats: EngineStats::default(),
            final_err: 0.0,
        };
        let result = solve(
            &engine,
            &noop_terms,
            vec![1.0],
            &[1.0, 2.0],
            &Method::Euler(FixedStep::new(0.1)),
            None,
            &SolveOptions::new().with_t0(1.5),
        );
        assert_eq!(
            result.unwrap_err(),
            SolveError::InitialTimeAfterFirstSample { t0: 1.5, first: 1.0 }
        );
    }

    #[test]
    fn test_rejects_bad_fixed_step() {
        let engine = CannedEngine {
            stats: EngineStats::default(),
            final_err: 0.0,
        };
        let result = solve(
            &engine,
            &noop_terms,
            vec![1.0],
            &[0.0, 1.0],
            &Method::Euler(FixedStep::new(0.0)),
            None,
            &SolveOptions::default(),
        );
        assert_eq!(result.unwrap_err(), SolveError::InvalidStepSize { dt: 0.0 });
    }

    #[test]
    fn test_estimator_requires_adaptive_method() {
        let engine = CannedEngine {
            stats: EngineStats::default(),
            final_err: 0.0,
        };
        let result = solve_with_estimator(
            &engine,
            &noop_augmented,
            vec![1.0],
            &[0.0, 1.0],
            &Method::Euler(FixedStep::new(0.1)),
            None,
            1e-2,
            &SolveOptions::default(),
        );
        assert_eq!(
            result.unwrap_err(),
            SolveError::EstimatorNeedsAdaptive {
                scheme: Scheme::Euler,
            }
        );
    }

    #[test]
    fn test_save_states_false_keeps_only_final() {
        let engine = CannedEngine {
            stats: EngineStats {
                num_steps: 3,
                ..EngineStats::default()
            },
            final_err: 0.0,
        };
        let result = solve(
            &engine,
            &noop_terms,
            vec![2.0],
            &[0.0, 0.5, 1.0],
            &Method::Euler(FixedStep::new(0.1)),
            None,
            &SolveOptions::new().with_save_states(false),
        )
        .unwrap();
        assert!(result.states.is_empty());
        assert_eq!(result.final_state, vec![2.0]);
        assert_eq!(result.infos, Infos::Fixed { nsteps: 3 });
    }

    #[test]
    fn test_adaptive_engine_must_report_step_split() {
        let engine = CannedEngine {
            stats: EngineStats {
                num_steps: 5,
                num_accepted_steps: None,
                num_rejected_steps: None,
            },
            final_err: 0.0,
        };
        let result = solve(
            &engine,
            &noop_terms,
            vec![1.0],
            &[0.0, 1.0],
            &Method::Tsit5(AdaptiveStep::new()),
            None,
            &SolveOptions::default(),
        );
        assert!(matches!(result, Err(SolveError::Engine(_))));
    }

    #[test]
    fn test_warning_threshold_arithmetic() {
        // final state [3, 4]: nuclear norm 5; threshold = 0.1 * (atol + 5 * rtol)
        let method = Method::Dopri5(AdaptiveStep::new().with_atol(1e-3).with_rtol(1e-2));
        let threshold = 0.1 * (1e-3 + 5.0 * 1e-2);

        let over = CannedEngine {
            stats: adaptive_stats(),
            final_err: threshold * 2.0,
        };
        let result = solve_with_estimator(
            &over,
            &noop_augmented,
            vec![3.0, 4.0],
            &[0.0, 1.0],
            &method,
            None,
            0.1,
            &SolveOptions::default(),
        )
        .unwrap();
        let warning = result.warning.expect("estimate above threshold must warn");
        approx::assert_relative_eq!(warning.threshold, threshold, epsilon = 1e-15);
        approx::assert_relative_eq!(warning.estimate, threshold * 2.0, epsilon = 1e-15);
        assert_eq!(warning.estimator_rtol, 0.1);
        assert_eq!(result.estimate, Some(threshold * 2.0));

        let under = CannedEngine {
            stats: adaptive_stats(),
            final_err: threshold * 0.5,
        };
        let result = solve_with_estimator(
            &under,
            &noop_augmented,
            vec![3.0, 4.0],
            &[0.0, 1.0],
            &method,
            None,
            0.1,
            &SolveOptions::default(),
        )
        .unwrap();
        assert!(result.warning.is_none());
        assert_eq!(result.estimate, Some(threshold * 0.5));
    }

    #[test]
    fn test_infos_display() {
        assert_eq!(Infos::Fixed { nsteps: 100 }.to_string(), "100 steps");
        assert_eq!(
            Infos::Adaptive {
                nsteps: 12,
                naccepted: 10,
                nrejected: 2,
            }
            .to_string(),
            "12 steps (10 accepted, 2 rejected)"
        );
    }

    #[test]
    fn test_batched_results_are_independent() {
        let engine = CannedEngine {
            stats: EngineStats {
                num_steps: 1,
                ..EngineStats::default()
            },
            final_err: 0.0,
        };
        let y0s = vec![vec![1.0], vec![2.0], vec![3.0]];
        let results = solve_batched(
            &engine,
            &noop_terms,
            &y0s,
            &[0.0, 1.0],
            &Method::Euler(FixedStep::new(0.5)),
            None,
            &SolveOptions::default(),
        )
        .unwrap();
        assert_eq!(results.len(), 3);
        for (result, y0) in results.iter().zip(&y0s) {
            assert_eq!(&result.final_state, y0);
        }
    }
}
