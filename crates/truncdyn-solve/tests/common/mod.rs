//! A minimal fixed-step Euler engine standing in for the external
//! integration collaborator. It honors the save plan, the step cap, and
//! the stats contract; it does not do adaptive step control (the `Pid`
//! controller only switches the reported stats shape).

use truncdyn_solve::{
    EngineOutput, EngineStats, IntegrationEngine, Result, SolveError, SolveProblem, SolveState,
    StepController,
};

pub struct EulerEngine;

impl<T: SolveState> IntegrationEngine<T> for EulerEngine {
    fn solve(&self, problem: SolveProblem<'_, T>) -> Result<EngineOutput<T>> {
        let dt = match problem.controller {
            StepController::Constant { dt } => dt,
            // No fixed step configured: pick a uniform subdivision
            StepController::Pid { .. } => problem.dt0.unwrap_or((problem.t1 - problem.t0) / 64.0),
        };
        let nsteps = ((problem.t1 - problem.t0) / dt).round() as u64;
        if nsteps as usize > problem.max_steps {
            return Err(SolveError::MaxStepsExceeded {
                max_steps: problem.max_steps,
            });
        }

        let mut y = problem.y0;
        let mut t = problem.t0;
        let mut samples = Vec::with_capacity(problem.save_plan.ts.len());
        let mut pending = problem.save_plan.ts.iter().copied().peekable();
        while pending.peek().is_some_and(|&ts| ts <= t + 1e-12) {
            samples.push(y.clone());
            pending.next();
        }
        for step in 0..nsteps {
            let dy = problem.terms.vector_field(t, &y);
            y.axpy(dt, &dy);
            t = problem.t0 + dt * (step + 1) as f64;
            while pending.peek().is_some_and(|&ts| ts <= t + 1e-12) {
                samples.push(y.clone());
                pending.next();
            }
        }

        let adaptive = matches!(problem.controller, StepController::Pid { .. });
        Ok(EngineOutput {
            samples,
            final_state: y,
            stats: EngineStats {
                num_steps: nsteps,
                num_accepted_steps: adaptive.then_some(nsteps),
                num_rejected_steps: adaptive.then_some(0),
            },
        })
    }
}
