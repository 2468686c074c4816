//! Integration policies: scheme choice plus step-size control parameters.
//!
//! Two policy families share one contract (scheme, step-size controller,
//! step cap, diagnostics shape): fixed-step schemes advance with their
//! intrinsic step, adaptive schemes let the engine control the step from
//! local error estimates. The variant set is small and fixed, so [`Method`]
//! is a closed enum with exhaustive handling rather than an open trait.

/// Hard step cap applied when a policy does not override it.
pub const DEFAULT_MAX_STEPS: usize = 100_000;

/// Identifier of the external integration primitive to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    /// Explicit first-order fixed-step scheme
    Euler,
    /// Dormand-Prince 5(4) embedded adaptive scheme
    Dopri5,
    /// Dormand-Prince 8(7) embedded adaptive scheme
    Dopri8,
    /// Tsitouras 5(4) embedded adaptive scheme
    Tsit5,
}

/// Fixed-step policy: constant step size and a hard step cap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedStep {
    /// The scheme's intrinsic step size
    pub dt: f64,
    /// Hard cap on the number of steps. Default: 100_000
    pub max_steps: usize,
}

impl FixedStep {
    /// Create a fixed-step policy with the default step cap.
    pub fn new(dt: f64) -> Self {
        Self {
            dt,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }

    /// Set the step cap.
    #[must_use]
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }
}

/// Adaptive-step policy: PID step-size control parameters and a step cap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdaptiveStep {
    /// Relative tolerance for local error control. Default: 1e-6
    pub rtol: f64,
    /// Absolute tolerance for local error control. Default: 1e-6
    pub atol: f64,
    /// Safety factor applied to the predicted step. Default: 0.9
    pub safety_factor: f64,
    /// Minimum step-size adaptation factor. Default: 0.2
    pub min_factor: f64,
    /// Maximum step-size adaptation factor. Default: 5.0
    pub max_factor: f64,
    /// Hard cap on the number of steps. Default: 100_000
    pub max_steps: usize,
}

impl Default for AdaptiveStep {
    fn default() -> Self {
        Self {
            rtol: 1e-6,
            atol: 1e-6,
            safety_factor: 0.9,
            min_factor: 0.2,
            max_factor: 5.0,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }
}

impl AdaptiveStep {
    /// Create an adaptive policy with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the relative tolerance.
    #[must_use]
    pub fn with_rtol(mut self, rtol: f64) -> Self {
        self.rtol = rtol;
        self
    }

    /// Set the absolute tolerance.
    #[must_use]
    pub fn with_atol(mut self, atol: f64) -> Self {
        self.atol = atol;
        self
    }

    /// Set the safety factor.
    #[must_use]
    pub fn with_safety_factor(mut self, safety_factor: f64) -> Self {
        self.safety_factor = safety_factor;
        self
    }

    /// Set the minimum adaptation factor.
    #[must_use]
    pub fn with_min_factor(mut self, min_factor: f64) -> Self {
        self.min_factor = min_factor;
        self
    }

    /// Set the maximum adaptation factor.
    #[must_use]
    pub fn with_max_factor(mut self, max_factor: f64) -> Self {
        self.max_factor = max_factor;
        self
    }

    /// Set the step cap.
    #[must_use]
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }
}

/// Step-size controller configuration handed to the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepController {
    /// Constant step equal to the scheme's intrinsic step
    Constant { dt: f64 },
    /// PID control from local error estimates
    Pid {
        rtol: f64,
        atol: f64,
        safety_factor: f64,
        min_factor: f64,
        max_factor: f64,
    },
}

/// An integration policy: one concrete scheme with its step-size control.
///
/// Constructed once per solve call and read-only thereafter.
///
/// # Example
/// ```
/// use truncdyn_solve::{AdaptiveStep, FixedStep, Method};
///
/// let fixed = Method::Euler(FixedStep::new(1e-3));
/// assert_eq!(fixed.dt0(), Some(1e-3));
/// assert!(!fixed.is_adaptive());
///
/// let adaptive = Method::Tsit5(AdaptiveStep::new().with_rtol(1e-8));
/// assert_eq!(adaptive.dt0(), None);
/// assert!(adaptive.is_adaptive());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Method {
    Euler(FixedStep),
    Dopri5(AdaptiveStep),
    Dopri8(AdaptiveStep),
    Tsit5(AdaptiveStep),
}

impl Method {
    /// The external integration primitive this policy selects
    pub fn scheme(&self) -> Scheme {
        match self {
            Self::Euler(_) => Scheme::Euler,
            Self::Dopri5(_) => Scheme::Dopri5,
            Self::Dopri8(_) => Scheme::Dopri8,
            Self::Tsit5(_) => Scheme::Tsit5,
        }
    }

    /// Step-size controller configuration for the engine
    pub fn controller(&self) -> StepController {
        match self {
            Self::Euler(fixed) => StepController::Constant { dt: fixed.dt },
            Self::Dopri5(a) | Self::Dopri8(a) | Self::Tsit5(a) => StepController::Pid {
                rtol: a.rtol,
                atol: a.atol,
                safety_factor: a.safety_factor,
                min_factor: a.min_factor,
                max_factor: a.max_factor,
            },
        }
    }

    /// Initial step size: the intrinsic step for fixed-step schemes, `None`
    /// for adaptive schemes (the engine chooses)
    pub fn dt0(&self) -> Option<f64> {
        match self {
            Self::Euler(fixed) => Some(fixed.dt),
            Self::Dopri5(_) | Self::Dopri8(_) | Self::Tsit5(_) => None,
        }
    }

    /// Hard step cap
    pub fn max_steps(&self) -> usize {
        match self {
            Self::Euler(fixed) => fixed.max_steps,
            Self::Dopri5(a) | Self::Dopri8(a) | Self::Tsit5(a) => a.max_steps,
        }
    }

    /// Whether this policy controls the step adaptively
    pub fn is_adaptive(&self) -> bool {
        matches!(self, Self::Dopri5(_) | Self::Dopri8(_) | Self::Tsit5(_))
    }

    /// `(atol, rtol)` of the adaptive controller, `None` for fixed-step
    /// schemes
    pub fn tolerances(&self) -> Option<(f64, f64)> {
        match self {
            Self::Euler(_) => None,
            Self::Dopri5(a) | Self::Dopri8(a) | Self::Tsit5(a) => Some((a.atol, a.rtol)),
        }
    }
}
