//! State types advanced by an integration engine.

use num_complex::Complex64;

/// Vector-space operations an integration engine needs to advance a state,
/// plus the nuclear norm used to derive the estimator threshold.
///
/// Implemented for `Vec<f64>` and `Vec<Complex64>` vector states; matrix
/// representations (density matrices) supply their own implementation with
/// a genuine nuclear norm.
pub trait SolveState: Clone {
    /// A state of the same shape with every component zero
    fn zeros_like(&self) -> Self;

    /// `self += a * x`
    fn axpy(&mut self, a: f64, x: &Self);

    /// `self *= a`
    fn scale(&mut self, a: f64);

    /// Euclidean norm, used by adaptive step-size control
    fn norm(&self) -> f64;

    /// Nuclear norm (trace norm). For vector states this coincides with
    /// the Euclidean norm.
    fn nuclear_norm(&self) -> f64 {
        self.norm()
    }
}

impl SolveState for Vec<f64> {
    fn zeros_like(&self) -> Self {
        vec![0.0; self.len()]
    }

    fn axpy(&mut self, a: f64, x: &Self) {
        for (yi, xi) in self.iter_mut().zip(x) {
            *yi += a * xi;
        }
    }

    fn scale(&mut self, a: f64) {
        for yi in self.iter_mut() {
            *yi *= a;
        }
    }

    fn norm(&self) -> f64 {
        self.iter().map(|y| y * y).sum::<f64>().sqrt()
    }
}

impl SolveState for Vec<Complex64> {
    fn zeros_like(&self) -> Self {
        vec![Complex64::new(0.0, 0.0); self.len()]
    }

    fn axpy(&mut self, a: f64, x: &Self) {
        for (yi, xi) in self.iter_mut().zip(x) {
            *yi += a * xi;
        }
    }

    fn scale(&mut self, a: f64) {
        for yi in self.iter_mut() {
            *yi *= a;
        }
    }

    fn norm(&self) -> f64 {
        self.iter().map(Complex64::norm_sqr).sum::<f64>().sqrt()
    }
}

/// The physical state paired with the co-propagated truncation-error
/// estimate for a single forward integration.
///
/// Owned exclusively by one in-flight solve. The estimator component is
/// initialized to zero by the driver and advanced by the engine identically
/// to a physical component; how error accrues is defined by the dynamics
/// the engine is given.
#[derive(Debug, Clone, PartialEq)]
pub struct AugmentedState<S> {
    /// The physical state at the current time
    pub state: S,
    /// The accumulated truncation-error estimate at the current time
    pub err: f64,
}

impl<S> AugmentedState<S> {
    /// Augment a physical state with a zero error estimate
    pub fn new(state: S) -> Self {
        Self { state, err: 0.0 }
    }

    /// Split into (physical state, error estimate)
    pub fn into_parts(self) -> (S, f64) {
        (self.state, self.err)
    }
}

impl<S: SolveState> SolveState for AugmentedState<S> {
    fn zeros_like(&self) -> Self {
        Self {
            state: self.state.zeros_like(),
            err: 0.0,
        }
    }

    fn axpy(&mut self, a: f64, x: &Self) {
        self.state.axpy(a, &x.state);
        self.err += a * x.err;
    }

    fn scale(&mut self, a: f64) {
        self.state.scale(a);
        self.err *= a;
    }

    fn norm(&self) -> f64 {
        (self.state.norm().powi(2) + self.err * self.err).sqrt()
    }

    fn nuclear_norm(&self) -> f64 {
        // The estimator behaves as one extra diagonal component
        self.state.nuclear_norm() + self.err.abs()
    }
}
