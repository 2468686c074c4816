//! Inequality constraints over multi-indices.

use std::fmt;

/// Scoring function over a multi-index.
///
/// Receives one entry per mode and returns a real score. A multi-index is
/// admissible under a constraint iff `score <= bound`.
pub type ScoreFn = Box<dyn Fn(&[usize]) -> f64 + Send + Sync>;

/// An inequality constraint `f(i_1, ..., i_n) <= bound` on a multi-index.
///
/// Constraints compose conjunctively: a multi-index survives a reduction
/// only if it is admissible under every constraint.
///
/// # Example
/// ```
/// use truncdyn_basis::Constraint;
///
/// // i + j <= 2 over a two-mode tensorisation
/// let c = Constraint::new(2, |idx| (idx[0] + idx[1]) as f64, 2.0);
/// assert!(c.admits(&[1, 1]));
/// assert!(!c.admits(&[2, 1]));
/// ```
pub struct Constraint {
    arity: usize,
    score: ScoreFn,
    bound: f64,
}

impl Constraint {
    /// Create a constraint from a scoring function and an upper bound.
    ///
    /// `arity` declares how many modes the scoring function reads; it is
    /// validated against the tensorisation's mode count when the constraint
    /// is applied.
    pub fn new<F>(arity: usize, score: F, bound: f64) -> Self
    where
        F: Fn(&[usize]) -> f64 + Send + Sync + 'static,
    {
        Self {
            arity,
            score: Box::new(score),
            bound,
        }
    }

    /// Build one constraint per `(scoring function, bound)` pair, in order.
    ///
    /// All pairs share the same arity. This mirrors passing parallel
    /// sequences of functions and bounds.
    pub fn from_pairs<I>(arity: usize, pairs: I) -> Vec<Self>
    where
        I: IntoIterator<Item = (ScoreFn, f64)>,
    {
        pairs
            .into_iter()
            .map(|(score, bound)| Self {
                arity,
                score,
                bound,
            })
            .collect()
    }

    /// Number of modes the scoring function reads
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Upper bound of the inequality
    pub fn bound(&self) -> f64 {
        self.bound
    }

    /// Evaluate the scoring function on a multi-index
    pub fn score(&self, index: &[usize]) -> f64 {
        (self.score)(index)
    }

    /// Whether `index` satisfies `score(index) <= bound`
    pub fn admits(&self, index: &[usize]) -> bool {
        self.score(index) <= self.bound
    }
}

impl fmt::Debug for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constraint")
            .field("arity", &self.arity)
            .field("bound", &self.bound)
            .finish_non_exhaustive()
    }
}
