//! Tensorisations: ordered enumerations of a tensor-product basis.

use crate::constraint::Constraint;
use crate::error::{BasisError, Result};

/// One basis element of the tensor-product space: one entry per mode.
pub type MultiIndex = Vec<usize>;

/// An ordered enumeration of (a subset of) a tensor-product basis.
///
/// A full tensorisation enumerates the Cartesian product
/// `range(dims[0]) x ... x range(dims[n-1])` in lexicographic order; this
/// order is stable and serves as the canonical mapping between a linear
/// index and a multi-index. A reduced tensorisation keeps the original
/// `dims` and a subsequence of the full enumeration.
///
/// # Example
/// ```
/// use truncdyn_basis::{Constraint, Tensorisation};
///
/// let full = Tensorisation::full(&[3, 3]).unwrap();
/// assert_eq!(full.len(), 9);
///
/// let reduced = full
///     .reduce(&[Constraint::new(2, |idx| (idx[0] + idx[1]) as f64, 2.0)])
///     .unwrap();
/// assert_eq!(reduced.len(), 6);
/// assert_eq!(reduced.elements()[0], vec![0, 0]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tensorisation {
    /// Per-mode dimension bounds, declared once per simulation
    dims: Vec<usize>,
    /// Retained multi-indices, in full-enumeration order
    elements: Vec<MultiIndex>,
}

impl Tensorisation {
    /// Enumerate the full Cartesian product of `dims` in lexicographic order.
    ///
    /// # Cost
    ///
    /// Time and space are O(prod(dims) * ndims): the enumeration is
    /// materialized. Large mode counts or dimensions must be bounded by the
    /// caller.
    ///
    /// # Errors
    ///
    /// [`BasisError::EmptyDims`] if `dims` is empty,
    /// [`BasisError::InvalidDim`] if any dimension is zero.
    pub fn full(dims: &[usize]) -> Result<Self> {
        if dims.is_empty() {
            return Err(BasisError::EmptyDims);
        }
        if let Some(mode) = dims.iter().position(|&d| d == 0) {
            return Err(BasisError::InvalidDim { mode });
        }

        let total: usize = dims.iter().product();
        let mut elements = Vec::with_capacity(total);
        let mut current = vec![0usize; dims.len()];
        loop {
            elements.push(current.clone());
            // Odometer increment, least-significant mode last
            let mut mode = dims.len();
            loop {
                if mode == 0 {
                    return Ok(Self {
                        dims: dims.to_vec(),
                        elements,
                    });
                }
                mode -= 1;
                current[mode] += 1;
                if current[mode] < dims[mode] {
                    break;
                }
                current[mode] = 0;
            }
        }
    }

    /// Number of modes
    pub fn nmodes(&self) -> usize {
        self.dims.len()
    }

    /// Per-mode dimension bounds
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Retained multi-indices, in enumeration order
    pub fn elements(&self) -> &[MultiIndex] {
        &self.elements
    }

    /// Number of retained basis elements
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns true if no basis element is retained
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Size of the full enumeration over `dims`
    pub fn full_len(&self) -> usize {
        self.dims.iter().product()
    }

    /// Linear index of a multi-index in the full lexicographic enumeration.
    ///
    /// # Errors
    ///
    /// [`BasisError::WrongIndexLength`] or [`BasisError::IndexOutOfBounds`]
    /// if `index` does not address a valid basis element.
    pub fn linear_index(&self, index: &[usize]) -> Result<usize> {
        if index.len() != self.dims.len() {
            return Err(BasisError::WrongIndexLength {
                expected: self.dims.len(),
                actual: index.len(),
            });
        }
        let mut linear = 0usize;
        for (mode, (&value, &dim)) in index.iter().zip(&self.dims).enumerate() {
            if value >= dim {
                return Err(BasisError::IndexOutOfBounds { mode, value, dim });
            }
            linear = linear * dim + value;
        }
        Ok(linear)
    }

    /// Sorted linear indices (into the full enumeration) of the retained
    /// elements.
    pub fn retained_indices(&self) -> Vec<usize> {
        // Elements are valid by construction, so the mixed-radix fold
        // cannot go out of bounds.
        self.elements
            .iter()
            .map(|index| {
                index
                    .iter()
                    .zip(&self.dims)
                    .fold(0usize, |acc, (&value, &dim)| acc * dim + value)
            })
            .collect()
    }

    /// Apply a set of inequality constraints, keeping only admissible
    /// multi-indices.
    ///
    /// The relative order of the surviving elements is preserved, so
    /// reduction is deterministic and idempotent. An empty constraint set
    /// is the identity.
    ///
    /// # Errors
    ///
    /// [`BasisError::ArityMismatch`] if any constraint's declared arity
    /// differs from the number of modes. Checked before any element is
    /// scored.
    pub fn reduce(&self, constraints: &[Constraint]) -> Result<Self> {
        for (i, constraint) in constraints.iter().enumerate() {
            if constraint.arity() != self.dims.len() {
                return Err(BasisError::ArityMismatch {
                    constraint: i,
                    expected: self.dims.len(),
                    found: constraint.arity(),
                });
            }
        }
        let elements = self
            .elements
            .iter()
            .filter(|index| constraints.iter().all(|c| c.admits(index)))
            .cloned()
            .collect();
        Ok(Self {
            dims: self.dims.clone(),
            elements,
        })
    }
}

/// Reduce the full tensorisation over `dims` and estimate the resulting
/// computational-cost reduction.
///
/// Builds one constraint per `(scoring function, bound)` pair, reduces, and
/// reports `gain = 100 * (|reduced| / |full|)^3`. The cubic exponent models
/// dense matrix-multiplication cost, O(n^3) in the basis size: `gain`
/// estimates the percentage of the baseline compute time expected after
/// truncation. It is an estimate, not a guarantee; the only cost driver it
/// accounts for is basis size.
///
/// # Example
/// ```
/// use truncdyn_basis::{expected_gain, ScoreFn};
///
/// let pairs: Vec<(ScoreFn, f64)> =
///     vec![(Box::new(|idx: &[usize]| (idx[0] + idx[1]) as f64), 2.0)];
/// let (reduced, gain) = expected_gain(pairs, &[3, 3]).unwrap();
/// assert_eq!(reduced.len(), 6);
/// assert!((gain - 100.0 * (6.0f64 / 9.0).powi(3)).abs() < 1e-12);
/// ```
pub fn expected_gain<I>(pairs: I, dims: &[usize]) -> Result<(Tensorisation, f64)>
where
    I: IntoIterator<Item = (crate::constraint::ScoreFn, f64)>,
{
    let full = Tensorisation::full(dims)?;
    let constraints = Constraint::from_pairs(dims.len(), pairs);
    let reduced = full.reduce(&constraints)?;
    let ratio = reduced.len() as f64 / full.len() as f64;
    let gain = 100.0 * ratio.powi(3);
    Ok((reduced, gain))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sum_constraint(bound: f64) -> Constraint {
        Constraint::new(2, |idx| (idx[0] + idx[1]) as f64, bound)
    }

    #[test]
    fn test_full_lexicographic_order() {
        let t = Tensorisation::full(&[2, 3]).unwrap();
        assert_eq!(
            t.elements(),
            &[
                vec![0, 0],
                vec![0, 1],
                vec![0, 2],
                vec![1, 0],
                vec![1, 1],
                vec![1, 2],
            ]
        );
    }

    #[test]
    fn test_full_rejects_bad_dims() {
        assert_eq!(Tensorisation::full(&[]), Err(BasisError::EmptyDims));
        assert_eq!(
            Tensorisation::full(&[2, 0]),
            Err(BasisError::InvalidDim { mode: 1 })
        );
    }

    #[test]
    fn test_reduce_scenario() {
        // fullDims = (3, 3); constraint i + j <= 2 keeps 6 of 9 elements
        let full = Tensorisation::full(&[3, 3]).unwrap();
        let reduced = full.reduce(&[sum_constraint(2.0)]).unwrap();
        assert_eq!(
            reduced.elements(),
            &[
                vec![0, 0],
                vec![0, 1],
                vec![0, 2],
                vec![1, 0],
                vec![1, 1],
                vec![2, 0],
            ]
        );
        assert_eq!(reduced.dims(), &[3, 3]);
    }

    #[test]
    fn test_reduce_empty_constraints_is_identity() {
        let full = Tensorisation::full(&[4, 2]).unwrap();
        let reduced = full.reduce(&[]).unwrap();
        assert_eq!(reduced, full);
    }

    #[test]
    fn test_reduce_arity_mismatch() {
        let full = Tensorisation::full(&[3, 3]).unwrap();
        let bad = Constraint::new(3, |idx| idx[0] as f64, 1.0);
        assert_eq!(
            full.reduce(&[bad]),
            Err(BasisError::ArityMismatch {
                constraint: 0,
                expected: 2,
                found: 3,
            })
        );
    }

    #[test]
    fn test_linear_index_roundtrip() {
        let t = Tensorisation::full(&[3, 4, 2]).unwrap();
        for (linear, index) in t.elements().iter().enumerate() {
            assert_eq!(t.linear_index(index).unwrap(), linear);
        }
    }

    #[test]
    fn test_linear_index_validation() {
        let t = Tensorisation::full(&[3, 3]).unwrap();
        assert_eq!(
            t.linear_index(&[1]),
            Err(BasisError::WrongIndexLength {
                expected: 2,
                actual: 1,
            })
        );
        assert_eq!(
            t.linear_index(&[1, 3]),
            Err(BasisError::IndexOutOfBounds {
                mode: 1,
                value: 3,
                dim: 3,
            })
        );
    }

    #[test]
    fn test_retained_indices_of_reduced() {
        let full = Tensorisation::full(&[3, 3]).unwrap();
        let reduced = full.reduce(&[sum_constraint(2.0)]).unwrap();
        // (0,0) (0,1) (0,2) (1,0) (1,1) (2,0) in a 3x3 enumeration
        assert_eq!(reduced.retained_indices(), vec![0, 1, 2, 3, 4, 6]);
    }

    #[test]
    fn test_expected_gain_scenario() {
        let pairs: Vec<(crate::constraint::ScoreFn, f64)> =
            vec![(Box::new(|idx: &[usize]| (idx[0] + idx[1]) as f64), 2.0)];
        let (reduced, gain) = expected_gain(pairs, &[3, 3]).unwrap();
        assert_eq!(reduced.len(), 6);
        // 100 * (6/9)^3 ~= 29.6%
        approx::assert_relative_eq!(gain, 100.0 * (6.0f64 / 9.0).powi(3), epsilon = 1e-12);
    }

    #[test]
    fn test_expected_gain_identity_is_100() {
        let (reduced, gain) = expected_gain(Vec::new(), &[2, 2]).unwrap();
        assert_eq!(reduced.len(), 4);
        assert_eq!(gain, 100.0);
    }
}
