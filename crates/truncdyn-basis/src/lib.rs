//! Tensor-product basis reduction for truncated Hilbert spaces.
//!
//! This crate turns per-mode dimension bounds plus arbitrary inequality
//! constraints into a reduced, contiguous-block index layout over the
//! tensor-product basis.
//!
//! # Overview
//!
//! - [`Tensorisation`]: lexicographic enumeration of the full (or reduced)
//!   Cartesian basis, the canonical linear-index <-> multi-index mapping.
//! - [`Constraint`]: an inequality `f(i_1, ..., i_n) <= bound` over a
//!   multi-index; constraints compose conjunctively.
//! - [`contiguous_blocks`] / [`compact_ranges`] / [`complement_indices`]:
//!   block layout of the surviving linear indices for downstream operator
//!   assembly.
//! - [`expected_gain`]: reduction plus an estimate of the resulting
//!   computational-cost reduction.
//!
//! # Quick Start
//!
//! ```
//! use truncdyn_basis::{compact_ranges, contiguous_blocks, Constraint, Tensorisation};
//!
//! // Two modes truncated at dimension 3, keeping i + j <= 2
//! let full = Tensorisation::full(&[3, 3]).unwrap();
//! let reduced = full
//!     .reduce(&[Constraint::new(2, |idx| (idx[0] + idx[1]) as f64, 2.0)])
//!     .unwrap();
//! assert_eq!(reduced.len(), 6);
//!
//! // Lay the survivors out as dense blocks
//! let blocks = contiguous_blocks(&reduced.retained_indices()).unwrap();
//! let layout = compact_ranges(&blocks);
//! assert_eq!(layout.len(), blocks.len());
//! ```
//!
//! # Determinism
//!
//! All operations are pure and deterministic: the enumeration order is
//! fixed, reductions preserve relative order, and applying the same
//! constraint set twice yields the same result.

mod constraint;
mod error;
mod layout;
mod tensorisation;

pub use constraint::{Constraint, ScoreFn};
pub use error::{BasisError, Result};
pub use layout::{compact_ranges, complement_indices, contiguous_blocks, Block};
pub use tensorisation::{expected_gain, MultiIndex, Tensorisation};
