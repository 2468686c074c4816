//! Error types for truncdyn-basis

use thiserror::Error;

/// Result type for basis operations
pub type Result<T> = std::result::Result<T, BasisError>;

/// Errors that can occur while building or reducing a tensorisation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BasisError {
    /// At least one mode dimension must be specified
    #[error("At least one mode dimension must be specified")]
    EmptyDims,

    /// Mode dimensions must be positive
    #[error("Dimension for mode {mode} must be at least 1, got 0")]
    InvalidDim { mode: usize },

    /// Constraint arity does not match the number of modes
    #[error("Constraint {constraint} scores {found} modes, but the tensorisation has {expected}")]
    ArityMismatch {
        constraint: usize,
        expected: usize,
        found: usize,
    },

    /// Multi-index has the wrong number of entries
    #[error("Multi-index must have {expected} entries, got {actual}")]
    WrongIndexLength { expected: usize, actual: usize },

    /// Multi-index entry exceeds its mode dimension
    #[error("Entry {value} for mode {mode} out of bounds [0, {dim})")]
    IndexOutOfBounds { mode: usize, value: usize, dim: usize },

    /// Linear index exceeds the declared maximum
    #[error("Linear index {value} exceeds maximum {max}")]
    IndexOutOfRange { value: usize, max: usize },

    /// Linear indices must be sorted strictly increasing
    #[error("Linear indices must be strictly increasing at position {position}")]
    UnsortedIndices { position: usize },
}
