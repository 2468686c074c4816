//! Differentiation strategy selection.
//!
//! The caller picks a [`Gradient`] (or none); the driver resolves it once
//! per solve into the concrete reverse-mode [`AdjointStrategy`] handed to
//! the engine. This is configuration data, not behavior: the engine owns
//! the differentiation machinery.

/// Caller-facing differentiation strategy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gradient {
    /// Checkpointed reverse-mode with an explicit checkpoint count
    Checkpointed { ncheckpoints: usize },
    /// Store-everything reverse-mode
    Direct,
}

/// Concrete adjoint strategy handed to the engine.
///
/// Exactly one strategy is active per solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdjointStrategy {
    /// Full-checkpoint reverse-mode; `None` lets the engine pick the
    /// checkpoint count
    RecursiveCheckpoint { ncheckpoints: Option<usize> },
    /// Store-everything reverse-mode
    Direct,
}

impl AdjointStrategy {
    /// Resolve the caller's selector: no selection means checkpointed
    /// reverse-mode with the engine's default checkpoint count.
    pub fn resolve(gradient: Option<Gradient>) -> Self {
        match gradient {
            None => Self::RecursiveCheckpoint { ncheckpoints: None },
            Some(Gradient::Checkpointed { ncheckpoints }) => Self::RecursiveCheckpoint {
                ncheckpoints: Some(ncheckpoints),
            },
            Some(Gradient::Direct) => Self::Direct,
        }
    }
}
