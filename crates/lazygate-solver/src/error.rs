//! Error types for the concurrent solver.

use lazygate_core::Cancelled;
use thiserror::Error;

/// Failure reading a computation's result.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolveError {
    /// Cancelled by short-circuiting, per-computation cancellation, solver
    /// shutdown, or submission after shutdown.
    #[error("computation cancelled")]
    Cancelled,
}

impl From<Cancelled> for SolveError {
    fn from(_: Cancelled) -> Self {
        SolveError::Cancelled
    }
}

/// Failure creating a solver.
#[derive(Debug, Error)]
pub enum SolverError {
    /// A worker thread could not be spawned.
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),
}
