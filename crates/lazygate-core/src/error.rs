//! Error types for circuit construction and evaluation.

use thiserror::Error;

use crate::gate::GateKind;

/// Errors that can occur during circuit construction.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// Gate was given the wrong number of arguments.
    #[error("{kind} gate expects {expected} argument(s), got {found}")]
    Arity {
        kind: GateKind,
        expected: usize,
        found: usize,
    },
}

/// Marker error for a computation that was cancelled or interrupted.
///
/// A cancelled computation has no value. Callers never observe a default
/// boolean in its place.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash)]
#[error("computation cancelled")]
pub struct Cancelled;

/// Errors that can occur during sequential evaluation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// A leaf fetch was cancelled.
    #[error(transparent)]
    Cancelled(#[from] Cancelled),

    /// Gate has an argument count its kind cannot evaluate.
    #[error("{kind} gate cannot be evaluated with {found} argument(s)")]
    Malformed { kind: GateKind, found: usize },
}
