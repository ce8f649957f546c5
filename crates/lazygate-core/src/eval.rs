//! Sequential reference evaluator.

use crate::cancel::CancelToken;
use crate::circuit::{Circuit, Node};
use crate::error::EvalError;

/// Evaluate a circuit on the calling thread.
///
/// Every argument of every gate is evaluated, left to right, with no short
/// circuiting. Useful as a baseline for the concurrent solver.
///
/// # Errors
///
/// Returns [`EvalError::Cancelled`] if a leaf fetch is cancelled, and
/// [`EvalError::Malformed`] if a gate's argument count does not fit its kind.
pub fn evaluate(circuit: &Circuit) -> Result<bool, EvalError> {
    evaluate_with(circuit, &CancelToken::new())
}

/// Like [`evaluate`], passing `cancel` to every leaf fetch.
pub fn evaluate_with(circuit: &Circuit, cancel: &CancelToken) -> Result<bool, EvalError> {
    evaluate_node(circuit.root(), cancel)
}

fn evaluate_node(node: &Node, cancel: &CancelToken) -> Result<bool, EvalError> {
    match node {
        Node::Leaf(leaf) => Ok(leaf.fetch(cancel)?),
        Node::Gate(gate) => {
            let values = gate
                .args()
                .iter()
                .map(|arg| evaluate_node(arg, cancel))
                .collect::<Result<Vec<_>, _>>()?;
            gate.kind().apply(&values).ok_or(EvalError::Malformed {
                kind: gate.kind(),
                found: values.len(),
            })
        }
    }
}
