//! lazygate: boolean circuits with lazy, short-circuiting gates.
//!
//! This crate holds everything about a circuit that does not involve
//! threads: the tree model, leaf value sources, per-gate decision rules,
//! the cancellation tree shared by evaluators, and a sequential reference
//! evaluator. The concurrent solver lives in `lazygate-solver`.
//!
//! # Example
//!
//! ```
//! use lazygate_core::{evaluate, Circuit, Node};
//!
//! // AND(true, OR(false, true))
//! let circuit = Circuit::new(Node::and(vec![
//!     Node::leaf(true),
//!     Node::or(vec![Node::leaf(false), Node::leaf(true)]),
//! ]));
//!
//! assert_eq!(evaluate(&circuit), Ok(true));
//! ```
//!
//! # Decision rules
//!
//! A [`GateRule`] accepts child results in any order and reports as soon as
//! the output is fixed:
//!
//! ```
//! use lazygate_core::{GateKind, GateRule, Start, Verdict};
//!
//! let Start::Await(mut rule) = GateRule::start(GateKind::And, 3) else {
//!     unreachable!()
//! };
//! assert_eq!(rule.accept(2, true), Verdict::Undecided);
//! assert_eq!(rule.accept(0, false), Verdict::Decided(false));
//! ```

pub mod cancel;
pub mod circuit;
pub mod error;
pub mod eval;
pub mod gate;
pub mod leaf;

pub use cancel::CancelToken;
pub use circuit::{Circuit, Gate, Node};
pub use error::{BuildError, Cancelled, EvalError};
pub use eval::{evaluate, evaluate_with};
pub use gate::{GateKind, GateRule, Start, Verdict};
pub use leaf::{Constant, Delayed, LeafValue};
