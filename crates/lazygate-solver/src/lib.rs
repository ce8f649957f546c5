//! Concurrent, short-circuiting evaluation of lazygate circuits.
//!
//! A [`Solver`] owns a worker pool. Each submitted circuit becomes a tree of
//! evaluation tasks, one per node: gate tasks fan out to their arguments and
//! fan results back in through a private channel, deciding as early as the
//! gate allows and cancelling arguments that are no longer needed.
//!
//! # Example
//!
//! ```
//! use lazygate_core::{Circuit, Node};
//! use lazygate_solver::{Solver, SolverConfig};
//!
//! let solver = Solver::with_config(SolverConfig::minimal()).unwrap();
//!
//! // GT(2, [true, true, false]): exactly two trues do not exceed 2.
//! let circuit = Circuit::new(Node::gt(
//!     2,
//!     vec![Node::leaf(true), Node::leaf(true), Node::leaf(false)],
//! ));
//! let handle = solver.submit(&circuit);
//! assert_eq!(handle.read(), Ok(false));
//!
//! solver.shutdown();
//! assert!(solver.submit(&circuit).read().is_err());
//! ```
//!
//! # Cancellation
//!
//! Cancellation is cooperative and flows from parents to children. A task
//! blocked on its children also watches its own cancellation signal, and
//! leaf fetches receive the task's token. Cancel one computation with
//! [`ResultHandle::cancel`], or all of them with [`Solver::shutdown`].
//!
//! The pool is bounded. Gate tasks hold a worker while waiting for their
//! arguments, so a circuit deeper than the worker count can stall; the
//! default configuration oversubscribes the CPUs by [`OVERSUBSCRIPTION`].

pub mod config;
pub mod error;
pub mod handle;
mod message;
mod pool;
pub mod solver;
mod task;

pub use config::{SolverConfig, OVERSUBSCRIPTION};
pub use error::{SolveError, SolverError};
pub use handle::ResultHandle;
pub use solver::Solver;

pub use lazygate_core;
