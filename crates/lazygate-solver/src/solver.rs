//! Submission and shutdown.

use std::sync::Arc;

use lazygate_core::{CancelToken, Circuit};
use parking_lot::RwLock;
use tracing::debug;

use crate::config::SolverConfig;
use crate::error::SolverError;
use crate::handle::ResultHandle;
use crate::message::{result_channel, Reply};
use crate::pool::WorkerPool;
use crate::task::EvalTask;

/// Concurrent circuit evaluator.
///
/// Submissions share the accept flag; shutdown takes it exclusively, so a
/// submission is either admitted before cancellation starts or rejected.
pub struct Solver {
    accepting: RwLock<bool>,
    pool: Arc<WorkerPool>,
    /// Parent of every submission's token.
    root: CancelToken,
}

impl Solver {
    /// Solver with the default, oversubscribed pool.
    pub fn new() -> Result<Self, SolverError> {
        Self::with_config(SolverConfig::default())
    }

    pub fn with_config(config: SolverConfig) -> Result<Self, SolverError> {
        let pool = WorkerPool::new(config.workers.max(1))?;
        Ok(Self {
            accepting: RwLock::new(true),
            pool: Arc::new(pool),
            root: CancelToken::new(),
        })
    }

    /// Number of worker threads.
    pub fn workers(&self) -> usize {
        self.pool.workers()
    }

    /// Schedule evaluation of `circuit` and return immediately.
    ///
    /// After [`shutdown`](Self::shutdown) the returned handle fails with
    /// `SolveError::Cancelled` and no work is scheduled.
    pub fn submit(&self, circuit: &Circuit) -> ResultHandle {
        let accepting = self.accepting.read();
        if !*accepting {
            debug!("submission rejected after shutdown");
            return ResultHandle::rejected();
        }

        let (tx, rx) = result_channel(1);
        let token = self.root.child();
        EvalTask::new(
            Arc::clone(circuit.root()),
            Reply::new(tx, 0),
            token.clone(),
            Arc::clone(&self.pool),
        )
        .schedule();
        debug!("circuit submitted");
        ResultHandle::new(rx, token)
    }

    /// Reject further submissions and cancel everything in flight.
    ///
    /// Idempotent. Returns once no new submission can be admitted; running
    /// tasks wind down in the background.
    pub fn shutdown(&self) {
        if !*self.accepting.read() {
            return;
        }

        let mut accepting = self.accepting.write();
        if !*accepting {
            return;
        }
        *accepting = false;
        self.root.cancel();
        self.pool.shutdown_now();
        debug!("solver shut down");
    }

    /// Whether [`shutdown`](Self::shutdown) has been called.
    pub fn is_shutdown(&self) -> bool {
        !*self.accepting.read()
    }
}

impl Drop for Solver {
    fn drop(&mut self) {
        self.shutdown();
    }
}
