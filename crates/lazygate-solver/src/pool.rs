//! Fixed-size worker pool.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{Receiver, Sender};
use parking_lot::Mutex;
use tracing::debug;

use crate::error::SolverError;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Worker threads draining one shared job queue.
///
/// `execute` never blocks; jobs beyond the worker count wait in the queue.
pub(crate) struct WorkerPool {
    queue: Mutex<Option<Sender<Job>>>,
    halted: Arc<AtomicBool>,
    workers: usize,
}

impl WorkerPool {
    pub fn new(workers: usize) -> Result<Self, SolverError> {
        let (tx, rx) = crossbeam_channel::unbounded::<Job>();
        let halted = Arc::new(AtomicBool::new(false));

        for i in 0..workers {
            let rx = rx.clone();
            let halted = Arc::clone(&halted);
            thread::Builder::new()
                .name(format!("lazygate-worker-{i}"))
                .spawn(move || work(rx, halted))?;
        }
        debug!(workers, "worker pool started");

        Ok(Self {
            queue: Mutex::new(Some(tx)),
            halted,
            workers,
        })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Queue a job. After shutdown the job is dropped without running.
    pub fn execute<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let queue = self.queue.lock();
        if let Some(tx) = queue.as_ref() {
            // Fails only once every worker has exited.
            let _ = tx.send(Box::new(job));
        }
    }

    /// Stop accepting jobs and discard everything still queued.
    ///
    /// Running jobs are not interrupted; they observe cancellation through
    /// their own tokens.
    pub fn shutdown_now(&self) {
        self.halted.store(true, Ordering::Release);
        if self.queue.lock().take().is_some() {
            debug!("worker pool shut down");
        }
    }
}

fn work(rx: Receiver<Job>, halted: Arc<AtomicBool>) {
    while let Ok(job) = rx.recv() {
        if halted.load(Ordering::Acquire) {
            drop(job);
            continue;
        }
        job();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_runs_jobs() {
        let pool = WorkerPool::new(2).unwrap();
        let (tx, rx) = crossbeam_channel::unbounded();
        for i in 0..10 {
            let tx = tx.clone();
            pool.execute(move || tx.send(i).unwrap());
        }
        let mut got: Vec<i32> = (0..10).map(|_| rx.recv().unwrap()).collect();
        got.sort_unstable();
        assert_eq!(got, (0..10).collect::<Vec<_>>());
        assert_eq!(pool.workers(), 2);
    }

    #[test]
    fn test_jobs_after_shutdown_are_dropped() {
        let pool = WorkerPool::new(1).unwrap();
        pool.shutdown_now();

        let (tx, rx) = crossbeam_channel::unbounded::<()>();
        pool.execute(move || tx.send(()).unwrap());
        // The job and its sender were dropped unrun.
        assert_eq!(
            rx.recv_timeout(Duration::from_secs(5)),
            Err(crossbeam_channel::RecvTimeoutError::Disconnected)
        );
    }

    #[test]
    fn test_queued_jobs_discarded_on_shutdown() {
        let pool = WorkerPool::new(1).unwrap();
        let (gate_tx, gate_rx) = crossbeam_channel::bounded::<()>(0);
        let (tx, rx) = crossbeam_channel::unbounded::<u32>();

        pool.execute(move || {
            let _ = gate_rx.recv();
        });
        let queued = tx.clone();
        pool.execute(move || queued.send(1).unwrap());
        drop(tx);

        pool.shutdown_now();
        drop(gate_tx);
        assert_eq!(
            rx.recv_timeout(Duration::from_secs(5)),
            Err(crossbeam_channel::RecvTimeoutError::Disconnected)
        );
    }
}
