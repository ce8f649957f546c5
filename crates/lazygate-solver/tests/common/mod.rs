//! Shared leaves and helpers for solver integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};
use std::time::Duration;

use lazygate_core::{CancelToken, Cancelled, LeafValue, Node};
use lazygate_solver::{Solver, SolverConfig};

/// Upper bound for anything that should happen "promptly".
pub const PROMPTLY: Duration = Duration::from_secs(5);

/// Leaf whose fetch never returns until cancelled.
#[derive(Debug)]
pub struct Blocking;

impl LeafValue for Blocking {
    fn fetch(&self, cancel: &CancelToken) -> Result<bool, Cancelled> {
        cancel.wait();
        Err(Cancelled)
    }
}

/// Leaf that counts how often it is fetched.
#[derive(Debug, Clone)]
pub struct Counting {
    value: bool,
    fetches: Arc<AtomicUsize>,
}

impl Counting {
    pub fn new(value: bool) -> Self {
        Self {
            value,
            fetches: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl LeafValue for Counting {
    fn fetch(&self, _cancel: &CancelToken) -> Result<bool, Cancelled> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.value)
    }
}

pub fn blocking() -> Node {
    Node::from_leaf(Blocking)
}

pub fn leaves(values: &[bool]) -> Vec<Node> {
    values.iter().map(|&v| Node::leaf(v)).collect()
}

pub fn solver() -> Solver {
    init_tracing();
    Solver::with_config(SolverConfig::new(64)).expect("solver should start")
}

fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Blocking leaf that records when its fetch observes cancellation.
#[derive(Debug, Clone, Default)]
pub struct Observed {
    cancellations: Arc<AtomicUsize>,
}

impl Observed {
    pub fn cancellations(&self) -> usize {
        self.cancellations.load(Ordering::SeqCst)
    }
}

impl LeafValue for Observed {
    fn fetch(&self, cancel: &CancelToken) -> Result<bool, Cancelled> {
        cancel.wait();
        self.cancellations.fetch_add(1, Ordering::SeqCst);
        Err(Cancelled)
    }
}

/// Leaf whose fetch fails on its own, without being cancelled.
#[derive(Debug)]
pub struct Failing;

impl LeafValue for Failing {
    fn fetch(&self, _cancel: &CancelToken) -> Result<bool, Cancelled> {
        Err(Cancelled)
    }
}

/// Poll `condition` until it holds or `timeout` elapses.
pub fn eventually(timeout: Duration, condition: impl Fn() -> bool) -> bool {
    let deadline = std::time::Instant::now() + timeout;
    while std::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    condition()
}

/// Read `handle` on another thread, panicking if it takes longer than `timeout`.
pub fn read_within(
    handle: &lazygate_solver::ResultHandle,
    timeout: Duration,
) -> Result<bool, lazygate_solver::SolveError> {
    let (tx, rx) = crossbeam_channel::bounded(1);
    let handle = handle.clone();
    std::thread::spawn(move || {
        let _ = tx.send(handle.read());
    });
    rx.recv_timeout(timeout)
        .expect("read() did not return in time")
}
