//! Cooperative, tree-shaped cancellation.
//!
//! Every evaluation task owns a [`CancelToken`]. Tokens form a tree that
//! mirrors the task tree: cancelling a token cancels all of its descendants.
//! Blocking points wait on [`CancelToken::signal`] alongside their real work
//! so that a cancellation request is observed, not merely recorded.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use parking_lot::Mutex;

use crate::error::Cancelled;

/// Registry size below which dead entries are never swept.
const MIN_PRUNE_AT: usize = 16;

/// Weak handles to child tokens.
///
/// Dropped children are swept only when the list reaches `prune_at`, which
/// then doubles relative to the survivors, so registering is amortized O(1).
struct Children {
    tokens: Vec<Weak<Inner>>,
    prune_at: usize,
}

impl Children {
    fn new() -> Self {
        Self {
            tokens: Vec::new(),
            prune_at: MIN_PRUNE_AT,
        }
    }

    fn register(&mut self, child: &Arc<Inner>) {
        if self.tokens.len() >= self.prune_at {
            self.tokens.retain(|weak| weak.strong_count() > 0);
            self.prune_at = MIN_PRUNE_AT.max(2 * self.tokens.len());
        }
        self.tokens.push(Arc::downgrade(child));
    }

    fn take(&mut self) -> Vec<Weak<Inner>> {
        self.prune_at = MIN_PRUNE_AT;
        std::mem::take(&mut self.tokens)
    }
}

struct Inner {
    cancelled: AtomicBool,
    /// Dropped on cancellation, which disconnects `signal`.
    trigger: Mutex<Option<Sender<()>>>,
    signal: Receiver<()>,
    children: Mutex<Children>,
}

impl Inner {
    fn new() -> Self {
        let (trigger, signal) = crossbeam_channel::bounded(0);
        Self {
            cancelled: AtomicBool::new(false),
            trigger: Mutex::new(Some(trigger)),
            signal,
            children: Mutex::new(Children::new()),
        }
    }

    fn cancel(&self) {
        if self.cancelled.swap(true, Ordering::AcqRel) {
            return;
        }
        drop(self.trigger.lock().take());

        let children = self.children.lock().take();
        for child in children.iter().filter_map(Weak::upgrade) {
            child.cancel();
        }
    }
}

/// Handle to one node of the cancellation tree.
///
/// Cloning yields another handle to the same node.
#[derive(Clone)]
pub struct CancelToken {
    inner: Arc<Inner>,
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CancelToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancelToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

impl CancelToken {
    /// Create a new root token.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner::new()),
        }
    }

    /// Create a token that is cancelled together with `self`.
    ///
    /// If `self` is already cancelled the child starts out cancelled.
    pub fn child(&self) -> CancelToken {
        let child = CancelToken::new();
        let mut children = self.inner.children.lock();
        // Checked under the lock: `cancel` sets the flag before draining.
        if self.is_cancelled() {
            drop(children);
            child.cancel();
            return child;
        }
        children.register(&child.inner);
        child
    }

    /// Request cancellation of this token and every descendant. Idempotent.
    pub fn cancel(&self) {
        self.inner.cancel();
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    /// Receiver that becomes ready (disconnected) once the token is cancelled.
    ///
    /// Nothing is ever sent on it; use it as one arm of a `select!`.
    pub fn signal(&self) -> &Receiver<()> {
        &self.inner.signal
    }

    /// Fail fast if cancellation was requested.
    pub fn check(&self) -> Result<(), Cancelled> {
        if self.is_cancelled() {
            Err(Cancelled)
        } else {
            Ok(())
        }
    }

    /// Sleep for `duration`, waking early with `Err(Cancelled)` on cancellation.
    pub fn sleep(&self, duration: Duration) -> Result<(), Cancelled> {
        self.check()?;
        match self.inner.signal.recv_timeout(duration) {
            Err(RecvTimeoutError::Timeout) => Ok(()),
            _ => Err(Cancelled),
        }
    }

    /// Block until cancellation is requested.
    pub fn wait(&self) {
        let _ = self.inner.signal.recv();
    }
}
