//! Result messages passed from a task to its parent.

use crossbeam_channel::{Receiver, Sender};
use lazygate_core::Cancelled;

/// One task's result, tagged with its position among its siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ChildMessage {
    pub index: usize,
    pub outcome: Result<bool, Cancelled>,
}

/// Channel sized so that `capacity` producers never block on send.
pub(crate) fn result_channel(capacity: usize) -> (Sender<ChildMessage>, Receiver<ChildMessage>) {
    crossbeam_channel::bounded(capacity.max(1))
}

/// Single-use sending end bound to one parent channel slot.
///
/// Dropping a `Reply` without sending posts `Cancelled`, so the parent hears
/// back exactly once even from a task that never ran.
#[derive(Debug)]
pub(crate) struct Reply {
    tx: Option<Sender<ChildMessage>>,
    index: usize,
}

impl Reply {
    pub fn new(tx: Sender<ChildMessage>, index: usize) -> Self {
        Self { tx: Some(tx), index }
    }

    pub fn send(mut self, outcome: Result<bool, Cancelled>) {
        self.post(outcome);
    }

    fn post(&mut self, outcome: Result<bool, Cancelled>) {
        if let Some(tx) = self.tx.take() {
            // The parent may already be gone; nobody is left to tell.
            let _ = tx.try_send(ChildMessage {
                index: self.index,
                outcome,
            });
        }
    }
}

impl Drop for Reply {
    fn drop(&mut self) {
        self.post(Err(Cancelled));
    }
}
