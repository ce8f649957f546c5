//! Caller-facing handle to one submitted computation.

use std::fmt;
use std::sync::Arc;

use crossbeam_channel::{select, Receiver};
use lazygate_core::CancelToken;
use parking_lot::Mutex;

use crate::error::SolveError;
use crate::message::{result_channel, ChildMessage};

struct Inner {
    rx: Receiver<ChildMessage>,
    token: CancelToken,
    /// Cached outcome. Held for the duration of the single receive.
    slot: Mutex<Option<Result<bool, SolveError>>>,
}

/// Result of a circuit submitted to a [`Solver`](crate::Solver).
///
/// Clones share the same underlying computation and cached result.
#[derive(Clone)]
pub struct ResultHandle {
    inner: Arc<Inner>,
}

impl fmt::Debug for ResultHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultHandle")
            .field("resolved", &self.is_resolved())
            .finish()
    }
}

fn decode(message: Option<ChildMessage>) -> Result<bool, SolveError> {
    match message {
        Some(ChildMessage { outcome: Ok(value), .. }) => Ok(value),
        _ => Err(SolveError::Cancelled),
    }
}

impl ResultHandle {
    pub(crate) fn new(rx: Receiver<ChildMessage>, token: CancelToken) -> Self {
        Self {
            inner: Arc::new(Inner {
                rx,
                token,
                slot: Mutex::new(None),
            }),
        }
    }

    /// Handle for a submission that was refused; reads fail immediately.
    pub(crate) fn rejected() -> Self {
        let (_, rx) = result_channel(1);
        let token = CancelToken::new();
        token.cancel();
        Self {
            inner: Arc::new(Inner {
                rx,
                token,
                slot: Mutex::new(Some(Err(SolveError::Cancelled))),
            }),
        }
    }

    /// Block until the computation resolves.
    ///
    /// Exactly one caller performs the receive; concurrent callers wait for
    /// it and then observe the same cached outcome.
    ///
    /// # Errors
    ///
    /// Returns `SolveError::Cancelled` if the computation was cancelled
    /// through [`cancel`](Self::cancel) or solver shutdown. The failure is
    /// cached like a value.
    pub fn read(&self) -> Result<bool, SolveError> {
        let mut slot = self.inner.slot.lock();
        if let Some(result) = *slot {
            return result;
        }

        let rx = &self.inner.rx;
        let result = match rx.try_recv() {
            Ok(message) => decode(Some(message)),
            Err(_) => select! {
                recv(rx) -> message => decode(message.ok()),
                recv(self.inner.token.signal()) -> _ => decode(rx.try_recv().ok()),
            },
        };
        *slot = Some(result);
        result
    }

    /// Outcome if already available, without blocking.
    ///
    /// Returns `None` while the computation is pending or another caller is
    /// inside [`read`](Self::read).
    pub fn try_read(&self) -> Option<Result<bool, SolveError>> {
        let mut slot = self.inner.slot.try_lock()?;
        if slot.is_none() {
            if let Ok(message) = self.inner.rx.try_recv() {
                *slot = Some(decode(Some(message)));
            }
        }
        *slot
    }

    /// Whether an outcome is cached or waiting to be received.
    ///
    /// While another caller is inside [`read`](Self::read) only the channel
    /// is inspected. For the instant between that reader taking the message
    /// and caching it, this may still report `false`.
    pub fn is_resolved(&self) -> bool {
        match self.inner.slot.try_lock() {
            Some(slot) => slot.is_some() || !self.inner.rx.is_empty(),
            None => !self.inner.rx.is_empty(),
        }
    }

    /// Cancel this computation. Has no effect once it has resolved.
    pub fn cancel(&self) {
        self.inner.token.cancel();
    }
}
