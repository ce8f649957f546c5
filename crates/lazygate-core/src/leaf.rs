//! Leaf value sources.
//!
//! A leaf's value may be produced by a blocking fetch. Fetches receive the
//! evaluating task's [`CancelToken`] and must return `Err(Cancelled)` promptly
//! once it is cancelled.

use std::fmt::Debug;
use std::time::Duration;

use crate::cancel::CancelToken;
use crate::error::Cancelled;

/// Source of a leaf's boolean value.
pub trait LeafValue: Send + Sync + Debug {
    /// Produce the value, blocking if necessary.
    fn fetch(&self, cancel: &CancelToken) -> Result<bool, Cancelled>;
}

/// A value that is available immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Constant(pub bool);

impl LeafValue for Constant {
    fn fetch(&self, _cancel: &CancelToken) -> Result<bool, Cancelled> {
        Ok(self.0)
    }
}

/// A value that becomes available after `delay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delayed {
    pub value: bool,
    pub delay: Duration,
}

impl Delayed {
    pub fn new(value: bool, delay: Duration) -> Self {
        Self { value, delay }
    }
}

impl LeafValue for Delayed {
    fn fetch(&self, cancel: &CancelToken) -> Result<bool, Cancelled> {
        cancel.sleep(self.delay)?;
        Ok(self.value)
    }
}
