//! Explicit cancellation handle for in-flight operations.
//!
//! A component that tears down while a retry or async operation is
//! pending cancels the flag; the executors check it before every state
//! mutation and before scheduling a backoff sleep, so late settlement
//! becomes a no-op instead of a silent state update.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cheaply clonable cancellation flag shared between an owner and the
/// executors it hands work to.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag {
    cancelled: Arc<AtomicBool>,
}

impl CancelFlag {
    /// Creates a new, un-cancelled flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the flag cancelled. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// True once [`cancel`](Self::cancel) has been called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
