//! In-memory notification sink for tests and headless consumers.

use std::sync::{Mutex, PoisonError};

use crate::domain::ErrorNotification;
use crate::ports::NotificationSink;

/// Sink that records every notification it receives.
#[derive(Debug, Default)]
pub struct InMemoryNotificationSink {
    notifications: Mutex<Vec<ErrorNotification>>,
}

impl InMemoryNotificationSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every notification received so far, in arrival order.
    pub fn notifications(&self) -> Vec<ErrorNotification> {
        self.notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of notifications received so far.
    pub fn count(&self) -> usize {
        self.notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl NotificationSink for InMemoryNotificationSink {
    fn notify(&self, notification: ErrorNotification) {
        self.notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}
