//! NotificationSink port - Callback for emitting user-facing notifications.
//!
//! The sink is synchronous: the error handler derives the descriptor and
//! hands it off; the consumer decides how (and whether) to render it.

use crate::domain::ErrorNotification;

/// Port for receiving derived error notifications.
pub trait NotificationSink: Send + Sync {
    /// Called once per notification-worthy error.
    fn notify(&self, notification: ErrorNotification);
}

/// Sink that drops every notification, for headless consumers.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpNotificationSink;

impl NotificationSink for NoOpNotificationSink {
    fn notify(&self, _notification: ErrorNotification) {}
}
