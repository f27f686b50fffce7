//! User-facing notification descriptors derived from normalized errors.
//!
//! The crate never renders anything; it only derives a transient
//! descriptor that a notification surface (toast stack, banner, ...)
//! knows how to display.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::{ErrorKind, Severity, StandardError};

/// Auto-dismiss duration for non-persistent notifications.
pub const DEFAULT_NOTIFICATION_DURATION: Duration = Duration::from_secs(5);

/// Unique identifier for a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(Uuid);

impl NotificationId {
    /// Creates a new random NotificationId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for NotificationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Visual treatment of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Error,
    Warning,
    Info,
}

/// Affordance offered on a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationAction {
    /// Re-attempt the failed operation.
    Retry,
    /// Dismiss the notification.
    Dismiss,
}

/// Transient, user-facing notification descriptor.
///
/// `duration = None` means the notification is persistent and must be
/// dismissed explicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorNotification {
    pub id: NotificationId,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub duration: Option<Duration>,
    pub dismissible: bool,
    pub actions: Vec<NotificationAction>,
}

impl ErrorNotification {
    /// Derives a notification from a normalized error.
    ///
    /// High and critical severities produce persistent notifications;
    /// everything else auto-dismisses after
    /// [`DEFAULT_NOTIFICATION_DURATION`]. Retryable errors carry a
    /// `Retry` action.
    pub fn from_error(error: &StandardError) -> Self {
        let duration = match error.severity {
            Severity::High | Severity::Critical => None,
            Severity::Low | Severity::Medium => Some(DEFAULT_NOTIFICATION_DURATION),
        };
        let kind = match error.severity {
            Severity::Low => NotificationKind::Warning,
            _ => NotificationKind::Error,
        };
        let mut actions = Vec::new();
        if error.retryable {
            actions.push(NotificationAction::Retry);
        }
        actions.push(NotificationAction::Dismiss);

        Self {
            id: NotificationId::new(),
            title: title_for(error.kind).to_string(),
            message: error.user_message.clone(),
            kind,
            duration,
            dismissible: true,
            actions,
        }
    }

    /// True when the notification never auto-dismisses.
    pub fn is_persistent(&self) -> bool {
        self.duration.is_none()
    }

    /// True when the notification offers a retry affordance.
    pub fn offers_retry(&self) -> bool {
        self.actions.contains(&NotificationAction::Retry)
    }
}

fn title_for(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::Component => "Something went wrong",
        ErrorKind::AsyncOperation => "Request failed",
        ErrorKind::Validation => "Check your input",
        ErrorKind::Unauthorized => "Sign in required",
        ErrorKind::RateLimitExceeded => "Too many requests",
        ErrorKind::Unknown => "Unexpected error",
    }
}
