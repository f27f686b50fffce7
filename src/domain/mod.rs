//! Domain layer - pure types and rules of the failure pipeline.
//!
//! No I/O lives here. The domain owns the canonical error record, the
//! normalization rules that produce it, and the notification descriptor
//! derived from it.

mod error;
mod normalize;
mod notification;

pub use error::{ErrorContext, ErrorId, ErrorKind, Severity, StandardError, Timestamp};
pub use normalize::{normalize, Failure};
pub use notification::{
    ErrorNotification, NotificationAction, NotificationId, NotificationKind,
    DEFAULT_NOTIFICATION_DURATION,
};
