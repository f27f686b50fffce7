//! Ports - Interfaces for external collaborators.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the failure pipeline and the outside world. Adapters implement them.
//!
//! - `ErrorReporter` - outbound error reporting client (the only
//!   network-facing contract the crate owns)
//! - `NotificationSink` - user-facing notification surface

mod error_reporter;
mod notification_sink;

pub use error_reporter::{ErrorReport, ErrorReporter, NoOpErrorReporter, ReportError, ReportId};
pub use notification_sink::{NoOpNotificationSink, NotificationSink};
