//! Adapters - in-process implementations of the ports.
//!
//! Production deployments typically supply their own reporting client;
//! the adapters here cover tests, development, and deployments that
//! report through the log stream only.

pub mod notifications;
pub mod reporting;

pub use notifications::InMemoryNotificationSink;
pub use reporting::{InMemoryErrorReporter, LoggingErrorReporter};
