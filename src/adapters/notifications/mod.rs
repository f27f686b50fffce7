//! Notification adapters - in-process implementations of the
//! `NotificationSink` port.

mod in_memory;

pub use in_memory::InMemoryNotificationSink;
