//! Reporting adapters - in-process implementations of the
//! `ErrorReporter` port.

mod in_memory;
mod logging;

pub use in_memory::InMemoryErrorReporter;
pub use logging::LoggingErrorReporter;
