//! Reporter that emits descriptors through structured logs.
//!
//! Default wiring for deployments without a reporting backend: the
//! descriptor lands in the log stream with its wire fields, and a
//! locally generated id is returned.

use async_trait::async_trait;

use crate::ports::{ErrorReport, ErrorReporter, ReportError, ReportId};

/// Reporter backed by `tracing` structured logging.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingErrorReporter;

impl LoggingErrorReporter {
    /// Creates a logging reporter.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ErrorReporter for LoggingErrorReporter {
    async fn report(&self, report: ErrorReport) -> Result<ReportId, ReportError> {
        let id = ReportId::generate();
        tracing::error!(
            report_id = %id,
            error_type = %report.error_type,
            severity = %report.severity,
            category = %report.category,
            feature_name = report.feature_name.as_deref().unwrap_or(""),
            operation = report.operation.as_deref().unwrap_or(""),
            "{}",
            report.error_message,
        );
        Ok(id)
    }
}
