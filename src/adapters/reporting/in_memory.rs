//! In-memory error reporter for testing and single-process deployments.
//!
//! Records every descriptor it receives and assigns sequential report
//! ids. Not suitable for production multi-server deployments.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::ports::{ErrorReport, ErrorReporter, ReportError, ReportId};

/// Recording reporter backed by an in-memory vector.
#[derive(Debug, Default)]
pub struct InMemoryErrorReporter {
    reports: Mutex<Vec<ErrorReport>>,
    next_id: AtomicU64,
    fail: bool,
}

impl InMemoryErrorReporter {
    /// Creates a reporter that accepts every report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a reporter that fails every report, for exercising the
    /// pipeline's side-effect isolation.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Every report received so far, in arrival order.
    pub async fn reports(&self) -> Vec<ErrorReport> {
        self.reports.lock().await.clone()
    }

    /// Number of reports received so far.
    pub async fn report_count(&self) -> usize {
        self.reports.lock().await.len()
    }
}

#[async_trait]
impl ErrorReporter for InMemoryErrorReporter {
    async fn report(&self, report: ErrorReport) -> Result<ReportId, ReportError> {
        if self.fail {
            return Err(ReportError::transport("simulated reporting outage"));
        }
        self.reports.lock().await.push(report);
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(ReportId::new(format!("report-{n}")))
    }
}
