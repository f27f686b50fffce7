//! ErrorHandler - Per-consumer failure pipeline.
//!
//! One handler is constructed per consuming component. Every failure the
//! component sees goes through [`ErrorHandler::handle_error`], which
//! normalizes it, counts it, invokes the consumer callback, and emits
//! notification and report side effects as configured.
//!
//! The handler never panics and never propagates its own side-effect
//! failures: a broken callback, sink, or reporter cannot break the
//! component that owns the handler.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::domain::{normalize, ErrorContext, ErrorNotification, Failure, StandardError};
use crate::ports::{
    ErrorReport, ErrorReporter, NoOpErrorReporter, NoOpNotificationSink, NotificationSink,
};

/// Consumer callback invoked synchronously for every handled error.
pub type ErrorCallback = Box<dyn Fn(&StandardError) + Send + Sync>;

/// Options controlling a handler's side effects.
#[derive(Debug, Clone, Default)]
pub struct ErrorHandlerOptions {
    /// Emit a derived notification for every handled error.
    pub enable_notifications: bool,
    /// Forward a report descriptor for every handled error.
    pub enable_reporting: bool,
    /// Component name stamped onto every error's context.
    pub context: Option<String>,
    /// Feature name stamped onto every error's context.
    pub feature: Option<String>,
}

impl ErrorHandlerOptions {
    /// Options with notifications and reporting enabled.
    pub fn all_enabled(context: impl Into<String>) -> Self {
        Self {
            enable_notifications: true,
            enable_reporting: true,
            context: Some(context.into()),
            feature: None,
        }
    }
}

/// Per-consumer error handling unit.
pub struct ErrorHandler {
    options: ErrorHandlerOptions,
    error_count: AtomicU64,
    reporter: Arc<dyn ErrorReporter>,
    notifications: Arc<dyn NotificationSink>,
    on_error: Option<ErrorCallback>,
}

impl ErrorHandler {
    /// Creates a handler with no-op reporter and notification sink.
    pub fn new(options: ErrorHandlerOptions) -> Self {
        Self {
            options,
            error_count: AtomicU64::new(0),
            reporter: Arc::new(NoOpErrorReporter),
            notifications: Arc::new(NoOpNotificationSink),
            on_error: None,
        }
    }

    /// Sets the reporting client.
    pub fn with_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Sets the notification sink.
    pub fn with_notification_sink(mut self, sink: Arc<dyn NotificationSink>) -> Self {
        self.notifications = sink;
        self
    }

    /// Sets the consumer callback invoked for every handled error.
    pub fn with_on_error(mut self, callback: impl Fn(&StandardError) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Box::new(callback));
        self
    }

    /// Normalizes a failure and runs the full side-effect pipeline.
    ///
    /// Returns the normalized error unconditionally: a failing callback,
    /// sink, or reporter is logged and swallowed.
    pub async fn handle_error(
        &self,
        failure: impl Into<Failure>,
        operation: Option<&str>,
    ) -> StandardError {
        let error = normalize(failure.into(), self.context_for(operation));
        self.error_count.fetch_add(1, Ordering::SeqCst);

        tracing::error!(
            error_id = %error.id,
            kind = %error.kind,
            code = %error.code,
            severity = %error.severity,
            component = self.options.context.as_deref().unwrap_or(""),
            operation = operation.unwrap_or(""),
            "{}",
            error.message,
        );

        if let Some(callback) = &self.on_error {
            // Isolation boundary: a panicking consumer callback must not
            // break the handler's never-fails guarantee.
            if catch_unwind(AssertUnwindSafe(|| callback(&error))).is_err() {
                tracing::warn!(error_id = %error.id, "error callback panicked; continuing");
            }
        }

        if self.options.enable_notifications {
            self.notifications.notify(ErrorNotification::from_error(&error));
        }

        if self.options.enable_reporting {
            self.send_report(ErrorReport::from_error(&error)).await;
        }

        error
    }

    /// Forwards a pre-classified failure straight to the reporting
    /// client, bypassing counting and notification bookkeeping.
    pub async fn report_error(&self, failure: impl Into<Failure>, operation: Option<&str>) {
        let error = normalize(failure.into(), self.context_for(operation));
        self.send_report(ErrorReport::from_error(&error)).await;
    }

    /// Resets the error counter. Already-emitted notifications and
    /// already-sent reports are unaffected.
    pub fn clear_errors(&self) {
        self.error_count.store(0, Ordering::SeqCst);
    }

    /// Number of errors handled since construction or the last
    /// [`clear_errors`](Self::clear_errors).
    pub fn error_count(&self) -> u64 {
        self.error_count.load(Ordering::SeqCst)
    }

    fn context_for(&self, operation: Option<&str>) -> ErrorContext {
        ErrorContext {
            component: self.options.context.clone(),
            operation: operation.map(str::to_string),
            feature: self.options.feature.clone(),
            extra: Default::default(),
        }
    }

    async fn send_report(&self, report: ErrorReport) {
        match self.reporter.report(report).await {
            Ok(id) => tracing::debug!(report_id = %id, "error report accepted"),
            Err(e) => tracing::warn!(error = %e, "error report failed; continuing"),
        }
    }
}
