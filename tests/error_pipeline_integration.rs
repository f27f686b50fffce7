//! Integration tests for the full failure pipeline.
//!
//! These tests verify the end-to-end flow:
//! 1. A failing action is executed through the async executor
//! 2. The failure is normalized into a `StandardError`
//! 3. The handler counts it, emits a notification, and forwards a report
//! 4. Validation details land on per-field form state
//!
//! Uses in-memory implementations of both ports.

use std::sync::Arc;

use serde_json::json;

use failguard::adapters::{InMemoryErrorReporter, InMemoryNotificationSink};
use failguard::application::{
    AsyncOperation, ErrorHandler, ErrorHandlerOptions, FormErrors, RetryExecutor, RetryOptions,
};
use failguard::domain::{ErrorKind, Failure, Severity};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("failguard=debug")
        .with_test_writer()
        .try_init();
}

fn full_handler(
    reporter: Arc<InMemoryErrorReporter>,
    sink: Arc<InMemoryNotificationSink>,
) -> Arc<ErrorHandler> {
    Arc::new(
        ErrorHandler::new(ErrorHandlerOptions::all_enabled("ChatScreen"))
            .with_reporter(reporter)
            .with_notification_sink(sink),
    )
}

#[tokio::test]
async fn rate_limit_failure_flows_through_the_whole_pipeline() {
    init_tracing();
    let reporter = Arc::new(InMemoryErrorReporter::new());
    let sink = Arc::new(InMemoryNotificationSink::new());
    let handler = full_handler(reporter.clone(), sink.clone());

    let error = handler
        .handle_error(
            json!({
                "type": "RATE_LIMIT_EXCEEDED",
                "message": "rate limit exceeded",
                "details": { "retry_after": 60 }
            }),
            Some("send_message"),
        )
        .await;

    // Normalization
    assert_eq!(error.kind, ErrorKind::RateLimitExceeded);
    assert_eq!(error.severity, Severity::Medium);
    assert!(error.retryable);
    assert_eq!(error.retry_after(), Some(std::time::Duration::from_secs(60)));

    // Counting
    assert_eq!(handler.error_count(), 1);

    // Notification carries the retry affordance
    let notifications = sink.notifications();
    assert_eq!(notifications.len(), 1);
    assert!(notifications[0].offers_retry());
    assert!(!notifications[0].is_persistent());

    // Report descriptor is fully derived
    let reports = reporter.reports().await;
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].error_type, "rate_limit_exceeded");
    assert_eq!(reports[0].severity, "medium");
    assert_eq!(reports[0].category, "api");
    assert_eq!(reports[0].operation.as_deref(), Some("send_message"));
}

#[tokio::test]
async fn default_retry_predicate_retries_rate_limited_actions() {
    init_tracing();
    let handler = Arc::new(ErrorHandler::new(ErrorHandlerOptions::default()));
    let exec = RetryExecutor::new(handler);
    let options = RetryOptions::default()
        .with_max_retries(1)
        .with_retry_delay(std::time::Duration::from_millis(1));

    let attempts = Arc::new(std::sync::atomic::AtomicU32::new(0));
    let counter = Arc::clone(&attempts);
    let result = exec
        .execute_with_retry(
            move || {
                let counter = Arc::clone(&counter);
                async move {
                    if counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst) == 0 {
                        Err(json!({ "type": "RATE_LIMIT_EXCEEDED", "details": { "retry_after": 1 } }))
                    } else {
                        Ok("delivered")
                    }
                }
            },
            &options,
        )
        .await;

    assert_eq!(result.ok(), Some("delivered"));
    assert_eq!(attempts.load(std::sync::atomic::Ordering::SeqCst), 2);
    assert_eq!(exec.retry_count(), 1);
}

#[tokio::test]
async fn validation_failure_lands_on_form_state() {
    init_tracing();
    let reporter = Arc::new(InMemoryErrorReporter::new());
    let sink = Arc::new(InMemoryNotificationSink::new());
    let handler = full_handler(reporter, sink);
    let op = AsyncOperation::new(handler);

    let result: Option<()> = op
        .execute(async {
            Err(json!({
                "type": "VALIDATION_ERROR",
                "message": "validation failed",
                "details": [
                    { "field": "email", "message": "Invalid email" },
                    { "field": "name", "message": "Required" }
                ]
            }))
        })
        .await;
    assert_eq!(result, None);

    let error = op.error().expect("error recorded");
    assert_eq!(error.kind, ErrorKind::Validation);

    let mut form = FormErrors::new();
    form.handle_validation_error(&error);
    assert_eq!(form.len(), 2);
    let email = form.get("email").expect("email error mapped");
    assert_eq!(email.message, "Invalid email");
    assert_eq!(email.code, "VALIDATION_ERROR");
    assert!(!form.is_valid());
}

#[tokio::test]
async fn reporting_outage_never_reaches_the_caller() {
    init_tracing();
    let reporter = Arc::new(InMemoryErrorReporter::failing());
    let sink = Arc::new(InMemoryNotificationSink::new());
    let handler = full_handler(reporter, sink.clone());
    let op = AsyncOperation::new(handler.clone());

    let result: Option<()> = op
        .execute(async { Err(Failure::native(std::io::Error::other("backend down"))) })
        .await;

    // The pipeline still settles: no propagation, state recorded,
    // notification emitted, counter incremented.
    assert_eq!(result, None);
    assert_eq!(op.error().map(|e| e.kind), Some(ErrorKind::Component));
    assert_eq!(sink.count(), 1);
    assert_eq!(handler.error_count(), 1);
}

#[tokio::test]
async fn counter_survives_mixed_traffic_until_cleared() {
    init_tracing();
    let handler = Arc::new(ErrorHandler::new(ErrorHandlerOptions::default()));

    handler.handle_error("one", None).await;
    handler.handle_error(json!({ "type": "UNAUTHORIZED" }), None).await;
    handler
        .handle_error(Failure::native(std::io::Error::other("three")), None)
        .await;
    assert_eq!(handler.error_count(), 3);

    handler.clear_errors();
    assert_eq!(handler.error_count(), 0);

    handler.handle_error("again", None).await;
    assert_eq!(handler.error_count(), 1);
}
