//! Failure normalization - the single entry point into the pipeline.
//!
//! Anything a caller can fail with is wrapped in a [`Failure`] and handed
//! to [`normalize`], which produces exactly one [`StandardError`]. There
//! is no other way to mint a classified error from raw input, so every
//! call site shares one classification table and one fallback branch.
//!
//! Classification is deterministic: deep-equal inputs yield the same
//! kind, severity, code, and retry eligibility. Only `id` and
//! `timestamp` are fresh per call.

use std::collections::HashMap;
use std::error::Error;

use once_cell::sync::Lazy;
use serde_json::Value;

use super::error::{ErrorContext, ErrorKind, Severity, StandardError};

/// A failure on its way into the pipeline.
///
/// Tagged union over every accepted input shape. Structured API payloads
/// and unknown primitives both travel as [`Failure::Payload`]; the
/// normalizer inspects the value to tell them apart.
pub enum Failure {
    /// A native Rust error value.
    Native(Box<dyn Error + Send + Sync>),
    /// A structured payload or arbitrary value (API failure bodies,
    /// strings, numbers, ...).
    Payload(Value),
    /// An already-normalized error; passes through unchanged.
    Standard(StandardError),
}

impl Failure {
    /// Wraps a native error.
    pub fn native(error: impl Error + Send + Sync + 'static) -> Self {
        Failure::Native(Box::new(error))
    }

    /// Wraps an arbitrary JSON payload.
    pub fn payload(value: Value) -> Self {
        Failure::Payload(value)
    }

    /// Wraps a plain message.
    pub fn message(message: impl Into<String>) -> Self {
        Failure::Payload(Value::String(message.into()))
    }
}

impl std::fmt::Debug for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Failure::Native(e) => f.debug_tuple("Native").field(&e.to_string()).finish(),
            Failure::Payload(v) => f.debug_tuple("Payload").field(v).finish(),
            Failure::Standard(e) => f.debug_tuple("Standard").field(&e.code).finish(),
        }
    }
}

impl From<Value> for Failure {
    fn from(value: Value) -> Self {
        Failure::Payload(value)
    }
}

impl From<String> for Failure {
    fn from(message: String) -> Self {
        Failure::Payload(Value::String(message))
    }
}

impl From<&str> for Failure {
    fn from(message: &str) -> Self {
        Failure::Payload(Value::String(message.to_string()))
    }
}

impl From<StandardError> for Failure {
    fn from(error: StandardError) -> Self {
        Failure::Standard(error)
    }
}

impl From<Box<dyn Error + Send + Sync>> for Failure {
    fn from(error: Box<dyn Error + Send + Sync>) -> Self {
        Failure::Native(error)
    }
}

/// Fixed classification for one structured discriminator.
struct Classification {
    kind: ErrorKind,
    severity: Severity,
    retryable: bool,
    recoverable: bool,
    /// Whether the payload's `details` member survives onto the
    /// normalized error (validation details feed the form mapper,
    /// rate-limit details carry `retry_after`).
    keep_details: bool,
}

/// Discriminator -> behavior table for API-shaped failures.
static CLASSIFICATIONS: Lazy<HashMap<&'static str, Classification>> = Lazy::new(|| {
    let mut table = HashMap::new();
    table.insert(
        "RATE_LIMIT_EXCEEDED",
        Classification {
            kind: ErrorKind::RateLimitExceeded,
            severity: Severity::Medium,
            retryable: true,
            recoverable: true,
            keep_details: true,
        },
    );
    table.insert(
        "UNAUTHORIZED",
        Classification {
            kind: ErrorKind::Unauthorized,
            severity: Severity::Medium,
            retryable: false,
            recoverable: false,
            keep_details: false,
        },
    );
    table.insert(
        "VALIDATION_ERROR",
        Classification {
            kind: ErrorKind::Validation,
            severity: Severity::Low,
            retryable: false,
            recoverable: true,
            keep_details: true,
        },
    );
    table
});

/// Converts any failure into a [`StandardError`].
///
/// - Native errors map to [`ErrorKind::Component`] with the source chain
///   rendered into `stack` and `details`.
/// - Payload objects with a string `type` discriminator map through the
///   fixed classification table; unrecognized discriminators become
///   [`ErrorKind::AsyncOperation`] with the raw discriminator as `code`.
/// - Everything else becomes [`ErrorKind::Unknown`] with the value's
///   string coercion as the message.
pub fn normalize(failure: Failure, context: ErrorContext) -> StandardError {
    match failure {
        Failure::Standard(error) => error,
        Failure::Native(error) => normalize_native(error.as_ref(), context),
        Failure::Payload(value) => normalize_payload(value, context),
    }
}

fn normalize_native(error: &(dyn Error + 'static), context: ErrorContext) -> StandardError {
    let stack = render_source_chain(error);
    let details = serde_json::json!({
        "original_error": error.to_string(),
        "stack": stack,
    });
    StandardError::new(ErrorKind::Component, error.to_string())
        .with_context(context)
        .with_details(details)
        .with_stack(stack)
}

fn normalize_payload(value: Value, context: ErrorContext) -> StandardError {
    let discriminator = value
        .get("type")
        .and_then(Value::as_str)
        .map(str::to_string);

    let Some(discriminator) = discriminator else {
        return normalize_unknown(value, context);
    };

    let message = value
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or(&discriminator)
        .to_string();
    let details = value.get("details").cloned();

    match CLASSIFICATIONS.get(discriminator.as_str()) {
        Some(classification) => {
            let mut error = StandardError::new(classification.kind, message)
                .with_code(discriminator)
                .with_severity(classification.severity)
                .with_retryable(classification.retryable)
                .with_recoverable(classification.recoverable)
                .with_context(context);
            if classification.keep_details {
                if let Some(details) = details {
                    error = error.with_details(details);
                }
            }
            error
        }
        None => {
            let mut error = StandardError::new(ErrorKind::AsyncOperation, message)
                .with_code(discriminator)
                .with_severity(Severity::Medium)
                .with_retryable(false)
                .with_context(context);
            if let Some(details) = details {
                error = error.with_details(details);
            }
            error
        }
    }
}

fn normalize_unknown(value: Value, context: ErrorContext) -> StandardError {
    let message = match &value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    StandardError::new(ErrorKind::Unknown, message).with_context(context)
}

/// Renders an error and its source chain into one diagnostic string.
fn render_source_chain(error: &(dyn Error + 'static)) -> String {
    let mut rendered = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        rendered.push_str("\n  caused by: ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}
