//! Canonical error types for the failure pipeline.
//!
//! Every failure that enters the crate is converted into exactly one
//! [`StandardError`] by the normalizer. The record is immutable once
//! created: consumers read it, report it, or map it onto form state,
//! but never mutate it.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a normalized error.
///
/// Generated fresh at normalization time, so two normalizations of the
/// same input are distinguishable in logs and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorId(Uuid);

impl ErrorId {
    /// Creates a new random ErrorId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an ErrorId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ErrorId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ErrorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ErrorId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Immutable point in time, always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from a DateTime<Utc>.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Returns the inner DateTime.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Returns the timestamp as Unix seconds.
    pub fn as_unix_secs(&self) -> u64 {
        self.0.timestamp().max(0) as u64
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

/// Ordinal urgency classification driving UI treatment.
///
/// Ordered from least to most urgent, so `Severity::High > Severity::Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Wire form of the severity (`low`, `medium`, `high`, `critical`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Coarse error taxonomy.
///
/// Each kind carries a default severity, user message, and retry
/// eligibility; the normalizer's classification table may override these
/// for structured payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Failure raised inside UI or component logic.
    Component,
    /// Failure from an asynchronous backend operation.
    AsyncOperation,
    /// Field-level validation failure; carries `details`.
    Validation,
    /// Authentication or authorization failure. Never retryable.
    Unauthorized,
    /// Provider or backend rate limiting. Retryable after the stated interval.
    RateLimitExceeded,
    /// Unrecognized failure shape.
    Unknown,
}

impl ErrorKind {
    /// Wire form of the kind (`component`, `rate_limit_exceeded`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Component => "component",
            ErrorKind::AsyncOperation => "async_operation",
            ErrorKind::Validation => "validation",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::RateLimitExceeded => "rate_limit_exceeded",
            ErrorKind::Unknown => "unknown",
        }
    }

    /// Machine-readable default code used when the source carries none.
    pub fn default_code(&self) -> &'static str {
        match self {
            ErrorKind::Component => "COMPONENT_ERROR",
            ErrorKind::AsyncOperation => "ASYNC_OPERATION_FAILED",
            ErrorKind::Validation => "VALIDATION_ERROR",
            ErrorKind::Unauthorized => "UNAUTHORIZED",
            ErrorKind::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
            ErrorKind::Unknown => "UNKNOWN_ERROR",
        }
    }

    /// End-user-safe default message for this kind.
    pub fn default_user_message(&self) -> &'static str {
        match self {
            ErrorKind::Component => "Something went wrong. Please try again.",
            ErrorKind::AsyncOperation => "The request could not be completed. Please try again.",
            ErrorKind::Validation => "Please check the highlighted fields and try again.",
            ErrorKind::Unauthorized => "Your session has expired. Please sign in again.",
            ErrorKind::RateLimitExceeded => "Too many requests. Please wait a moment and try again.",
            ErrorKind::Unknown => "An unexpected error occurred.",
        }
    }

    /// Default severity for this kind.
    pub fn default_severity(&self) -> Severity {
        match self {
            ErrorKind::Validation => Severity::Low,
            _ => Severity::Medium,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Free-form description of where a failure occurred.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Component or screen that owned the failing operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    /// Operation in flight when the failure occurred.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
    /// Product feature the operation belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature: Option<String>,
    /// Additional free-form key/value context.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub extra: HashMap<String, String>,
}

impl ErrorContext {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the owning component.
    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }

    /// Sets the operation in flight.
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    /// Sets the owning feature.
    pub fn with_feature(mut self, feature: impl Into<String>) -> Self {
        self.feature = Some(feature.into());
        self
    }

    /// Adds a free-form context entry.
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// Canonical normalized error record.
///
/// Created by the normalizer (or the constructors here, which enforce the
/// same defaults) and never mutated afterwards. `message` is diagnostic
/// text; `user_message` is always safe to show to an end user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardError {
    pub id: ErrorId,
    pub kind: ErrorKind,
    pub code: String,
    pub message: String,
    pub user_message: String,
    pub severity: Severity,
    pub context: ErrorContext,
    /// Structured payload preserved verbatim from the source, when present.
    /// For validation errors this is what the form mapper interprets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    pub recoverable: bool,
    pub retryable: bool,
    pub timestamp: Timestamp,
    /// Source-chain rendering, present only for native error origins.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl StandardError {
    /// Creates an error of the given kind with per-kind defaults for
    /// code, user message, severity, and retry eligibility.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.is_empty() {
            kind.default_user_message().to_string()
        } else {
            message
        };
        Self {
            id: ErrorId::new(),
            kind,
            code: kind.default_code().to_string(),
            message,
            user_message: kind.default_user_message().to_string(),
            severity: kind.default_severity(),
            context: ErrorContext::default(),
            details: None,
            recoverable: true,
            retryable: false,
            timestamp: Timestamp::now(),
            stack: None,
        }
    }

    /// Overrides the machine-readable code. Empty codes are ignored.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        let code = code.into();
        if !code.is_empty() {
            self.code = code;
        }
        self
    }

    /// Overrides the end-user message. Empty messages are ignored.
    pub fn with_user_message(mut self, user_message: impl Into<String>) -> Self {
        let user_message = user_message.into();
        if !user_message.is_empty() {
            self.user_message = user_message;
        }
        self
    }

    /// Overrides the severity.
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Attaches the structured details payload.
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Attaches context describing where the failure occurred.
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = context;
        self
    }

    /// Sets retry eligibility.
    pub fn with_retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable;
        self
    }

    /// Sets whether the owning flow can continue after this error.
    pub fn with_recoverable(mut self, recoverable: bool) -> Self {
        self.recoverable = recoverable;
        self
    }

    /// Attaches a diagnostic trace.
    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    /// Retry-after interval stated by the source, read from
    /// `details.retry_after` (seconds), when present.
    pub fn retry_after(&self) -> Option<Duration> {
        self.details
            .as_ref()
            .and_then(|d| d.get("retry_after"))
            .and_then(|v| v.as_u64())
            .map(Duration::from_secs)
    }
}

impl fmt::Display for StandardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for StandardError {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_error_fills_kind_defaults() {
        let err = StandardError::new(ErrorKind::Validation, "email is malformed");
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(err.code, "VALIDATION_ERROR");
        assert_eq!(err.severity, Severity::Low);
        assert!(!err.retryable);
        assert!(err.recoverable);
        assert!(!err.user_message.is_empty());
    }

    #[test]
    fn empty_overrides_are_ignored() {
        let err = StandardError::new(ErrorKind::Unknown, "boom")
            .with_code("")
            .with_user_message("");
        assert_eq!(err.code, "UNKNOWN_ERROR");
        assert_eq!(err.user_message, ErrorKind::Unknown.default_user_message());
    }

    #[test]
    fn empty_message_falls_back_to_user_message() {
        let err = StandardError::new(ErrorKind::Component, "");
        assert!(!err.message.is_empty());
    }

    #[test]
    fn display_shows_code_and_message() {
        let err = StandardError::new(ErrorKind::Unauthorized, "token expired");
        assert_eq!(format!("{}", err), "[UNAUTHORIZED] token expired");
    }

    #[test]
    fn retry_after_reads_details_seconds() {
        let err = StandardError::new(ErrorKind::RateLimitExceeded, "slow down")
            .with_details(json!({ "retry_after": 60 }));
        assert_eq!(err.retry_after(), Some(Duration::from_secs(60)));
    }

    #[test]
    fn retry_after_is_none_without_details() {
        let err = StandardError::new(ErrorKind::RateLimitExceeded, "slow down");
        assert_eq!(err.retry_after(), None);
    }

    #[test]
    fn severity_orders_by_urgency() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Medium > Severity::Low);
    }

    #[test]
    fn kind_wire_forms_are_snake_case() {
        assert_eq!(ErrorKind::RateLimitExceeded.as_str(), "rate_limit_exceeded");
        assert_eq!(ErrorKind::AsyncOperation.as_str(), "async_operation");
    }

    #[test]
    fn context_builder_accumulates() {
        let ctx = ErrorContext::new()
            .with_component("ChatScreen")
            .with_operation("send_message")
            .with_extra("conversation_id", "42");
        assert_eq!(ctx.component.as_deref(), Some("ChatScreen"));
        assert_eq!(ctx.operation.as_deref(), Some("send_message"));
        assert_eq!(ctx.extra.get("conversation_id").map(String::as_str), Some("42"));
    }
}
