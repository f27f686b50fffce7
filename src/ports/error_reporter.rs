//! ErrorReporter port - Interface to the external error reporting client.
//!
//! The core does not implement transport, batching, or persistence of
//! reports; it only guarantees that it calls this interface with a
//! descriptor fully derived from a [`StandardError`]. The descriptor is
//! the single outbound wire contract the crate owns.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::{ErrorKind, StandardError};

/// Opaque identifier assigned to a report by the reporting client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportId(String);

impl ReportId {
    /// Creates a report id from the client's opaque value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a random report id (for in-process reporters).
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outbound report descriptor.
///
/// Field names are the wire contract; do not rename without versioning
/// the reporting client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReport {
    pub error_type: String,
    pub error_message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack_trace: Option<String>,
    pub severity: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
    pub context_data: serde_json::Value,
}

impl ErrorReport {
    /// Derives a report descriptor from a normalized error.
    pub fn from_error(error: &StandardError) -> Self {
        let context_data = serde_json::json!({
            "error_id": error.id.to_string(),
            "code": error.code,
            "component": error.context.component,
            "extra": error.context.extra,
            "timestamp": error.timestamp,
        });
        Self {
            error_type: error.kind.to_string(),
            error_message: error.message.clone(),
            stack_trace: error.stack.clone(),
            severity: error.severity.to_string(),
            category: category_for(error.kind).to_string(),
            feature_name: error.context.feature.clone(),
            operation: error.context.operation.clone(),
            context_data,
        }
    }
}

/// Coarse grouping used by the reporting backend's dashboards.
fn category_for(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::Component => "ui",
        ErrorKind::AsyncOperation | ErrorKind::RateLimitExceeded => "api",
        ErrorKind::Validation => "validation",
        ErrorKind::Unauthorized => "auth",
        ErrorKind::Unknown => "unknown",
    }
}

/// Errors returned by a reporting client.
#[derive(Debug, Clone, Error)]
pub enum ReportError {
    /// The report never reached the client.
    #[error("report transport failed: {0}")]
    Transport(String),

    /// The client received the report and refused it.
    #[error("report rejected: {0}")]
    Rejected(String),
}

impl ReportError {
    /// Creates a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Creates a rejection error.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(message.into())
    }
}

/// Port for the external error reporting client.
///
/// Implementations own transport and batching. Each call is independent;
/// the core never serializes calls to the reporter.
#[async_trait]
pub trait ErrorReporter: Send + Sync {
    /// Submits one report, returning the client-assigned id.
    async fn report(&self, report: ErrorReport) -> Result<ReportId, ReportError>;
}

/// Reporter that discards everything, for consumers without a backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpErrorReporter;

#[async_trait]
impl ErrorReporter for NoOpErrorReporter {
    async fn report(&self, _report: ErrorReport) -> Result<ReportId, ReportError> {
        Ok(ReportId::generate())
    }
}
