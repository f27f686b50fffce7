//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ConfigValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("max_retries exceeds maximum allowed (10)")]
    RetryBudgetTooLarge,

    #[error("backoff_multiplier must be at least 1")]
    InvalidBackoffMultiplier,

    #[error("retry_delay_ms must be between 1 and 60000")]
    InvalidRetryDelay,

    #[error("notification default_duration_secs must be greater than zero")]
    InvalidNotificationDuration,

    #[error("reporting endpoint must be an http(s) URL")]
    InvalidReportingEndpoint,
}
