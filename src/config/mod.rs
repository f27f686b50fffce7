//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Configuration is loaded with the
//! `FAILGUARD` prefix and nested values use double underscores as
//! separators.
//!
//! # Example
//!
//! ```no_run
//! use failguard::config::FailguardConfig;
//!
//! let config = FailguardConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! let retry_options = config.retry.to_options();
//! ```

mod error;

pub use error::{ConfigError, ConfigValidationError};

use std::time::Duration;

use serde::Deserialize;

use crate::application::RetryOptions;

/// Root configuration for the failure pipeline.
///
/// Every section has sensible defaults, so an empty environment yields
/// a working configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FailguardConfig {
    /// Retry executor defaults.
    #[serde(default)]
    pub retry: RetryConfig,

    /// Notification behavior.
    #[serde(default)]
    pub notifications: NotificationConfig,

    /// Error reporting behavior.
    #[serde(default)]
    pub reporting: ReportingConfig,
}

impl FailguardConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with the `FAILGUARD` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `FAILGUARD__RETRY__MAX_RETRIES=5` -> `retry.max_retries = 5`
    /// - `FAILGUARD__REPORTING__ENABLED=true` -> `reporting.enabled = true`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into the
    /// expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("FAILGUARD")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ConfigValidationError` if any value is out of bounds.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.retry.max_retries > 10 {
            return Err(ConfigValidationError::RetryBudgetTooLarge);
        }
        if self.retry.backoff_multiplier < 1 {
            return Err(ConfigValidationError::InvalidBackoffMultiplier);
        }
        if self.retry.retry_delay_ms == 0 || self.retry.retry_delay_ms > 60_000 {
            return Err(ConfigValidationError::InvalidRetryDelay);
        }
        if self.notifications.default_duration_secs == 0 {
            return Err(ConfigValidationError::InvalidNotificationDuration);
        }
        if let Some(endpoint) = &self.reporting.endpoint {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                return Err(ConfigValidationError::InvalidReportingEndpoint);
            }
        }
        Ok(())
    }
}

/// Retry executor defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    /// Maximum retries after the initial attempt.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base delay before the first retry, in milliseconds.
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Geometric growth factor applied per attempt.
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: u32,
}

impl RetryConfig {
    /// Converts the config into runtime retry options with the default
    /// predicate (the error's own retry eligibility).
    pub fn to_options(&self) -> RetryOptions {
        RetryOptions::default()
            .with_max_retries(self.max_retries)
            .with_retry_delay(Duration::from_millis(self.retry_delay_ms))
            .with_backoff_multiplier(self.backoff_multiplier)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
        }
    }
}

/// Notification behavior.
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationConfig {
    /// Whether handlers emit notifications.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Auto-dismiss duration for non-persistent notifications.
    #[serde(default = "default_notification_duration_secs")]
    pub default_duration_secs: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            default_duration_secs: default_notification_duration_secs(),
        }
    }
}

/// Error reporting behavior.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportingConfig {
    /// Whether handlers forward reports to the reporting client.
    #[serde(default)]
    pub enabled: bool,

    /// Reporting client endpoint, handed to whichever client
    /// implementation the consumer wires in.
    #[serde(default)]
    pub endpoint: Option<String>,
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    1000
}

fn default_backoff_multiplier() -> u32 {
    2
}

fn default_notification_duration_secs() -> u64 {
    5
}

fn default_true() -> bool {
    true
}
