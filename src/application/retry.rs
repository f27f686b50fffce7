//! RetryExecutor - Bounded retry with exponential backoff.
//!
//! Wraps an asynchronous action in a retry loop driven by a caller
//! supplied predicate over the normalized error. Attempts within one
//! invocation are strictly sequential: attempt *n+1* never starts
//! before attempt *n* has failed and the backoff delay has elapsed.
//!
//! Callers must guarantee the retried action is idempotent; the
//! executor only honors the error's retry eligibility.

use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::domain::{ErrorKind, Failure, StandardError};

use super::cancellation::CancelFlag;
use super::error_handler::ErrorHandler;

/// Predicate deciding whether a normalized error is worth another attempt.
pub type RetryPredicate = Arc<dyn Fn(&StandardError) -> bool + Send + Sync>;

/// Options for one retry invocation.
#[derive(Clone)]
pub struct RetryOptions {
    /// Maximum retries after the initial attempt. `0` means exactly one
    /// attempt and no backoff wait.
    pub max_retries: u32,
    /// Base delay before the first retry.
    pub retry_delay: Duration,
    /// Geometric growth factor applied per attempt.
    pub backoff_multiplier: u32,
    /// Predicate over the normalized error. Defaults to the error's own
    /// retry eligibility.
    pub retry_condition: RetryPredicate,
}

impl RetryOptions {
    /// Sets the retry budget.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the base delay.
    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    /// Sets the backoff growth factor.
    pub fn with_backoff_multiplier(mut self, backoff_multiplier: u32) -> Self {
        self.backoff_multiplier = backoff_multiplier;
        self
    }

    /// Sets the retry predicate.
    pub fn with_retry_condition(
        mut self,
        condition: impl Fn(&StandardError) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.retry_condition = Arc::new(condition);
        self
    }

    /// Backoff delay scheduled after the given failed attempt
    /// (0-indexed): `retry_delay * backoff_multiplier^attempt`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.retry_delay
            .saturating_mul(self.backoff_multiplier.saturating_pow(attempt))
    }
}

impl Default for RetryOptions {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay: Duration::from_millis(1000),
            backoff_multiplier: 2,
            retry_condition: Arc::new(|error| error.retryable),
        }
    }
}

impl fmt::Debug for RetryOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryOptions")
            .field("max_retries", &self.max_retries)
            .field("retry_delay", &self.retry_delay)
            .field("backoff_multiplier", &self.backoff_multiplier)
            .finish_non_exhaustive()
    }
}

/// Executor wrapping actions in bounded retry with exponential backoff.
///
/// `retry_count` and `is_retrying` are visible to the caller for UI
/// feedback ("retrying, attempt 2/3"). Both are scoped to one
/// invocation and reset at the start of every call.
pub struct RetryExecutor {
    handler: Arc<ErrorHandler>,
    retry_count: AtomicU32,
    is_retrying: AtomicBool,
    cancel: Option<CancelFlag>,
}

impl RetryExecutor {
    /// Creates an executor delegating failures to the given handler.
    pub fn new(handler: Arc<ErrorHandler>) -> Self {
        Self {
            handler,
            retry_count: AtomicU32::new(0),
            is_retrying: AtomicBool::new(false),
            cancel: None,
        }
    }

    /// Attaches a cancellation flag, checked before every attempt and
    /// before every backoff sleep.
    pub fn with_cancellation(mut self, flag: CancelFlag) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Runs the action until it succeeds, the retry budget is spent, or
    /// the predicate rejects the failure.
    ///
    /// Unlike [`AsyncOperation`](super::AsyncOperation), exhaustion is
    /// terminal: the normalized error of the last attempt is returned
    /// as `Err` and callers must handle it.
    pub async fn execute_with_retry<T, E, F, Fut>(
        &self,
        mut action: F,
        options: &RetryOptions,
    ) -> Result<T, StandardError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Into<Failure>,
    {
        self.retry_count.store(0, Ordering::SeqCst);
        self.is_retrying.store(false, Ordering::SeqCst);

        let mut attempt: u32 = 0;
        loop {
            if self.is_cancelled() {
                self.is_retrying.store(false, Ordering::SeqCst);
                return Err(cancelled_error());
            }

            match action().await {
                Ok(value) => {
                    self.is_retrying.store(false, Ordering::SeqCst);
                    return Ok(value);
                }
                Err(failure) => {
                    let error = self.handler.handle_error(failure, None).await;

                    let budget_left = attempt < options.max_retries;
                    if !budget_left || !(options.retry_condition)(&error) {
                        self.is_retrying.store(false, Ordering::SeqCst);
                        return Err(error);
                    }
                    if self.is_cancelled() {
                        self.is_retrying.store(false, Ordering::SeqCst);
                        return Err(cancelled_error());
                    }

                    self.is_retrying.store(true, Ordering::SeqCst);
                    self.retry_count.fetch_add(1, Ordering::SeqCst);

                    let delay = options.delay_for_attempt(attempt);
                    tracing::debug!(
                        attempt = attempt + 1,
                        max_retries = options.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        error_id = %error.id,
                        "scheduling retry",
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    /// Retries performed by the current or most recent invocation.
    pub fn retry_count(&self) -> u32 {
        self.retry_count.load(Ordering::SeqCst)
    }

    /// True while a retry is scheduled or in flight.
    pub fn is_retrying(&self) -> bool {
        self.is_retrying.load(Ordering::SeqCst)
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelFlag::is_cancelled)
    }
}

fn cancelled_error() -> StandardError {
    StandardError::new(ErrorKind::AsyncOperation, "operation cancelled")
        .with_code("OPERATION_CANCELLED")
        .with_user_message("The operation was cancelled.")
        .with_retryable(false)
        .with_recoverable(true)
}
