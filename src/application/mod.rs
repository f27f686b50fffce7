//! Application layer - the reusable behavior units of the pipeline.
//!
//! Each unit is constructed per consumer and owns only its own state:
//! the error handler its counter, the async executor its loading/error
//! pair, the retry executor its attempt bookkeeping, the form mapper
//! its field-error map. No cross-instance shared mutable state exists.

mod async_operation;
mod cancellation;
mod error_handler;
mod form_errors;
mod retry;

pub use async_operation::AsyncOperation;
pub use cancellation::CancelFlag;
pub use error_handler::{ErrorCallback, ErrorHandler, ErrorHandlerOptions};
pub use form_errors::{FormError, FormErrors, FORM_ERROR_CODE};
pub use retry::{RetryExecutor, RetryOptions, RetryPredicate};
