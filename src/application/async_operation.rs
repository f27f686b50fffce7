//! AsyncOperation - Loading/error state machine around one awaited action.
//!
//! The executor isolates callers from failure propagation entirely:
//! `execute` resolves to `Some(value)` or `None`, never to an error. The
//! failure itself is recorded through the owning [`ErrorHandler`] and
//! exposed via [`AsyncOperation::error`] for the UI to render.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::domain::{Failure, StandardError};

use super::cancellation::CancelFlag;
use super::error_handler::ErrorHandler;

/// Executor owning the `idle -> loading -> {success, error}` state of a
/// single asynchronous operation.
///
/// Overlapping `execute` calls are not serialized: the last settlement
/// wins for the shared state, while each call's return value reflects
/// its own outcome.
pub struct AsyncOperation {
    handler: Arc<ErrorHandler>,
    loading: AtomicBool,
    error: Mutex<Option<StandardError>>,
    cancel: Option<CancelFlag>,
}

impl AsyncOperation {
    /// Creates an executor delegating failures to the given handler.
    pub fn new(handler: Arc<ErrorHandler>) -> Self {
        Self {
            handler,
            loading: AtomicBool::new(false),
            error: Mutex::new(None),
            cancel: None,
        }
    }

    /// Attaches a cancellation flag. A cancelled executor skips all
    /// state mutation, so settlement after teardown is a no-op.
    pub fn with_cancellation(mut self, flag: CancelFlag) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Runs one action to completion.
    ///
    /// On success the value is returned and state returns to idle. On
    /// failure the error is recorded through the handler, the `error`
    /// state is set, and `None` is returned. The failure is never
    /// propagated to the caller.
    pub async fn execute<T, E, Fut>(&self, action: Fut) -> Option<T>
    where
        Fut: Future<Output = Result<T, E>>,
        E: Into<Failure>,
    {
        if self.is_cancelled() {
            return None;
        }
        self.loading.store(true, Ordering::SeqCst);
        self.set_error(None);

        match action.await {
            Ok(value) => {
                if self.is_cancelled() {
                    return None;
                }
                self.loading.store(false, Ordering::SeqCst);
                Some(value)
            }
            Err(failure) => {
                let error = self.handler.handle_error(failure, None).await;
                if self.is_cancelled() {
                    return None;
                }
                self.loading.store(false, Ordering::SeqCst);
                self.set_error(Some(error));
                None
            }
        }
    }

    /// True while an action is in flight.
    pub fn loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// The last recorded error, if any.
    pub fn error(&self) -> Option<StandardError> {
        self.error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Clears the recorded error without touching loading state.
    pub fn clear_error(&self) {
        self.set_error(None);
    }

    fn set_error(&self, error: Option<StandardError>) {
        *self.error.lock().unwrap_or_else(PoisonError::into_inner) = error;
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelFlag::is_cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::error_handler::ErrorHandlerOptions;
    use crate::domain::ErrorKind;
    use serde_json::json;

    fn executor() -> AsyncOperation {
        AsyncOperation::new(Arc::new(ErrorHandler::new(ErrorHandlerOptions::default())))
    }

    #[tokio::test]
    async fn success_returns_value_and_idles() {
        let op = executor();
        let result: Option<u32> = op.execute(async { Ok::<_, Failure>(7) }).await;
        assert_eq!(result, Some(7));
        assert!(!op.loading());
        assert!(op.error().is_none());
    }

    #[tokio::test]
    async fn failure_resolves_to_none_with_error_state() {
        let op = executor();
        let result: Option<u32> = op.execute(async { Err("boom") }).await;
        assert_eq!(result, None);
        assert!(!op.loading());
        let err = op.error().expect("error recorded");
        assert_eq!(err.kind, ErrorKind::Unknown);
    }

    #[tokio::test]
    async fn any_rejection_shape_is_swallowed() {
        let op = executor();

        let from_str: Option<()> = op.execute(async { Err("string failure") }).await;
        assert_eq!(from_str, None);

        let from_payload: Option<()> = op
            .execute(async { Err(json!({ "type": "UNAUTHORIZED" })) })
            .await;
        assert_eq!(from_payload, None);
        assert_eq!(op.error().map(|e| e.kind), Some(ErrorKind::Unauthorized));

        let from_native: Option<()> = op
            .execute(async { Err(Failure::native(std::io::Error::other("io down"))) })
            .await;
        assert_eq!(from_native, None);
        assert_eq!(op.error().map(|e| e.kind), Some(ErrorKind::Component));
    }

    #[tokio::test]
    async fn new_execution_clears_stale_error() {
        let op = executor();
        op.execute::<u32, _, _>(async { Err("boom") }).await;
        assert!(op.error().is_some());

        let result = op.execute(async { Ok::<_, Failure>(1) }).await;
        assert_eq!(result, Some(1));
        assert!(op.error().is_none());
    }

    #[tokio::test]
    async fn clear_error_resets_error_state() {
        let op = executor();
        op.execute::<u32, _, _>(async { Err("boom") }).await;
        op.clear_error();
        assert!(op.error().is_none());
    }

    #[tokio::test]
    async fn cancelled_executor_skips_state_updates() {
        let flag = CancelFlag::new();
        let op = executor().with_cancellation(flag.clone());
        flag.cancel();

        let result = op.execute(async { Ok::<_, Failure>(7) }).await;
        assert_eq!(result, None);
        assert!(!op.loading());
        assert!(op.error().is_none());
    }

    #[tokio::test]
    async fn cancellation_during_flight_suppresses_settlement() {
        let flag = CancelFlag::new();
        let op = executor().with_cancellation(flag.clone());

        let cancel_mid_action = flag.clone();
        let result: Option<u32> = op
            .execute(async move {
                cancel_mid_action.cancel();
                Err("boom")
            })
            .await;

        assert_eq!(result, None);
        // Late settlement is a no-op: no error state recorded.
        assert!(op.error().is_none());
    }
}
