// ── Store state cell ──
//
// The `{data, loading, error}` triple every store publishes, plus the
// bookkeeping that drives `loading` across overlapping operations.

use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::task::{Context, Poll};

use futures_core::Stream;
use serde::Serialize;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use updater_api::{ApiResponse, Error};

/// Observable state of one store.
///
/// `loading=false, error=Some(..)` is a valid resting state meaning the
/// last operation failed. `data` is never cleared by a failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StoreState<T> {
    pub data: T,
    pub loading: bool,
    pub error: Option<String>,
}

/// Outcome of a mutating store action, returned to the caller and
/// mirrored into the store's shared state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionResult {
    pub success: bool,
    pub message: String,
}

impl ActionResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }

    /// Collapse a transport result into an action outcome.
    ///
    /// `ok_fallback` is used when the server reports success without a
    /// message; `err_fallback` when it reports failure without one.
    pub(crate) fn from_response<T>(
        result: Result<ApiResponse<T>, Error>,
        ok_fallback: &str,
        err_fallback: &str,
    ) -> Self {
        match result {
            Ok(res) if res.success => Self::ok(res.message_or(ok_fallback)),
            Ok(res) => Self::failed(res.message_or(err_fallback)),
            Err(err) => Self::failed(failure_message(&err, err_fallback)),
        }
    }
}

/// User-facing message for a transport error, or `fallback` if it has none.
pub(crate) fn failure_message(err: &Error, fallback: &str) -> String {
    let message = err.to_string();
    if message.is_empty() {
        fallback.to_owned()
    } else {
        message
    }
}

// ── StateCell ───────────────────────────────────────────────────────

/// Owner of a store's `watch` channel.
///
/// `loading` tracks an in-flight counter, so it only drops back to
/// `false` once every overlapping operation has settled. `data` and
/// `error` are last-writer-wins.
pub(crate) struct StateCell<T> {
    tx: watch::Sender<StoreState<T>>,
    in_flight: AtomicUsize,
}

impl<T: Clone + Default> StateCell<T> {
    pub(crate) fn new() -> Self {
        let (tx, _) = watch::channel(StoreState::default());
        Self {
            tx,
            in_flight: AtomicUsize::new(0),
        }
    }
}

impl<T: Clone> StateCell<T> {
    pub(crate) fn snapshot(&self) -> StoreState<T> {
        self.tx.borrow().clone()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<StoreState<T>> {
        self.tx.subscribe()
    }

    /// Start an operation: raise `loading`, clear `error`.
    pub(crate) fn begin(&self) -> Operation<'_, T> {
        // `send_modify` updates unconditionally, even with zero receivers.
        self.tx.send_modify(|state| {
            self.in_flight.fetch_add(1, Ordering::SeqCst);
            state.loading = true;
            state.error = None;
        });
        Operation {
            cell: self,
            settled: false,
        }
    }

    fn release(&self, state: &mut StoreState<T>) {
        let remaining = self.in_flight.fetch_sub(1, Ordering::SeqCst).saturating_sub(1);
        state.loading = remaining > 0;
    }
}

/// Guard for one in-flight operation.
///
/// Settling applies the outcome and releases `loading` in a single
/// notification. Dropping an unsettled guard (the future was cancelled)
/// still releases `loading`.
pub(crate) struct Operation<'a, T: Clone> {
    cell: &'a StateCell<T>,
    settled: bool,
}

impl<T: Clone> Operation<'_, T> {
    pub(crate) fn settle(mut self, apply: impl FnOnce(&mut StoreState<T>)) {
        self.settled = true;
        self.cell.tx.send_modify(|state| {
            apply(state);
            self.cell.release(state);
        });
    }
}

impl<T: Clone> Drop for Operation<'_, T> {
    fn drop(&mut self) {
        if !self.settled {
            self.cell.tx.send_modify(|state| self.cell.release(state));
        }
    }
}

// ── StoreWatch ──────────────────────────────────────────────────────

/// A subscription to a store's state.
///
/// Provides point-in-time access and change notification via
/// [`changed()`](Self::changed) or by converting to a `Stream`.
pub struct StoreWatch<T: Clone + Send + Sync + 'static> {
    receiver: watch::Receiver<StoreState<T>>,
}

impl<T: Clone + Send + Sync + 'static> StoreWatch<T> {
    pub(crate) fn new(receiver: watch::Receiver<StoreState<T>>) -> Self {
        Self { receiver }
    }

    /// The latest published state.
    pub fn current(&self) -> StoreState<T> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next change, returning the new state.
    /// Returns `None` if the store has been dropped.
    pub async fn changed(&mut self) -> Option<StoreState<T>> {
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }

    /// Convert into a `Stream` for use with `StreamExt` combinators.
    /// The first item is the current state.
    pub fn into_stream(self) -> StoreStream<T> {
        StoreStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter backed by a `watch::Receiver`.
pub struct StoreStream<T: Clone + Send + Sync + 'static> {
    inner: WatchStream<StoreState<T>>,
}

impl<T: Clone + Send + Sync + 'static> Stream for StoreStream<T> {
    type Item = StoreState<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_pending, assert_ready, task};

    #[test]
    fn begin_clears_error_and_raises_loading() {
        let cell: StateCell<u32> = StateCell::new();
        cell.tx.send_modify(|s| s.error = Some("old".into()));

        let op = cell.begin();
        let state = cell.snapshot();
        assert!(state.loading);
        assert_eq!(state.error, None);

        op.settle(|s| s.data = 7);
        let state = cell.snapshot();
        assert!(!state.loading);
        assert_eq!(state.data, 7);
    }

    #[test]
    fn loading_held_until_last_overlapping_operation_settles() {
        let cell: StateCell<u32> = StateCell::new();
        let first = cell.begin();
        let second = cell.begin();

        first.settle(|s| s.data = 1);
        assert!(cell.snapshot().loading);

        second.settle(|s| s.error = Some("boom".into()));
        let state = cell.snapshot();
        assert!(!state.loading);
        assert_eq!(state.data, 1);
        assert_eq!(state.error.as_deref(), Some("boom"));
    }

    #[test]
    fn dropped_operation_releases_loading() {
        let cell: StateCell<u32> = StateCell::new();
        {
            let _op = cell.begin();
            assert!(cell.snapshot().loading);
        }
        assert!(!cell.snapshot().loading);
    }

    #[test]
    fn watch_wakes_on_begin_and_settle() {
        let cell: StateCell<u32> = StateCell::new();
        let mut watch = StoreWatch::new(cell.subscribe());

        {
            let mut changed = task::spawn(watch.changed());
            assert_pending!(changed.poll());

            let op = cell.begin();
            assert!(changed.is_woken());
            let state = assert_ready!(changed.poll());
            assert!(state.is_some_and(|s| s.loading));

            op.settle(|s| s.data = 3);
        }

        let mut changed = task::spawn(watch.changed());
        let state = assert_ready!(changed.poll());
        assert!(state.is_some_and(|s| !s.loading && s.data == 3));
    }

    #[test]
    fn action_result_from_response() {
        let ok: Result<ApiResponse<()>, Error> = Ok(ApiResponse {
            success: true,
            data: None,
            message: None,
        });
        assert_eq!(
            ActionResult::from_response(ok, "done", "failed"),
            ActionResult::ok("done")
        );

        let rejected: Result<ApiResponse<()>, Error> = Ok(ApiResponse {
            success: false,
            data: None,
            message: Some("nope".into()),
        });
        assert_eq!(
            ActionResult::from_response(rejected, "done", "failed"),
            ActionResult::failed("nope")
        );

        let err: Result<ApiResponse<()>, Error> = Err(Error::NotFound);
        assert_eq!(
            ActionResult::from_response(err, "done", "failed"),
            ActionResult::failed("requested resource not found")
        );
    }
}
