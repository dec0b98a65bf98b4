//! Immediate-run trigger policy.
//!
//! Starts its operation the moment the tracker is constructed and again
//! whenever the caller swaps in a new producing closure with
//! [`restart`](ImmediateTracker::restart). Overlapping invocations are not
//! guarded against each other: each restart fully resets the record, and
//! whichever completion lands last wins. Callers that can overlap
//! invocations and need last-started-wins semantics should use
//! [`DeferredTracker`](crate::deferred::DeferredTracker) instead.

use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::watch;

use crate::cell::TrackerCell;
use crate::error::TrackerError;
use crate::state::OperationState;

pub struct ImmediateTracker<T, E> {
    cell: Arc<TrackerCell<T, E>>,
}

impl<T, E> ImmediateTracker<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    /// Create the tracker and start the first invocation immediately.
    ///
    /// Must be called from within a tokio runtime context.
    pub fn spawn<F, Fut>(op: F) -> Self
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let tracker = ImmediateTracker {
            cell: TrackerCell::new(),
        };
        // A freshly created cell is always active, so this cannot fail.
        let _ = tracker.restart(op);
        tracker
    }

    /// Swap in a new producing closure and re-run.
    ///
    /// This is the trigger for "the operation identity changed": the record
    /// is fully reset (value and error cleared, stage back to `Running`)
    /// before the new invocation starts.
    pub fn restart<F, Fut>(&self, op: F) -> Result<(), TrackerError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        self.cell.begin_unguarded()?;
        let fut = op();
        self.cell.launch(None, fut.boxed(), false);
        Ok(())
    }

    /// Current state record. Reading never mutates.
    pub fn snapshot(&self) -> OperationState<T, E> {
        self.cell.snapshot()
    }

    /// Observe state changes. The receiver holds the latest committed
    /// record; each commit wakes waiting observers.
    pub fn subscribe(&self) -> watch::Receiver<OperationState<T, E>> {
        self.cell.subscribe()
    }

    /// Stop tracking: in-flight completions become no-ops and further
    /// restarts fail. Also happens automatically on drop.
    pub fn detach(&self) {
        self.cell.detach();
    }
}

impl<T, E> Drop for ImmediateTracker<T, E> {
    fn drop(&mut self) {
        self.cell.detach();
    }
}
