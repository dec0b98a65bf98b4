//! External-future adoption policy.
//!
//! Tracks the outcome of a future the caller created elsewhere; the
//! tracker never decides when work starts, it only observes. Handing in a
//! replacement future with [`readopt`](AdoptedTracker::readopt) fully
//! resets the record, with the same unguarded-overlap caveat as the
//! immediate policy: if completions from two adopted futures overlap, the
//! last one to land wins.

use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::watch;

use crate::cell::TrackerCell;
use crate::error::TrackerError;
use crate::state::OperationState;

pub struct AdoptedTracker<T, E> {
    cell: Arc<TrackerCell<T, E>>,
}

impl<T, E> AdoptedTracker<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    /// Create the tracker and begin observing `fut`.
    ///
    /// Must be called from within a tokio runtime context.
    pub fn adopt<Fut>(fut: Fut) -> Self
    where
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let tracker = AdoptedTracker {
            cell: TrackerCell::new(),
        };
        // A freshly created cell is always active, so this cannot fail.
        let _ = tracker.readopt(fut);
        tracker
    }

    /// Switch to a new external future, resetting the record to `Running`
    /// with value and error cleared.
    pub fn readopt<Fut>(&self, fut: Fut) -> Result<(), TrackerError>
    where
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        self.cell.begin_unguarded()?;
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
    /// adoptions fail. Also happens automatically on drop.
    pub fn detach(&self) {
        self.cell.detach();
    }
}

impl<T, E> Drop for AdoptedTracker<T, E> {
    fn drop(&mut self) {
        self.cell.detach();
    }
}
