//! Tracker cell: the shared core behind every trigger policy.
//!
//! A cell binds one operation state record, one generation-token slot, and
//! one teardown flag to a logical operation source. A policy handle and
//! the invocation futures it spawns share the cell through an `Arc`; every
//! mutation happens under a single lock and each committed change is
//! published to observers through a watch channel.

use std::sync::Arc;

use futures::future::BoxFuture;
use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{debug, trace};

use crate::error::TrackerError;
use crate::generation::{Generation, GenerationGuard};
use crate::state::OperationState;

pub(crate) struct TrackerCell<T, E> {
    inner: Mutex<CellInner<T, E>>,
    observers: watch::Sender<OperationState<T, E>>,
}

struct CellInner<T, E> {
    record: OperationState<T, E>,
    guard: GenerationGuard,
    active: bool,
}

impl<T, E> TrackerCell<T, E> {
    pub(crate) fn new() -> Arc<Self> {
        let (observers, _) = watch::channel(OperationState::not_run());
        Arc::new(TrackerCell {
            inner: Mutex::new(CellInner {
                record: OperationState::not_run(),
                guard: GenerationGuard::new(),
                active: true,
            }),
            observers,
        })
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<OperationState<T, E>> {
        self.observers.subscribe()
    }

    /// Stop accepting commits. In-flight completions become no-ops; new
    /// invocations fail with [`TrackerError::Detached`].
    pub(crate) fn detach(&self) {
        let mut inner = self.inner.lock();
        if inner.active {
            inner.active = false;
            trace!("tracker detached");
        }
    }
}

impl<T: Clone, E: Clone> TrackerCell<T, E> {
    /// Clone of the current record. Reading never mutates.
    pub(crate) fn snapshot(&self) -> OperationState<T, E> {
        self.inner.lock().record.clone()
    }

    /// Start a guarded invocation: reset the record per policy and mint a
    /// generation token for the completion to present at commit time.
    pub(crate) fn begin_guarded(
        &self,
        keep_value: bool,
    ) -> Result<Generation, TrackerError> {
        let mut inner = self.inner.lock();
        if !inner.active {
            return Err(TrackerError::Detached);
        }
        inner.record.begin_invocation(keep_value);
        let token = inner.guard.begin_invocation();
        debug!(?token, stage = %inner.record.stage(), "invocation started");
        let snapshot = inner.record.clone();
        drop(inner);
        self.publish(snapshot);
        Ok(token)
    }

    /// Start an unguarded invocation: full record reset, no token. The
    /// eventual completion commits unconditionally (teardown aside), so
    /// overlapping unguarded invocations race; last completion wins.
    pub(crate) fn begin_unguarded(&self) -> Result<(), TrackerError> {
        let mut inner = self.inner.lock();
        if !inner.active {
            return Err(TrackerError::Detached);
        }
        inner.record.begin_invocation(false);
        debug!(stage = %inner.record.stage(), "invocation started (unguarded)");
        let snapshot = inner.record.clone();
        drop(inner);
        self.publish(snapshot);
        Ok(())
    }

    pub(crate) fn commit_success(&self, token: Option<Generation>, value: T) {
        let mut inner = self.inner.lock();
        if !inner.active {
            trace!("completion after detach ignored");
            return;
        }
        if let Some(token) = token {
            if !inner.guard.is_current(token) {
                trace!(?token, "stale success suppressed");
                return;
            }
        }
        inner.record.commit_success(value);
        debug!(stage = %inner.record.stage(), "invocation committed");
        let snapshot = inner.record.clone();
        drop(inner);
        self.publish(snapshot);
    }

    pub(crate) fn commit_error(
        &self,
        token: Option<Generation>,
        error: E,
        clear_value: bool,
    ) {
        let mut inner = self.inner.lock();
        if !inner.active {
            trace!("completion after detach ignored");
            return;
        }
        if let Some(token) = token {
            if !inner.guard.is_current(token) {
                trace!(?token, "stale error suppressed");
                return;
            }
        }
        inner.record.commit_error(error, clear_value);
        debug!(stage = %inner.record.stage(), "invocation committed");
        let snapshot = inner.record.clone();
        drop(inner);
        self.publish(snapshot);
    }

    fn publish(&self, snapshot: OperationState<T, E>) {
        self.observers.send_replace(snapshot);
    }
}

impl<T, E> TrackerCell<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    /// Drive `fut` to completion on the runtime and commit its outcome.
    ///
    /// Must be called from within a tokio runtime context.
    pub(crate) fn launch(
        self: &Arc<Self>,
        token: Option<Generation>,
        fut: BoxFuture<'static, Result<T, E>>,
        clear_value_on_error: bool,
    ) {
        let cell = Arc::clone(self);
        tokio::spawn(async move {
            match fut.await {
                Ok(value) => cell.commit_success(token, value),
                Err(error) => cell.commit_error(token, error, clear_value_on_error),
            }
        });
    }
}
