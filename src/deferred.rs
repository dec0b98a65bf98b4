//! Deferred-run policy with stale-response suppression.
//!
//! Nothing runs until the caller invokes [`run`](DeferredTracker::run).
//! Every run mints a generation token; completions whose token is no
//! longer current are dropped without touching the record, so overlapping
//! runs always resolve to the most recently started one. This is the
//! "latest input wins" policy: an earlier, slower response can never
//! overwrite a later, faster one.

use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::cell::TrackerCell;
use crate::error::TrackerError;
use crate::state::OperationState;

/// Options for the deferred policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeferredConfig {
    /// Retain the previous value while a refresh runs. While a retained
    /// value is present the `Running` stage transition is skipped, so a
    /// refresh of already-loaded data does not flicker back to a loading
    /// state. The error is still cleared at every run start, and a failed
    /// refresh drops the retained value.
    #[serde(default)]
    pub keep_last_value: bool,
}

pub struct DeferredTracker<T, E, F> {
    cell: Arc<TrackerCell<T, E>>,
    op: F,
    config: DeferredConfig,
}

impl<T, E, F, Fut> DeferredTracker<T, E, F>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
{
    /// Create a tracker around `op` without starting anything. The record
    /// stays `NotRun` until the first [`run`](Self::run).
    pub fn new(op: F) -> Self {
        Self::with_config(op, DeferredConfig::default())
    }

    pub fn with_config(op: F, config: DeferredConfig) -> Self {
        DeferredTracker {
            cell: TrackerCell::new(),
            op,
            config,
        }
    }

    /// Start a new invocation.
    ///
    /// Safe to call repeatedly and concurrently: each call supersedes any
    /// in-flight invocation, whose eventual completion is then silently
    /// discarded. The record is reset synchronously (error cleared, value
    /// cleared unless `keep_last_value`) before the operation is invoked.
    ///
    /// Must be called from within a tokio runtime context.
    pub fn run(&self) -> Result<(), TrackerError> {
        let token = self.cell.begin_guarded(self.config.keep_last_value)?;
        let fut = (self.op)();
        self.cell.launch(Some(token), fut.boxed(), true);
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

    pub fn config(&self) -> DeferredConfig {
        self.config
    }

    /// Stop tracking: in-flight completions become no-ops and further runs
    /// fail. Also happens automatically on drop.
    pub fn detach(&self) {
        self.cell.detach();
    }
}

impl<T, E, F> Drop for DeferredTracker<T, E, F> {
    fn drop(&mut self) {
        self.cell.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults_to_clearing_values() {
        assert!(!DeferredConfig::default().keep_last_value);
    }

    #[test]
    fn test_config_roundtrips_through_serde() {
        let config = DeferredConfig {
            keep_last_value: true,
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(json, r#"{"keep_last_value":true}"#);
        let back: DeferredConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
