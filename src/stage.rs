//! Operation lifecycle stages.
//!
//! The vocabulary shared by every trigger policy: an operation starts in
//! `NotRun`, moves to `Running` once an invocation begins, and ends in
//! `Success` or `Error`. Transitions are monotonic within one invocation;
//! a new invocation may reset the stage back to `Running`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle stage of a tracked asynchronous operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// No invocation has started yet.
    NotRun,
    /// An invocation is in flight.
    Running,
    /// The most recent committed invocation failed.
    Error,
    /// The most recent committed invocation succeeded.
    Success,
}

impl Stage {
    /// Whether an invocation has reached a final outcome.
    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Error | Stage::Success)
    }

    /// Whether an invocation is currently in flight.
    pub fn is_running(self) -> bool {
        matches!(self, Stage::Running)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::NotRun => "not_run",
            Stage::Running => "running",
            Stage::Error => "error",
            Stage::Success => "success",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
