//! Error types for the operation tracking library.
//!
//! Operation failures themselves are opaque payloads stored on the
//! [`OperationState`](crate::state::OperationState) record and never pass
//! through this type. `TrackerError` only covers misuse of a tracker
//! handle.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TrackerError {
    /// The tracker was detached from its owner; new invocations can no
    /// longer be started. In-flight completions are silently discarded
    /// rather than reported through this error.
    #[error("tracker detached: no new invocations may be started")]
    Detached,
}
