//! Optrack: Observable Asynchronous Operation State
//!
//! Gives callers a synchronous, observable view over the lifecycle of
//! asynchronous operations: each tracker exposes a snapshot of stage,
//! value, and error, and guarantees that when invocations overlap, only
//! the most recently started one can commit its result (stale-response
//! suppression).
//!
//! Three trigger policies are provided:
//!
//! - [`immediate::ImmediateTracker`] starts its operation on construction
//!   and restarts when the producing closure is swapped;
//! - [`adopted::AdoptedTracker`] observes a future the caller created
//!   elsewhere;
//! - [`deferred::DeferredTracker`] runs only on an explicit `run()` call
//!   and is the policy that carries the generation-token guard.
//!
//! All policies spawn their invocation futures on the ambient tokio
//! runtime and publish committed state through a watch channel.

pub mod adopted;
mod cell;
pub mod deferred;
pub mod error;
pub mod generation;
pub mod immediate;
pub mod stage;
pub mod state;
