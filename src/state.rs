//! Operation State Record
//!
//! The observable snapshot for one tracked operation: the current [`Stage`]
//! plus the optional value and error from the most recent committed
//! invocation. Observers receive clones; only the owning tracker mutates
//! the record, through the transition methods here.

use crate::stage::Stage;

/// Snapshot of one tracked operation.
///
/// Invariants:
/// - `stage == Success` implies `value` is present and `error` is absent.
/// - `stage == Error` implies `error` is present; whether `value` survives
///   is up to the trigger policy that committed the error.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationState<T, E> {
    stage: Stage,
    value: Option<T>,
    error: Option<E>,
}

impl<T, E> OperationState<T, E> {
    /// Record for an operation that has never been invoked.
    pub fn not_run() -> Self {
        OperationState {
            stage: Stage::NotRun,
            value: None,
            error: None,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Value from the most recent committed success (or a retained value
    /// while a refresh is in flight, for policies that keep it).
    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Failure from the most recent committed error. Opaque to the tracker;
    /// stored exactly as the operation rejected with.
    pub fn error(&self) -> Option<&E> {
        self.error.as_ref()
    }

    pub fn is_terminal(&self) -> bool {
        self.stage.is_terminal()
    }

    pub fn is_running(&self) -> bool {
        self.stage.is_running()
    }

    /// Start a new invocation: clear the error, clear the value unless the
    /// policy retains it, and enter `Running`. When a retained value is
    /// present the stage is left untouched, so a refresh of already-loaded
    /// data never flickers back through `Running`.
    pub(crate) fn begin_invocation(&mut self, keep_value: bool) {
        self.error = None;
        if !keep_value {
            self.value = None;
        }
        if self.value.is_none() {
            self.stage = Stage::Running;
        }
    }

    /// Commit a successful completion.
    pub(crate) fn commit_success(&mut self, value: T) {
        self.stage = Stage::Success;
        self.value = Some(value);
        self.error = None;
    }

    /// Commit a failed completion. `clear_value` drops any retained value
    /// along with it.
    pub(crate) fn commit_error(&mut self, error: E, clear_value: bool) {
        self.stage = Stage::Error;
        self.error = Some(error);
        if clear_value {
            self.value = None;
        }
    }
}

impl<T, E> Default for OperationState<T, E> {
    fn default() -> Self {
        Self::not_run()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type State = OperationState<u32, String>;

    #[test]
    fn test_not_run_is_empty() {
        let state = State::not_run();
        assert_eq!(state.stage(), Stage::NotRun);
        assert!(state.value().is_none());
        assert!(state.error().is_none());
    }

    #[test]
    fn test_begin_clears_value_and_error() {
        let mut state = State::not_run();
        state.commit_success(7);
        state.begin_invocation(false);
        assert_eq!(state.stage(), Stage::Running);
        assert!(state.value().is_none());
        assert!(state.error().is_none());
    }

    #[test]
    fn test_begin_with_retained_value_keeps_stage() {
        let mut state = State::not_run();
        state.commit_success(7);
        state.begin_invocation(true);
        // No flicker back through Running while the old value is visible.
        assert_eq!(state.stage(), Stage::Success);
        assert_eq!(state.value(), Some(&7));
        assert!(state.error().is_none());
    }

    #[test]
    fn test_begin_with_keep_but_no_value_runs() {
        let mut state = State::not_run();
        state.begin_invocation(true);
        assert_eq!(state.stage(), Stage::Running);
    }

    #[test]
    fn test_begin_after_error_clears_error_even_when_keeping_value() {
        let mut state = State::not_run();
        state.commit_error("boom".to_string(), false);
        state.begin_invocation(true);
        assert!(state.error().is_none());
    }

    #[test]
    fn test_success_invariant() {
        let mut state = State::not_run();
        state.commit_error("boom".to_string(), true);
        state.commit_success(42);
        assert_eq!(state.stage(), Stage::Success);
        assert_eq!(state.value(), Some(&42));
        assert!(state.error().is_none());
    }

    #[test]
    fn test_error_commit_optionally_clears_value() {
        let mut state = State::not_run();
        state.commit_success(42);
        state.commit_error("boom".to_string(), false);
        assert_eq!(state.stage(), Stage::Error);
        assert_eq!(state.value(), Some(&42));

        state.commit_success(42);
        state.commit_error("boom".to_string(), true);
        assert!(state.value().is_none());
    }
}
