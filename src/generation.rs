//! Generation tokens for stale-response suppression.
//!
//! Every guarded invocation is tagged with a token minted from a
//! process-wide counter. When the invocation completes it compares its own
//! token against the tracker's current slot; a mismatch means a newer
//! invocation has started in the meantime and the completion must not
//! commit. Only equality is ever consulted, so the last invocation to
//! *start* always wins regardless of which one *completes* first.

use std::sync::atomic::{AtomicU64, Ordering};

static GENERATION_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Opaque invocation token. Unique per process lifetime; comparable only
/// for equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Generation(u64);

impl Generation {
    fn mint() -> Self {
        Generation(GENERATION_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// Current-token slot for one tracker instance.
#[derive(Debug, Default)]
pub struct GenerationGuard {
    current: Option<Generation>,
}

impl GenerationGuard {
    pub fn new() -> Self {
        GenerationGuard { current: None }
    }

    /// Mint a fresh token and store it as current.
    ///
    /// Supersedes any earlier token: in-flight invocations keep running,
    /// but [`is_current`](Self::is_current) will reject them at commit
    /// time.
    pub fn begin_invocation(&mut self) -> Generation {
        let token = Generation::mint();
        self.current = Some(token);
        token
    }

    /// Whether `token` still identifies the most recently started
    /// invocation. Pure query, no side effect.
    pub fn is_current(&self, token: Generation) -> bool {
        self.current == Some(token)
    }
}
