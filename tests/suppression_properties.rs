//! Property-based tests for stale-response suppression.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use futures::FutureExt;
use optrack::deferred::DeferredTracker;
use optrack::generation::GenerationGuard;
use optrack::stage::Stage;
use proptest::prelude::*;
use tokio::sync::oneshot;

/// For any number of overlapping runs and any completion order, the only
/// value that ever becomes visible is the one produced by the last run to
/// start.
#[test]
fn test_last_started_wins_for_any_completion_order() {
    let mut runner = proptest::test_runner::TestRunner::default();

    let interleavings = (2usize..6)
        .prop_flat_map(|n| (Just(n), Just((0..n).collect::<Vec<usize>>()).prop_shuffle()));

    runner
        .run(&interleavings, |(n, completion_order)| {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();

            rt.block_on(async move {
                let queue = Arc::new(Mutex::new(VecDeque::new()));
                let mut senders = Vec::with_capacity(n);
                for _ in 0..n {
                    let (tx, rx) = oneshot::channel::<Result<usize, String>>();
                    senders.push(Some(tx));
                    queue.lock().unwrap().push_back(rx);
                }

                let tracker = DeferredTracker::new({
                    let queue = Arc::clone(&queue);
                    move || {
                        let rx = queue.lock().unwrap().pop_front().unwrap();
                        async move { rx.await.unwrap_or(Err("gate dropped".to_string())) }.boxed()
                    }
                });

                // All runs start before anything completes; run i will
                // produce the value i.
                for _ in 0..n {
                    tracker.run().unwrap();
                }

                for i in completion_order {
                    senders[i].take().unwrap().send(Ok(i)).ok();
                    for _ in 0..8 {
                        tokio::task::yield_now().await;
                    }
                    // Until the last-started run completes, nothing commits;
                    // once it has, its value is the only one visible.
                    let state = tracker.snapshot();
                    if state.stage() == Stage::Success {
                        assert_eq!(state.value(), Some(&(n - 1)));
                    } else {
                        assert_eq!(state.stage(), Stage::Running);
                        assert!(state.value().is_none());
                    }
                }

                let state = tracker.snapshot();
                assert_eq!(state.stage(), Stage::Success);
                assert_eq!(state.value(), Some(&(n - 1)));
                assert!(state.error().is_none());
            });

            Ok(())
        })
        .unwrap();
}

/// Only the most recently minted token is ever current, no matter how many
/// invocations have been started.
#[test]
fn test_only_last_minted_token_is_current() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&(1usize..64), |n| {
            let mut guard = GenerationGuard::new();
            let tokens: Vec<_> = (0..n).map(|_| guard.begin_invocation()).collect();

            for token in &tokens[..n - 1] {
                assert!(!guard.is_current(*token));
            }
            assert!(guard.is_current(tokens[n - 1]));

            Ok(())
        })
        .unwrap();
}
