//! Screen-scoped async call tracking
//!
//! Every backend and provider call made on behalf of a screen runs through
//! [`SubscriptionLifecycle::track`]. Releasing the lifecycle resolves all
//! tracked calls at once, so no late completion can touch a screen that is
//! gone.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// The screen was torn down before the call completed
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("screen released before the call completed")]
pub struct Released;

/// Shared handle over the screen's pending request set
///
/// Clones share the same set.
#[derive(Debug, Clone, Default)]
pub struct SubscriptionLifecycle {
    token: CancellationToken,
    pending: Arc<AtomicUsize>,
}

struct PendingGuard<'a>(&'a AtomicUsize);

impl<'a> PendingGuard<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl SubscriptionLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `call` as a member of the pending set
    ///
    /// Returns `Err(Released)` if the lifecycle is released first; the call
    /// is then dropped without its result being observed.
    pub async fn track<F: Future>(&self, call: F) -> Result<F::Output, Released> {
        if self.token.is_cancelled() {
            return Err(Released);
        }

        let _pending = PendingGuard::enter(&self.pending);
        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(Released),
            output = call => Ok(output),
        }
    }

    /// Token cancelled together with the lifecycle
    pub fn child_token(&self) -> CancellationToken {
        self.token.child_token()
    }

    /// Number of tracked calls still in flight
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    pub fn is_released(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Release every pending call; later calls are refused
    pub fn release_all(&self) {
        if !self.token.is_cancelled() {
            debug!(pending = self.pending(), "releasing screen subscriptions");
            self.token.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::Notify;

    #[tokio::test]
    async fn test_track_passes_output_through() {
        let lifecycle = SubscriptionLifecycle::new();
        assert_eq!(lifecycle.track(async { 42 }).await, Ok(42));
        assert_eq!(lifecycle.pending(), 0);
    }

    #[tokio::test]
    async fn test_release_resolves_pending_calls() {
        let lifecycle = SubscriptionLifecycle::new();
        let never = Arc::new(Notify::new());

        let first = {
            let lifecycle = lifecycle.clone();
            let never = never.clone();
            tokio::spawn(async move { lifecycle.track(async move { never.notified().await }).await })
        };
        let second = {
            let lifecycle = lifecycle.clone();
            tokio::spawn(async move { lifecycle.track(std::future::pending::<()>()).await })
        };

        while lifecycle.pending() < 2 {
            tokio::task::yield_now().await;
        }
        lifecycle.release_all();

        assert_eq!(first.await.unwrap(), Err(Released));
        assert_eq!(second.await.unwrap(), Err(Released));
        assert_eq!(lifecycle.pending(), 0);
    }

    #[tokio::test]
    async fn test_released_lifecycle_refuses_new_calls() {
        let lifecycle = SubscriptionLifecycle::new();
        lifecycle.release_all();

        assert!(lifecycle.is_released());
        assert_eq!(lifecycle.track(async { 1 }).await, Err(Released));
    }

    #[test]
    fn test_child_token_follows_release() {
        let lifecycle = SubscriptionLifecycle::new();
        let child = lifecycle.child_token();
        assert!(!child.is_cancelled());

        lifecycle.release_all();
        assert!(child.is_cancelled());
    }

    #[test]
    fn test_cancelling_child_leaves_lifecycle_alive() {
        let lifecycle = SubscriptionLifecycle::new();
        lifecycle.child_token().cancel();
        assert!(!lifecycle.is_released());
    }
}
