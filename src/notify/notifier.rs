//! # Versioned, edge-triggered wait primitive.
//!
//! [`Notifier`] lets any number of producers announce "something changed" and any
//! number of consumers block until the **next** occurrence — never a past one.
//!
//! ## Architecture
//! ```text
//! Producers (many):                          Consumers (many):
//!   signal() ──► version += 1 ──► Notify ──► wait_handle() captures version
//!                 (atomic)       broadcast        │
//!                                                 ▼
//!                                    wait(): loop {
//!                                      register Notify future
//!                                      version moved? ── yes ──► return
//!                                      await wakeup
//!                                    }
//! ```
//!
//! ## Rules
//! - A handle is unsignaled with respect to every signal that fires **after**
//!   it was acquired, regardless of how many signals fired before. Acquiring a
//!   handle after a stale signal therefore never yields a permanently-signaled
//!   handle, and a waiter never busy-loops on an old event.
//! - A signal that fires between handle acquisition and `wait()` is never
//!   missed: `wait()` registers its wakeup **before** re-checking the version.
//! - `signal()` never blocks and is observably idempotent — once a handle sees
//!   a version ahead of its own, further signals change nothing for it.
//! - Dropping a handle leaks nothing; there is no per-waiter registration to
//!   clean up, so abandoning a wait is a legitimate cancellation path.
//! - No timeout is built in; callers wrap `wait()` in `tokio::time::timeout`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

#[derive(Debug, Default)]
struct Inner {
    version: AtomicU64,
    notify: Notify,
}

/// Broadcast signal source with edge-triggered semantics.
///
/// Cheap to clone (internally holds an `Arc`). Each [`signal`](Notifier::signal)
/// advances an atomic version and wakes every task currently parked in
/// [`WaitHandle::wait`]; each [`wait_handle`](Notifier::wait_handle) captures
/// the version at acquisition time.
#[derive(Clone, Debug, Default)]
pub struct Notifier {
    inner: Arc<Inner>,
}

impl Notifier {
    /// Creates a new, unsignaled notifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a handle representing the current unsignaled state.
    ///
    /// The handle only resolves for signals that fire after this call. If a
    /// previous signal already fired and was never "reset", the returned handle
    /// is still fresh — the version capture makes rotation implicit.
    pub fn wait_handle(&self) -> WaitHandle {
        WaitHandle {
            inner: self.inner.clone(),
            seen: self.inner.version.load(Ordering::Acquire),
        }
    }

    /// Wakes every task currently blocked on a handle from this notifier.
    ///
    /// Never blocks. Signaling with no waiters is fine: handles acquired before
    /// this call will observe the version move and return immediately from
    /// `wait()`.
    pub fn signal(&self) {
        self.inner.version.fetch_add(1, Ordering::AcqRel);
        self.inner.notify.notify_waiters();
    }
}

/// A capture of a [`Notifier`]'s state at acquisition time.
///
/// Obtained via [`Notifier::wait_handle`]. The handle is single-use:
/// [`wait`](WaitHandle::wait) consumes it, so observing a second transition
/// requires acquiring a fresh handle — this is what makes the protocol
/// edge-triggered rather than level-triggered.
#[derive(Debug)]
pub struct WaitHandle {
    inner: Arc<Inner>,
    seen: u64,
}

impl WaitHandle {
    /// Returns `true` if a signal has fired since this handle was acquired.
    pub fn is_signaled(&self) -> bool {
        self.inner.version.load(Ordering::Acquire) != self.seen
    }

    /// Blocks until the next signal after this handle was acquired.
    ///
    /// Returns immediately if a signal already fired since acquisition.
    /// The wakeup is registered before the version re-check, so a signal
    /// landing between the two is observed on the same iteration and cannot
    /// be lost.
    pub async fn wait(self) {
        loop {
            let notified = self.inner.notify.notified();
            if self.is_signaled() {
                return;
            }
            notified.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::timeout;

    use super::*;

    #[tokio::test]
    async fn signal_after_handle_is_not_missed() {
        let notifier = Notifier::new();
        let handle = notifier.wait_handle();

        let waiter = tokio::spawn(handle.wait());
        tokio::task::yield_now().await;
        notifier.signal();

        timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should wake after signal")
            .expect("waiter task should not panic");
    }

    #[tokio::test]
    async fn signal_before_handle_resolves_immediately() {
        let notifier = Notifier::new();
        notifier.signal();

        let handle = notifier.wait_handle();
        let late = notifier.wait_handle();
        notifier.signal();

        assert!(handle.is_signaled());
        timeout(Duration::from_millis(100), handle.wait())
            .await
            .expect("signaled handle must not block");
        timeout(Duration::from_millis(100), late.wait())
            .await
            .expect("late handle sees the second signal");
    }

    #[tokio::test]
    async fn handle_after_stale_signal_is_fresh() {
        let notifier = Notifier::new();
        notifier.signal();

        // Acquired after the signal: must not be permanently signaled.
        let handle = notifier.wait_handle();
        assert!(!handle.is_signaled());

        let timed_out = timeout(Duration::from_millis(50), handle.wait())
            .await
            .is_err();
        assert!(timed_out, "fresh handle must block until the next signal");
    }

    #[tokio::test]
    async fn signal_is_idempotent_per_handle() {
        let notifier = Notifier::new();
        let handle = notifier.wait_handle();

        notifier.signal();
        notifier.signal();
        notifier.signal();

        assert!(handle.is_signaled());
        timeout(Duration::from_millis(100), handle.wait())
            .await
            .expect("handle wakes exactly once regardless of signal count");
    }

    #[tokio::test]
    async fn many_waiters_all_wake() {
        let notifier = Notifier::new();
        let waiters: Vec<_> = (0..8)
            .map(|_| tokio::spawn(notifier.wait_handle().wait()))
            .collect();

        tokio::task::yield_now().await;
        notifier.signal();

        for waiter in waiters {
            timeout(Duration::from_secs(1), waiter)
                .await
                .expect("every parked waiter wakes on broadcast")
                .expect("waiter task should not panic");
        }
    }
}
