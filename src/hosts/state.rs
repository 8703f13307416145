//! # Per-host mutable record: blacklist flag + change notifier.
//!
//! One [`HostState`] exists per host ever seen, owned by
//! [`DiscoveredHosts`](crate::DiscoveredHosts) for the lifetime of the job.
//! Entries are created lazily on first access and never removed, even if the
//! host later disappears from the snapshot.
//!
//! ## Rules
//! - The blacklist flag is **monotonic**: once set it stays set for the
//!   lifetime of this instance; there is no un-blacklist.
//! - Every operation is total; there are no failure modes at this layer.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::notify::{Notifier, WaitHandle};

/// Mutable per-host record: a monotonic blacklist flag and a [`Notifier`].
///
/// All mutation goes through atomics, so reads and failure reports from
/// different tasks need no lock around the record itself.
#[derive(Debug, Default)]
pub struct HostState {
    blacklisted: AtomicBool,
    notifier: Notifier,
}

impl HostState {
    /// Creates a fresh, non-blacklisted record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the host blacklisted and signals its notifier.
    ///
    /// Returns `true` only for the call that made the transition, so the owner
    /// can log the event exactly once. Repeated calls are no-ops apart from
    /// the (idempotent) signal.
    pub fn blacklist(&self) -> bool {
        let transitioned = self
            .blacklisted
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        self.notifier.signal();
        transitioned
    }

    /// Returns `true` if the host has been blacklisted.
    pub fn is_blacklisted(&self) -> bool {
        self.blacklisted.load(Ordering::Acquire)
    }

    /// Returns a fresh wait handle for this host's next state change.
    pub fn wait_handle(&self) -> WaitHandle {
        self.notifier.wait_handle()
    }
}
