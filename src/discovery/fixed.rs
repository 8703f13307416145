//! # Fixed host list source.
//!
//! [`FixedSource`] returns an explicitly configured [`Snapshot`] unchanged on
//! every call. The [`set`](FixedSource::set) mutator lets tests and tools
//! simulate hosts appearing, disappearing, or changing capacity between polls
//! without any external process.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::DiscoveryError;
use crate::hosts::Snapshot;

use super::source::HostDiscovery;

/// Discovery source backed by an explicitly configured snapshot.
///
/// The snapshot sits behind a `std::sync::Mutex` so `set` stays synchronous
/// and callable from non-async code; the lock is never held across an await.
#[derive(Debug, Default)]
pub struct FixedSource {
    snapshot: Mutex<Snapshot>,
}

impl FixedSource {
    /// Creates a source that will report the given snapshot.
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            snapshot: Mutex::new(snapshot),
        }
    }

    /// Replaces the reported snapshot; the next poll observes it whole.
    pub fn set(&self, snapshot: Snapshot) {
        // A poisoned lock still holds a whole Snapshot; recover it.
        let mut guard = self.snapshot.lock().unwrap_or_else(|e| e.into_inner());
        *guard = snapshot;
    }
}

#[async_trait]
impl HostDiscovery for FixedSource {
    async fn find_available_hosts_and_slots(&self) -> Result<Snapshot, DiscoveryError> {
        let guard = self.snapshot.lock().unwrap_or_else(|e| e.into_inner());
        Ok(guard.clone())
    }
}
