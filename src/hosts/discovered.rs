//! # DiscoveredHosts: snapshot diffing, blacklist bookkeeping, change waits.
//!
//! [`DiscoveredHosts`] pairs the latest [`Snapshot`] from a
//! [`HostDiscovery`](crate::HostDiscovery) source with a cumulative map of
//! per-host state, and is the only component allowed to mutate either.
//!
//! ## Architecture
//! ```text
//! polling loop ──► refresh() ──► source.find_available_hosts_and_slots()
//!                     │                    │
//!                     │            Snapshot (hosts, slots)
//!                     ▼                    ▼
//!              ┌─ compare by full equality with stored snapshot ─┐
//!              │  equal     → false (nothing to re-plan)         │
//!              │  different → swap pair atomically, true         │
//!              └─────────────────────────────────────────────────┘
//!
//! decision loops ──► available_hosts() / available_slot_count() / filter_hosts()
//! failure reports ──► blacklist(host) ──► HostState.blacklist() ──► Notifier.signal()
//! blocked callers ──► wait_for_change(host) ──► WaitHandle
//! ```
//!
//! ## Rules
//! - The snapshot is replaced **as a pair** under a write lock: readers observe
//!   the fully-old or fully-new pair, never a mix.
//! - The state map only grows (keys are never removed) and its values only
//!   mutate monotonically, so an `Arc<HostState>` handed out once stays valid
//!   and comparable forever.
//! - A failed discovery call leaves the stored snapshot untouched and is
//!   propagated as an error — it is never conflated with `Ok(false)`.
//! - Host state for hosts that left the snapshot is retained. Their slot
//!   contribution to `blacklisted_slot_count()` is whatever the current
//!   mapping says; absent entries count as 0.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::discovery::HostDiscoveryRef;
use crate::error::{DiscoveryError, HostError};
use crate::hosts::{HostState, Snapshot};
use crate::notify::WaitHandle;

/// Tracks the latest discovery snapshot and cumulative per-host state.
///
/// Constructed once per job with a chosen [`HostDiscovery`](crate::HostDiscovery)
/// source and shared
/// (behind an `Arc`) between the polling loop, decision loops, and failure
/// reporters. No explicit teardown is needed; all state is in memory.
pub struct DiscoveredHosts {
    source: HostDiscoveryRef,
    current: RwLock<Snapshot>,
    states: RwLock<HashMap<String, Arc<HostState>>>,
}

impl DiscoveredHosts {
    /// Creates a tracker with an empty snapshot and the given source.
    ///
    /// The first successful [`refresh`](DiscoveredHosts::refresh) populates the
    /// snapshot (and returns `true` unless the fleet is genuinely empty).
    pub fn new(source: HostDiscoveryRef) -> Self {
        Self {
            source,
            current: RwLock::new(Snapshot::default()),
            states: RwLock::new(HashMap::new()),
        }
    }

    /// Polls the discovery source and swaps in the new snapshot if it differs.
    ///
    /// Returns `Ok(true)` when the new snapshot differs from the stored one by
    /// set or mapping equality, `Ok(false)` when identical. On source failure
    /// the stored snapshot is left untouched and the error propagates — the
    /// caller can distinguish "no change" from "poll failed".
    ///
    /// The source call can block for the duration of an external program
    /// (`ScriptSource`); keep `refresh` off latency-sensitive paths.
    pub async fn refresh(&self) -> Result<bool, DiscoveryError> {
        let next = self.source.find_available_hosts_and_slots().await?;

        let mut current = self.current.write().await;
        if *current == next {
            return Ok(false);
        }
        debug!(hosts = next.len(), "host snapshot changed");
        *current = next;
        Ok(true)
    }

    /// Returns a clone of the current (hosts, slots) pair.
    ///
    /// The clone is taken under the read lock, so it is always a consistent
    /// pair even while a concurrent `refresh` is swapping.
    pub async fn snapshot(&self) -> Snapshot {
        self.current.read().await.clone()
    }

    /// Sum of slots over hosts that are in the current snapshot and not blacklisted.
    ///
    /// Hosts absent from the snapshot contribute nothing even if their state
    /// record predates removal.
    pub async fn available_slot_count(&self) -> u32 {
        let current = self.current.read().await;
        let states = self.states.read().await;
        current
            .hosts()
            .filter(|host| !is_blacklisted_in(&states, host))
            .filter_map(|host| current.slots_for(host))
            .sum()
    }

    /// Sum of slots over every blacklisted host ever seen.
    ///
    /// Drawn from the cumulative state map, not the current host set. Each
    /// host contributes its slot value in the current snapshot mapping; a
    /// blacklisted host that has since left the snapshot contributes 0.
    pub async fn blacklisted_slot_count(&self) -> u32 {
        let current = self.current.read().await;
        let states = self.states.read().await;
        states
            .iter()
            .filter(|(_, state)| state.is_blacklisted())
            .filter_map(|(host, _)| current.slots_for(host))
            .sum()
    }

    /// Returns the subsequence of `candidates` that are present in the current
    /// snapshot and not blacklisted.
    ///
    /// Relative order is preserved; duplicates in the input are preserved in
    /// the output.
    pub async fn filter_hosts<I, S>(&self, candidates: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let current = self.current.read().await;
        let states = self.states.read().await;
        candidates
            .into_iter()
            .map(Into::into)
            .filter(|host| current.contains(host) && !is_blacklisted_in(&states, host))
            .collect()
    }

    /// All usable hosts: the current snapshot set minus blacklisted hosts.
    ///
    /// Order is unspecified (it follows the set's iteration order).
    pub async fn available_hosts(&self) -> Vec<String> {
        let current = self.current.read().await;
        let states = self.states.read().await;
        current
            .hosts()
            .filter(|host| !is_blacklisted_in(&states, host))
            .map(str::to_owned)
            .collect()
    }

    /// Slot count for a host in the current snapshot mapping.
    ///
    /// Fails with [`HostError::UnknownHost`] for hosts outside the mapping;
    /// that is always a caller logic error, not a transient condition.
    pub async fn slots_for(&self, host: &str) -> Result<u32, HostError> {
        self.current
            .read()
            .await
            .slots_for(host)
            .ok_or_else(|| HostError::UnknownHost {
                host: host.to_string(),
            })
    }

    /// Marks a host unusable and wakes anything waiting on its state.
    ///
    /// Lazily creates the host's state record. Logs a warning on the first
    /// transition only; repeated calls are no-ops. The flag is set before the
    /// notifier fires, so a woken waiter always observes `is_blacklisted ==
    /// true`.
    pub async fn blacklist(&self, host: &str) {
        let state = self.state(host).await;
        if state.blacklist() {
            warn!(%host, "blacklisting failed host");
        }
    }

    /// Returns whether a host is blacklisted.
    ///
    /// Lazily creates the host's state record (defaulting to not-blacklisted),
    /// so the answer is stable and comparable across calls for hosts never
    /// seen by discovery.
    pub async fn is_blacklisted(&self, host: &str) -> bool {
        self.state(host).await.is_blacklisted()
    }

    /// Returns a wait handle for the host's next state change.
    ///
    /// Lazily creates the host's state record. The handle only resolves for
    /// changes after this call; see [`WaitHandle`] for the edge-triggered
    /// contract. Apply `tokio::time::timeout` externally for bounded waits.
    pub async fn wait_for_change(&self, host: &str) -> WaitHandle {
        self.state(host).await.wait_handle()
    }

    /// Fetches or lazily creates the state record for a host.
    ///
    /// Read-lock fast path for the common case; the write path re-checks via
    /// `entry` so two racing creators converge on one record.
    async fn state(&self, host: &str) -> Arc<HostState> {
        if let Some(state) = self.states.read().await.get(host) {
            return state.clone();
        }
        let mut states = self.states.write().await;
        states
            .entry(host.to_string())
            .or_insert_with(|| Arc::new(HostState::new()))
            .clone()
    }
}

fn is_blacklisted_in(states: &HashMap<String, Arc<HostState>>, host: &str) -> bool {
    states.get(host).is_some_and(|s| s.is_blacklisted())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::time::timeout;

    use crate::discovery::{FixedSource, HostDiscovery};

    use super::*;

    /// Source that fails every call; for refresh-failure coverage.
    struct BrokenSource;

    #[async_trait]
    impl HostDiscovery for BrokenSource {
        async fn find_available_hosts_and_slots(&self) -> Result<Snapshot, DiscoveryError> {
            Err(DiscoveryError::ScriptFailed {
                script: "/nonexistent/discover.sh".into(),
                code: Some(1),
            })
        }
    }

    /// Source that succeeds once, then fails; for atomicity coverage.
    struct FlakySource {
        calls: AtomicUsize,
        first: Snapshot,
    }

    #[async_trait]
    impl HostDiscovery for FlakySource {
        async fn find_available_hosts_and_slots(&self) -> Result<Snapshot, DiscoveryError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok(self.first.clone())
            } else {
                Err(DiscoveryError::ScriptFailed {
                    script: "/nonexistent/discover.sh".into(),
                    code: None,
                })
            }
        }
    }

    fn tracker_with(pairs: &[(&str, u32)]) -> (DiscoveredHosts, Arc<FixedSource>) {
        let source = Arc::new(FixedSource::new(Snapshot::from_pairs(
            pairs.iter().map(|&(h, n)| (h, n)),
        )));
        (DiscoveredHosts::new(source.clone()), source)
    }

    #[tokio::test]
    async fn refresh_reports_change_then_steady_state() {
        let (hosts, source) = tracker_with(&[("a", 4), ("b", 2)]);

        assert!(hosts.refresh().await.unwrap());
        assert!(!hosts.refresh().await.unwrap());

        // Slot-value change alone is a change.
        source.set(Snapshot::from_pairs([("a", 4), ("b", 3)]));
        assert!(hosts.refresh().await.unwrap());

        // Set change alone is a change.
        source.set(Snapshot::from_pairs([("a", 4)]));
        assert!(hosts.refresh().await.unwrap());
        assert!(!hosts.refresh().await.unwrap());
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous_snapshot() {
        let source = Arc::new(FlakySource {
            calls: AtomicUsize::new(0),
            first: Snapshot::from_pairs([("a", 4), ("b", 2)]),
        });
        let hosts = DiscoveredHosts::new(source);

        assert!(hosts.refresh().await.unwrap());

        let err = hosts.refresh().await.unwrap_err();
        assert_eq!(err.as_label(), "discovery_script_failed");

        // Pre-failure state still fully visible.
        let mut available = hosts.available_hosts().await;
        available.sort_unstable();
        assert_eq!(available, ["a", "b"]);
        assert_eq!(hosts.available_slot_count().await, 6);
    }

    #[tokio::test]
    async fn refresh_on_broken_source_never_false() {
        let hosts = DiscoveredHosts::new(Arc::new(BrokenSource));
        assert!(hosts.refresh().await.is_err());
        assert!(hosts.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn filtering_excludes_blacklisted_and_absent() {
        let (hosts, _) = tracker_with(&[("a", 4), ("b", 2)]);
        hosts.refresh().await.unwrap();
        hosts.blacklist("b").await;

        assert_eq!(hosts.available_hosts().await, ["a"]);
        assert_eq!(hosts.available_slot_count().await, 4);

        // Order and duplicates preserved; absent host "c" dropped.
        let filtered = hosts.filter_hosts(["c", "a", "b", "a"]).await;
        assert_eq!(filtered, ["a", "a"]);
    }

    #[tokio::test]
    async fn blacklisted_slot_accounting() {
        let (hosts, _) = tracker_with(&[("a", 4), ("b", 2)]);
        hosts.refresh().await.unwrap();

        hosts.blacklist("b").await;
        assert_eq!(hosts.available_slot_count().await, 4);
        assert_eq!(hosts.blacklisted_slot_count().await, 2);

        // Idempotent.
        hosts.blacklist("b").await;
        assert_eq!(hosts.blacklisted_slot_count().await, 2);
    }

    #[tokio::test]
    async fn removed_blacklisted_host_contributes_zero() {
        let (hosts, source) = tracker_with(&[("a", 4), ("b", 2)]);
        hosts.refresh().await.unwrap();
        hosts.blacklist("b").await;

        source.set(Snapshot::from_pairs([("a", 4)]));
        hosts.refresh().await.unwrap();

        // State survives removal, slot contribution does not.
        assert!(hosts.is_blacklisted("b").await);
        assert_eq!(hosts.blacklisted_slot_count().await, 0);
        assert_eq!(hosts.available_slot_count().await, 4);
    }

    #[tokio::test]
    async fn blacklist_survives_snapshot_churn() {
        let (hosts, source) = tracker_with(&[("a", 4), ("b", 2)]);
        hosts.refresh().await.unwrap();
        hosts.blacklist("b").await;

        // b leaves and comes back with new capacity; flag persists.
        source.set(Snapshot::from_pairs([("a", 4)]));
        hosts.refresh().await.unwrap();
        source.set(Snapshot::from_pairs([("a", 4), ("b", 8)]));
        hosts.refresh().await.unwrap();

        assert!(hosts.is_blacklisted("b").await);
        assert_eq!(hosts.available_hosts().await, ["a"]);
        assert_eq!(hosts.blacklisted_slot_count().await, 8);
    }

    #[tokio::test]
    async fn slots_for_unknown_host_is_an_error() {
        let (hosts, _) = tracker_with(&[("a", 4)]);
        hosts.refresh().await.unwrap();

        assert_eq!(hosts.slots_for("a").await.unwrap(), 4);
        let err = hosts.slots_for("ghost").await.unwrap_err();
        assert_eq!(err.as_label(), "unknown_host");
    }

    #[tokio::test]
    async fn is_blacklisted_defaults_false_for_unseen_hosts() {
        let (hosts, _) = tracker_with(&[("a", 4)]);
        assert!(!hosts.is_blacklisted("never-seen").await);
        // The lazy record is stable across calls.
        assert!(!hosts.is_blacklisted("never-seen").await);
    }

    #[tokio::test]
    async fn wait_for_change_wakes_on_blacklist() {
        let (hosts, _) = tracker_with(&[("a", 4), ("b", 2)]);
        let hosts = Arc::new(hosts);
        hosts.refresh().await.unwrap();

        let handle = hosts.wait_for_change("b").await;
        let hosts2 = hosts.clone();
        let waiter = tokio::spawn(async move {
            handle.wait().await;
            hosts2.is_blacklisted("b").await
        });
        tokio::task::yield_now().await;

        hosts.blacklist("b").await;

        let observed = timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter wakes once the host is blacklisted")
            .expect("waiter task should not panic");
        assert!(observed);
    }

    #[tokio::test]
    async fn wait_handle_taken_after_blacklist_is_fresh() {
        let (hosts, _) = tracker_with(&[("a", 4)]);
        hosts.refresh().await.unwrap();
        hosts.blacklist("a").await;

        // No further change is coming; this handle must not be pre-signaled.
        let handle = hosts.wait_for_change("a").await;
        assert!(!handle.is_signaled());
        assert!(timeout(Duration::from_millis(50), handle.wait())
            .await
            .is_err());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_readers_see_whole_pairs() {
        let (hosts, source) = tracker_with(&[("a", 1), ("b", 1)]);
        let hosts = Arc::new(hosts);
        hosts.refresh().await.unwrap();

        // Both snapshots keep hosts and slots internally consistent, so any
        // torn read would surface as a host with no slot entry.
        let reader = {
            let hosts = hosts.clone();
            tokio::spawn(async move {
                for _ in 0..200 {
                    let snap = hosts.snapshot().await;
                    for host in snap.hosts() {
                        assert!(
                            snap.slots_for(host).is_some(),
                            "snapshot pair must never be observed half-swapped"
                        );
                    }
                }
            })
        };

        for i in 0..100u32 {
            let snap = if i % 2 == 0 {
                Snapshot::from_pairs([("a", 1), ("b", 1)])
            } else {
                Snapshot::from_pairs([("c", 3), ("d", 5), ("e", 7)])
            };
            source.set(snap);
            hosts.refresh().await.unwrap();
        }

        reader.await.expect("reader task should not panic");
    }
}
