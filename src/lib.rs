//! # hostvisor
//!
//! **Hostvisor** tracks live membership and per-host health for a fleet of
//! worker hosts participating in an elastic distributed job.
//!
//! It obtains authoritative snapshots of available hosts and their slot
//! capacity from a pluggable discovery source, diffs them to decide whether
//! anything relevant changed, keeps a monotonic per-host blacklist flag that
//! survives membership churn, and lets any number of callers block until a
//! specific host's state next changes — without missing or double-counting
//! transitions. The crate is designed as a building block for higher-level
//! orchestrators: launching workers, choosing when to blacklist, and running
//! the polling loop all live in the caller.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!               ┌────────────────────┐     ┌────────────────────┐
//!               │    ScriptSource    │     │    FixedSource     │
//!               │ (external program) │     │ (configured pair)  │
//!               └─────────┬──────────┘     └─────────┬──────────┘
//!                         └──── HostDiscovery ───────┘
//!                                    │
//!                 find_available_hosts_and_slots() → Snapshot
//!                                    ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  DiscoveredHosts                                                  │
//! │  - current: RwLock<Snapshot>     (replaced whole on refresh)      │
//! │  - states: RwLock<HashMap<Host, Arc<HostState>>>  (append-only)   │
//! └──────┬──────────────────┬──────────────────────────┬──────────────┘
//!        ▼                  ▼                          ▼
//!   refresh() → bool   available_hosts()         blacklist(host)
//!   (set/slot diff)    available_slot_count()         │
//!                      filter_hosts(...)              ▼
//!                      slots_for(host)     ┌────────────────────┐
//!                                          │ HostState          │
//!                                          │  - AtomicBool flag │
//!                                          │  - Notifier        │
//!                                          └─────────┬──────────┘
//!                                              signal() wakes
//!                                                    ▼
//!                                     wait_for_change(host) → WaitHandle
//! ```
//!
//! ### Control flow
//! ```text
//! loop (caller's polling task) {
//!   ├─► refresh()
//!   │     ├─ Err(DiscoveryError) ─► log, retry next interval
//!   │     ├─ Ok(false)           ─► nothing changed, sleep
//!   │     └─ Ok(true)            ─► re-derive worker layout from
//!   │                               available_hosts() / slots_for()
//!   └─► sleep(poll_interval)
//! }
//!
//! on worker failure (caller's monitoring task):
//!   blacklist(host) ─► flag set, warning logged once, waiters on
//!                      wait_for_change(host) wake
//! ```
//!
//! ## Features
//! | Area            | Description                                              | Key types / traits              |
//! |-----------------|----------------------------------------------------------|---------------------------------|
//! | **Discovery**   | Pluggable snapshot sources: external script, fixed list. | [`HostDiscovery`], [`ScriptSource`], [`FixedSource`] |
//! | **Membership**  | Snapshot diffing and filtered/aggregated fleet views.    | [`DiscoveredHosts`], [`Snapshot`] |
//! | **Health**      | Monotonic per-host blacklist with single-shot warning.   | [`HostState`]                   |
//! | **Waiting**     | Edge-triggered, miss-free per-host change notification.  | [`Notifier`], [`WaitHandle`]    |
//! | **Errors**      | Typed errors for discovery and host lookups.             | [`DiscoveryError`], [`HostError`] |
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use hostvisor::{DiscoveredHosts, FixedSource, Snapshot};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = Arc::new(FixedSource::new(Snapshot::from_pairs([
//!         ("worker-1", 4),
//!         ("worker-2", 2),
//!     ])));
//!     let hosts = DiscoveredHosts::new(source.clone());
//!
//!     // First poll picks up the fleet.
//!     assert!(hosts.refresh().await?);
//!     assert_eq!(hosts.available_slot_count().await, 6);
//!
//!     // A worker on worker-2 failed; take the host out of rotation.
//!     hosts.blacklist("worker-2").await;
//!     assert_eq!(hosts.available_hosts().await, ["worker-1"]);
//!     assert_eq!(hosts.blacklisted_slot_count().await, 2);
//!
//!     // Capacity change shows up as a membership change on the next poll.
//!     source.set(Snapshot::from_pairs([("worker-1", 8), ("worker-2", 2)]));
//!     assert!(hosts.refresh().await?);
//!     assert_eq!(hosts.slots_for("worker-1").await?, 8);
//!     Ok(())
//! }
//! ```
mod discovery;
mod error;
mod hosts;
mod notify;

// ---- Public re-exports ----

pub use discovery::{FixedSource, HostDiscovery, HostDiscoveryRef, ScriptSource};
pub use error::{DiscoveryError, HostError};
pub use hosts::{DiscoveredHosts, HostState, Snapshot};
pub use notify::{Notifier, WaitHandle};
