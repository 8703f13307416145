//! Host membership core: snapshot data model and the tracking aggregate.
//!
//! This module contains the stateful heart of the crate. The only public API
//! is intentionally small:
//! - [`Snapshot`] one discovery result: host set + host→slots mapping
//! - [`HostState`] per-host monotonic blacklist flag + change notifier
//! - [`DiscoveredHosts`] aggregates the latest snapshot with cumulative
//!   per-host state and exposes filtered/aggregated views
//!
//! Internal structure:
//! - [`snapshot`]: plain data, structural equality drives the refresh diff;
//! - [`state`]: per-host record, monotonic mutation only;
//! - [`discovered`]: locking, diffing, accounting, wait-handle hand-out.

mod discovered;
mod snapshot;
mod state;

pub use discovered::DiscoveredHosts;
pub use snapshot::Snapshot;
pub use state::HostState;
