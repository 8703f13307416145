//! Pluggable host discovery: the capability trait and its two sources.
//!
//! This module groups everything that produces a [`Snapshot`](crate::Snapshot):
//! - [`HostDiscovery`] the capability consumed by
//!   [`DiscoveredHosts`](crate::DiscoveredHosts)
//! - [`ScriptSource`] runs an external executable and parses its stdout
//! - [`FixedSource`] returns an explicitly configured snapshot
//!
//! The two sources are siblings: neither degrades nor wraps the other. Tests
//! and tools use [`FixedSource::set`] to simulate membership churn between
//! polls.

mod fixed;
mod script;
mod source;

pub use fixed::FixedSource;
pub use script::ScriptSource;
pub use source::{HostDiscovery, HostDiscoveryRef};
