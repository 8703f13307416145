//! # The discovery capability.
//!
//! A [`HostDiscovery`] source answers one question: which hosts are available
//! right now, and how many slots does each carry. It either returns a
//! mutually consistent [`Snapshot`] or fails with a
//! [`DiscoveryError`](crate::DiscoveryError); there is no partial answer.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::DiscoveryError;
use crate::hosts::Snapshot;

/// Shared handle to a discovery source, suitable for handing to
/// [`DiscoveredHosts`](crate::DiscoveredHosts).
pub type HostDiscoveryRef = Arc<dyn HostDiscovery>;

/// # Source of host membership snapshots.
///
/// Implementations must return a consistent pair (every host in the set has a
/// slot entry) or fail. The call may block for as long as the underlying
/// mechanism needs (e.g. running an external program); callers isolate it on a
/// polling task.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use hostvisor::{DiscoveryError, HostDiscovery, Snapshot};
///
/// struct StaticPair;
///
/// #[async_trait]
/// impl HostDiscovery for StaticPair {
///     async fn find_available_hosts_and_slots(&self) -> Result<Snapshot, DiscoveryError> {
///         Ok(Snapshot::from_pairs([("h1", 2), ("h2", 2)]))
///     }
/// }
/// ```
#[async_trait]
pub trait HostDiscovery: Send + Sync + 'static {
    /// Produces the current (host set, host→slots mapping) pair.
    async fn find_available_hosts_and_slots(&self) -> Result<Snapshot, DiscoveryError>;
}
