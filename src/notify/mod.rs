//! Edge-triggered change notification.
//!
//! This module groups the wait primitive used to block on per-host state
//! changes:
//! - [`Notifier`] versioned, broadcast-style signal source
//! - [`WaitHandle`] a capture of "the current unsignaled state"
//!
//! ## Quick reference
//! - **Producers**: `HostState::blacklist()` (via `DiscoveredHosts::blacklist`).
//! - **Consumers**: anything holding a handle from `DiscoveredHosts::wait_for_change`.

mod notifier;

pub use notifier::{Notifier, WaitHandle};
