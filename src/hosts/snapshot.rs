//! # One discovery result: the (host set, host→slots) pair.
//!
//! [`Snapshot`] is returned atomically by a discovery source and stored whole
//! by [`DiscoveredHosts`](crate::DiscoveredHosts). Structural equality
//! (`PartialEq` over both the set and the mapping) is what `refresh()` uses to
//! decide whether membership or capacity changed — there is no merging, a new
//! snapshot wholly replaces the old one.

use std::collections::{HashMap, HashSet};

/// The (host set, host→slots mapping) pair produced by a single discovery call.
///
/// Invariant: every host in the set has an entry in the mapping. Sources are
/// responsible for upholding it; [`Snapshot::new`] asserts it in debug builds.
///
/// Lookups iterate the host set, so slot entries for hosts absent from the set
/// are never read through the availability views.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Snapshot {
    hosts: HashSet<String>,
    slots: HashMap<String, u32>,
}

impl Snapshot {
    /// Creates a snapshot from a host set and its slots mapping.
    pub fn new(hosts: HashSet<String>, slots: HashMap<String, u32>) -> Self {
        debug_assert!(
            hosts.iter().all(|h| slots.contains_key(h)),
            "every host in the set must have a slots entry"
        );
        Self { hosts, slots }
    }

    /// Builds a snapshot from `(host, slots)` pairs; convenient for tests and demos.
    ///
    /// # Example
    /// ```
    /// use hostvisor::Snapshot;
    ///
    /// let snap = Snapshot::from_pairs([("a", 4), ("b", 2)]);
    /// assert_eq!(snap.len(), 2);
    /// assert_eq!(snap.slots_for("a"), Some(4));
    /// ```
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        let mut hosts = HashSet::new();
        let mut slots = HashMap::new();
        for (host, n) in pairs {
            let host = host.into();
            hosts.insert(host.clone());
            slots.insert(host, n);
        }
        Self { hosts, slots }
    }

    /// Returns `true` if the host is in the snapshot's host set.
    pub fn contains(&self, host: &str) -> bool {
        self.hosts.contains(host)
    }

    /// Returns the slot count recorded for the host, if any.
    pub fn slots_for(&self, host: &str) -> Option<u32> {
        self.slots.get(host).copied()
    }

    /// Iterates the hosts in the snapshot (order unspecified).
    pub fn hosts(&self) -> impl Iterator<Item = &str> {
        self.hosts.iter().map(String::as_str)
    }

    /// Number of hosts in the snapshot.
    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    /// Returns `true` if the snapshot holds no hosts.
    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_covers_both_set_and_mapping() {
        let a = Snapshot::from_pairs([("h1", 2), ("h2", 3)]);
        let b = Snapshot::from_pairs([("h2", 3), ("h1", 2)]);
        assert_eq!(a, b);

        // Same set, different slot value.
        let c = Snapshot::from_pairs([("h1", 2), ("h2", 4)]);
        assert_ne!(a, c);

        // Different set.
        let d = Snapshot::from_pairs([("h1", 2)]);
        assert_ne!(a, d);
    }

    #[test]
    fn empty_snapshot() {
        let snap = Snapshot::default();
        assert!(snap.is_empty());
        assert_eq!(snap.len(), 0);
        assert!(!snap.contains("h1"));
        assert_eq!(snap.slots_for("h1"), None);
    }
}
