//! # Script-backed discovery source.
//!
//! [`ScriptSource`] runs a configured external executable on every poll and
//! parses its stdout into a [`Snapshot`].
//!
//! ## Stdout contract
//! UTF-8 text, newline-separated records, each either:
//! ```text
//! HOSTNAME            # gets the configured default slot count
//! HOSTNAME:SLOTCOUNT  # explicit integer capacity
//! ```
//! Leading/trailing whitespace around the whole output is ignored. Lines are
//! treated as a set: blank and duplicate lines collapse, and visitation order
//! is unspecified. A line is split on its **first** colon only; everything
//! after it must parse as an integer, so `host:extra:5` is a parse error.
//!
//! ## Failure modes
//! - non-zero exit status → [`DiscoveryError::ScriptFailed`] (path + code)
//! - launch/await failure → [`DiscoveryError::Io`]
//! - non-UTF-8 stdout → [`DiscoveryError::NonUtf8Output`]
//! - malformed slot count → [`DiscoveryError::InvalidSlots`]

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::DiscoveryError;
use crate::hosts::Snapshot;

use super::source::HostDiscovery;

/// Discovery source that runs an external executable and parses its stdout.
///
/// The program is invoked with no arguments. Each poll runs it to completion
/// and waits synchronously for its exit status, so `refresh()` blocks for the
/// script's full duration.
#[derive(Debug)]
pub struct ScriptSource {
    script: PathBuf,
    default_slots: u32,
}

impl ScriptSource {
    /// Creates a source running `script`, assigning `default_slots` to every
    /// host line without an explicit `:slots` suffix.
    pub fn new(script: impl Into<PathBuf>, default_slots: u32) -> Self {
        Self {
            script: script.into(),
            default_slots,
        }
    }

    /// Path of the configured discovery executable.
    pub fn script(&self) -> &std::path::Path {
        &self.script
    }
}

#[async_trait]
impl HostDiscovery for ScriptSource {
    async fn find_available_hosts_and_slots(&self) -> Result<Snapshot, DiscoveryError> {
        let output = Command::new(&self.script)
            .output()
            .await
            .map_err(|source| DiscoveryError::Io {
                script: self.script.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(DiscoveryError::ScriptFailed {
                script: self.script.clone(),
                code: output.status.code(),
            });
        }

        let stdout =
            String::from_utf8(output.stdout).map_err(|_| DiscoveryError::NonUtf8Output {
                script: self.script.clone(),
            })?;

        let snapshot = parse_hosts_and_slots(&stdout, self.default_slots)?;
        debug!(script = %self.script.display(), hosts = snapshot.len(), "discovery script ran");
        Ok(snapshot)
    }
}

/// Parses discovery output into a snapshot.
///
/// Split out from the source so the line format is testable without spawning
/// a process.
fn parse_hosts_and_slots(stdout: &str, default_slots: u32) -> Result<Snapshot, DiscoveryError> {
    let mut hosts = HashSet::new();
    let mut slots = HashMap::new();

    let lines: HashSet<&str> = stdout.trim().split('\n').collect();
    for line in lines {
        if line.is_empty() {
            continue;
        }
        let (host, count) = match line.split_once(':') {
            Some((host, raw)) => {
                let count = raw.parse::<u32>().map_err(|source| {
                    DiscoveryError::InvalidSlots {
                        line: line.to_string(),
                        source,
                    }
                })?;
                (host, count)
            }
            None => (line, default_slots),
        };
        hosts.insert(host.to_string());
        slots.insert(host.to_string(), count);
    }

    Ok(Snapshot::new(hosts, slots))
}
