//! Error types used by the hostvisor core.
//!
//! This module defines two main error enums:
//!
//! - [`DiscoveryError`] — the configured discovery source could not produce a snapshot.
//! - [`HostError`] — a host-keyed lookup was made against the current snapshot and missed.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging/metrics.
//! A [`DiscoveryError`] is transient by policy: the recommended caller reaction is to
//! log it and retry on the next poll interval. A [`HostError`] is always a caller
//! logic error and is not retryable.

use std::num::ParseIntError;
use std::path::PathBuf;

use thiserror::Error;

/// # Errors produced by a discovery source.
///
/// These represent failures to obtain a host snapshot. `refresh()` propagates
/// them unchanged and leaves the previously stored snapshot untouched, so a
/// failed poll is never mistaken for "no change".
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum DiscoveryError {
    /// The discovery script ran but exited with a non-zero status.
    ///
    /// `code` is `None` when the process was terminated by a signal.
    #[error("discovery script {} exited with status {:?}", .script.display(), .code)]
    ScriptFailed {
        /// Path to the configured discovery executable.
        script: PathBuf,
        /// Exit code reported by the process, if any.
        code: Option<i32>,
    },

    /// A `host:slots` line carried a slot count that does not parse as an integer.
    #[error("invalid slot count in discovery line {line:?}: {source}")]
    InvalidSlots {
        /// The offending output line, verbatim.
        line: String,
        /// The underlying integer parse failure.
        source: ParseIntError,
    },

    /// The discovery executable could not be launched or awaited.
    #[error("failed to run discovery script {}: {}", .script.display(), .source)]
    Io {
        /// Path to the configured discovery executable.
        script: PathBuf,
        /// The underlying I/O failure.
        source: std::io::Error,
    },

    /// The discovery script produced stdout that is not valid UTF-8.
    #[error("discovery script {} produced non-UTF-8 output", .script.display())]
    NonUtf8Output {
        /// Path to the configured discovery executable.
        script: PathBuf,
    },
}

impl DiscoveryError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use hostvisor::DiscoveryError;
    ///
    /// let err = DiscoveryError::ScriptFailed {
    ///     script: "/usr/local/bin/find_hosts.sh".into(),
    ///     code: Some(1),
    /// };
    /// assert_eq!(err.as_label(), "discovery_script_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            DiscoveryError::ScriptFailed { .. } => "discovery_script_failed",
            DiscoveryError::InvalidSlots { .. } => "discovery_invalid_slots",
            DiscoveryError::Io { .. } => "discovery_io",
            DiscoveryError::NonUtf8Output { .. } => "discovery_non_utf8_output",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            DiscoveryError::ScriptFailed { script, code } => {
                format!("script {} exited with status {code:?}", script.display())
            }
            DiscoveryError::InvalidSlots { line, source } => {
                format!("bad slot count in {line:?}: {source}")
            }
            DiscoveryError::Io { script, source } => {
                format!("running {} failed: {source}", script.display())
            }
            DiscoveryError::NonUtf8Output { script } => {
                format!("{} produced non-UTF-8 output", script.display())
            }
        }
    }
}

/// # Errors produced by host-keyed lookups.
///
/// Raised when a caller asks about a host outside the current snapshot where
/// the API contract requires presence (only `slots_for`). Operations with lazy
/// state creation (`blacklist`, `is_blacklisted`, `wait_for_change`) are total
/// and never produce this error.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum HostError {
    /// The host is not present in the current snapshot mapping.
    #[error("host {host:?} is not in the current snapshot")]
    UnknownHost {
        /// The host that was looked up.
        host: String,
    },
}

impl HostError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use hostvisor::HostError;
    ///
    /// let err = HostError::UnknownHost { host: "worker-7".into() };
    /// assert_eq!(err.as_label(), "unknown_host");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            HostError::UnknownHost { .. } => "unknown_host",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            HostError::UnknownHost { host } => format!("unknown host: {host}"),
        }
    }
}
