//! Inventory type definitions

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One physical or logical unit reported by a device
///
/// A stack member or linecard, typically. `member` and `model` are absent
/// when the record was recovered by the fallback parse, which only sees a
/// labeled serial. Serials are uppercase-normalized, never empty, and never
/// a bare 12-hex-digit MAC-shaped token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    /// Stack member or slot number
    pub member: Option<u32>,
    /// Hardware model token
    pub model: Option<String>,
    /// Serial number, uppercased
    pub serial: String,
}

impl InventoryItem {
    /// Item recovered by the fallback parse: serial only
    #[must_use]
    pub fn serial_only(serial: impl Into<String>) -> Self {
        Self {
            member: None,
            model: None,
            serial: serial.into(),
        }
    }
}

/// Outcome of collecting one host
///
/// A reachable device that reported no recognizable inventory is a
/// `Success` with an empty item list, deliberately distinct from `Failure`
/// so operators can tell "no inventory" from "could not reach".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HostResult {
    /// Command executed; zero or more items parsed
    Success(Vec<InventoryItem>),
    /// Connection, authentication, or read failure
    Failure {
        /// Human-readable cause
        error: String,
    },
}

impl HostResult {
    /// Build a failure result from any displayable error
    pub fn failure(reason: impl Into<String>) -> Self {
        Self::Failure {
            error: reason.into(),
        }
    }

    /// True for the `Success` variant, even with zero items
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, HostResult::Success(_))
    }
}

/// Per-host results of one collection run
///
/// Total over the input host set: every requested host appears exactly
/// once. Assembled incrementally by the collector, read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectionReport {
    results: HashMap<String, HostResult>,
}

impl CollectionReport {
    /// Create an empty report
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the result for a host
    pub fn insert(&mut self, host: String, result: HostResult) {
        self.results.insert(host, result);
    }

    /// Look up a host (case-sensitive)
    #[must_use]
    pub fn get(&self, host: &str) -> Option<&HostResult> {
        self.results.get(host)
    }

    /// Whether the host already has an entry
    #[must_use]
    pub fn contains(&self, host: &str) -> bool {
        self.results.contains_key(host)
    }

    /// Number of hosts in the report
    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// True when no host has been recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Hosts in display order: case-insensitive, case-sensitive tiebreak
    #[must_use]
    pub fn hosts_sorted(&self) -> Vec<&str> {
        let mut hosts: Vec<&str> = self.results.keys().map(String::as_str).collect();
        hosts.sort_by(|a, b| {
            a.to_lowercase()
                .cmp(&b.to_lowercase())
                .then_with(|| a.cmp(b))
        });
        hosts
    }

    /// Iterate over all entries in unspecified order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &HostResult)> {
        self.results.iter()
    }
}
