//! Per-endpoint request counters

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

/// Per-endpoint statistics (thread-safe with atomic counters)
#[derive(Debug, Default)]
pub struct EndpointStats {
    /// Requests that reached a known endpoint
    pub received: AtomicU64,
    /// Requests refused by token or method checks
    pub rejected: AtomicU64,
    /// Messages accepted by the chat server
    pub delivered: AtomicU64,
    /// Delivery attempts that failed
    pub failed: AtomicU64,
    /// Placeholders rendered as the sentinel
    pub unresolved_placeholders: AtomicU64,
}

impl EndpointStats {
    pub fn record_received(&self) {
        self.received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rejected(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_delivered(&self) {
        self.delivered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_unresolved(&self, count: usize) {
        self.unresolved_placeholders
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> EndpointStatsSnapshot {
        EndpointStatsSnapshot {
            received: self.received.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            delivered: self.delivered.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            unresolved_placeholders: self.unresolved_placeholders.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of endpoint statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointStatsSnapshot {
    pub received: u64,
    pub rejected: u64,
    pub delivered: u64,
    pub failed: u64,
    pub unresolved_placeholders: u64,
}

/// Counters for every endpoint that has seen traffic
#[derive(Debug, Default)]
pub struct StatsTracker {
    endpoints: DashMap<String, EndpointStats>,
}

impl StatsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` against the counters for `endpoint`, creating them on first use
    pub fn record(&self, endpoint: &str, f: impl FnOnce(&EndpointStats)) {
        if let Some(stats) = self.endpoints.get(endpoint) {
            f(stats.value());
            return;
        }

        let entry = self.endpoints.entry(endpoint.to_string()).or_default();
        f(entry.value());
    }

    pub fn get(&self, endpoint: &str) -> Option<EndpointStatsSnapshot> {
        self.endpoints.get(endpoint).map(|s| s.snapshot())
    }

    pub fn snapshot(&self) -> HashMap<String, EndpointStatsSnapshot> {
        self.endpoints
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().snapshot()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_creates_entry() {
        let tracker = StatsTracker::new();
        assert!(tracker.get("deploy").is_none());

        tracker.record("deploy", |s| s.record_received());
        tracker.record("deploy", |s| s.record_delivered());
        tracker.record("deploy", |s| s.record_unresolved(2));

        let snapshot = tracker.get("deploy").unwrap();
        assert_eq!(snapshot.received, 1);
        assert_eq!(snapshot.delivered, 1);
        assert_eq!(snapshot.unresolved_placeholders, 2);
        assert_eq!(snapshot.failed, 0);
    }

    #[test]
    fn test_snapshot_all() {
        let tracker = StatsTracker::new();
        tracker.record("a", |s| s.record_rejected());
        tracker.record("b", |s| s.record_failed());

        let all = tracker.snapshot();
        assert_eq!(all.len(), 2);
        assert_eq!(all["a"].rejected, 1);
        assert_eq!(all["b"].failed, 1);
    }
}
