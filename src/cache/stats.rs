//! Cache Statistics Module
//!
//! Tracks hits, misses and upstream outcomes of read requests.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Cache Stats ==
/// Lock-free counters shared by all requests.
#[derive(Debug, Default)]
pub struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
    fills: AtomicU64,
    upstream_not_found: AtomicU64,
    upstream_faults: AtomicU64,
}

/// Point-in-time copy of [`CacheStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    /// Reads served from the store
    pub hits: u64,
    /// Reads that found no stored entry
    pub misses: u64,
    /// Misses satisfied by the upstream and persisted
    pub fills: u64,
    /// Misses the upstream had no image for
    pub upstream_not_found: u64,
    /// Misses where the upstream could not be reached
    pub upstream_faults: u64,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fill(&self) {
        self.fills.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_upstream_not_found(&self) {
        self.upstream_not_found.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_upstream_fault(&self) {
        self.upstream_faults.fetch_add(1, Ordering::Relaxed);
    }

    // == Snapshot ==
    /// Copies the current counter values.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            fills: self.fills.load(Ordering::Relaxed),
            upstream_not_found: self.upstream_not_found.load(Ordering::Relaxed),
            upstream_faults: self.upstream_faults.load(Ordering::Relaxed),
        }
    }
}

impl StatsSnapshot {
    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no reads have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
