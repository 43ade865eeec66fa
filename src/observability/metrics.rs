//! Metrics registry for tabledeck
//!
//! - Counters only
//! - Monotonic increase
//! - Thread-safe but lock-minimal

use std::sync::atomic::{AtomicU64, Ordering};

/// Registry of engine counters owned by a session
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    rules_compiled: AtomicU64,
    unknown_operators: AtomicU64,
    records_scanned: AtomicU64,
    records_matched: AtomicU64,
    sorts_performed: AtomicU64,
    stats_computed: AtomicU64,
    cache_hits: AtomicU64,
    cache_invalidations: AtomicU64,
}

impl MetricsRegistry {
    /// Create a new metrics registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Add compiled rules
    pub fn add_rules_compiled(&self, count: u64) {
        self.rules_compiled.fetch_add(count, Ordering::Relaxed);
    }

    /// Increment unknown operators seen at compile time
    pub fn increment_unknown_operators(&self) {
        self.unknown_operators.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one filter pass over `scanned` records keeping `matched`
    pub fn record_filter_pass(&self, scanned: u64, matched: u64) {
        self.records_scanned.fetch_add(scanned, Ordering::Relaxed);
        self.records_matched.fetch_add(matched, Ordering::Relaxed);
    }

    /// Increment sorts performed
    pub fn increment_sorts(&self) {
        self.sorts_performed.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment statistics computations
    pub fn increment_stats(&self) {
        self.stats_computed.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment aggregate cache hits
    pub fn increment_cache_hits(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment aggregate cache invalidations
    pub fn increment_cache_invalidations(&self) {
        self.cache_invalidations.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current snapshot of all metrics as JSON
    pub fn to_json(&self) -> String {
        let s = self.snapshot();
        format!(
            r#"{{"rules_compiled":{},"unknown_operators":{},"records_scanned":{},"records_matched":{},"sorts_performed":{},"stats_computed":{},"cache_hits":{},"cache_invalidations":{}}}"#,
            s.rules_compiled,
            s.unknown_operators,
            s.records_scanned,
            s.records_matched,
            s.sorts_performed,
            s.stats_computed,
            s.cache_hits,
            s.cache_invalidations,
        )
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            rules_compiled: self.rules_compiled.load(Ordering::Relaxed),
            unknown_operators: self.unknown_operators.load(Ordering::Relaxed),
            records_scanned: self.records_scanned.load(Ordering::Relaxed),
            records_matched: self.records_matched.load(Ordering::Relaxed),
            sorts_performed: self.sorts_performed.load(Ordering::Relaxed),
            stats_computed: self.stats_computed.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_invalidations: self.cache_invalidations.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub rules_compiled: u64,
    pub unknown_operators: u64,
    pub records_scanned: u64,
    pub records_matched: u64,
    pub sorts_performed: u64,
    pub stats_computed: u64,
    pub cache_hits: u64,
    pub cache_invalidations: u64,
}
