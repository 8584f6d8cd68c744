//! Cache Statistics Module
//!
//! Tracks lookup hits and misses plus refresh outcomes for one cache.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;

// == Cache Stats ==
/// Point-in-time view of a cache's counters.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Number of successful `get` lookups
    pub hits: u64,
    /// Number of failed `get` lookups (id absent or cache expired)
    pub misses: u64,
    /// Number of successful refreshes
    pub refreshes: u64,
    /// Number of refreshes that failed in the loader
    pub failed_refreshes: u64,
    /// Entities held in the current snapshot, expired or not
    pub total_entries: usize,
    /// Whether reads currently treat the cache as empty due to TTL
    pub expired: bool,
    /// Wall-clock time of the last successful refresh
    pub last_refreshed: Option<DateTime<Utc>>,
}

impl CacheStats {
    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

// == Stats Recorder ==
/// Counters updated from behind a shared read lock.
#[derive(Debug, Default)]
pub(crate) struct StatsRecorder {
    hits: AtomicU64,
    misses: AtomicU64,
    refreshes: AtomicU64,
    failed_refreshes: AtomicU64,
}

impl StatsRecorder {
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_refresh(&self) {
        self.refreshes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failed_refresh(&self) {
        self.failed_refreshes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(
        &self,
        total_entries: usize,
        expired: bool,
        last_refreshed: Option<DateTime<Utc>>,
    ) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            refreshes: self.refreshes.load(Ordering::Relaxed),
            failed_refreshes: self.failed_refreshes.load(Ordering::Relaxed),
            total_entries,
            expired,
            last_refreshed,
        }
    }
}
