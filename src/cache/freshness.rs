//! Freshness Module
//!
//! TTL bookkeeping for one cached snapshot.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

// == Freshness ==
/// Tracks when the snapshot was last fetched and how long it stays valid.
///
/// A zero TTL never expires. A snapshot that was never fetched is not expired
/// either: it is simply empty until the first successful refresh.
#[derive(Debug, Clone)]
pub struct Freshness {
    /// Expiration window, zero = never expires
    ttl: Duration,
    /// Monotonic time of the last successful refresh
    last_fetch: Option<Instant>,
    /// Wall-clock time of the last successful refresh
    refreshed_at: Option<DateTime<Utc>>,
}

impl Freshness {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            last_fetch: None,
            refreshed_at: None,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn set_ttl(&mut self, ttl: Duration) {
        self.ttl = ttl;
    }

    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.refreshed_at
    }

    /// Records a successful refresh, read once from both clocks.
    pub fn mark_fetched(&mut self, now: Instant, at: DateTime<Utc>) {
        self.last_fetch = Some(now);
        self.refreshed_at = Some(at);
    }

    // == Is Expired ==
    /// True once more than `ttl` has elapsed since the last fetch.
    ///
    /// Exactly `ttl` after the fetch the snapshot is still fresh.
    pub fn is_expired(&self, now: Instant) -> bool {
        if self.ttl.is_zero() {
            return false;
        }
        match self.last_fetch {
            Some(fetched) => now.saturating_duration_since(fetched) > self.ttl,
            None => false,
        }
    }

    // == Time To Live ==
    /// Time left before expiry.
    ///
    /// `None` if the snapshot never expires or was never fetched,
    /// `Some(Duration::ZERO)` once it has expired.
    pub fn ttl_remaining(&self, now: Instant) -> Option<Duration> {
        if self.ttl.is_zero() {
            return None;
        }
        self.last_fetch
            .map(|fetched| self.ttl.saturating_sub(now.saturating_duration_since(fetched)))
    }
}
