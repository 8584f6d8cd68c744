//! Time source used for TTL checks.

use std::fmt::Debug;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

/// Source of time for expiration checks and refresh timestamps.
pub trait Clock: Send + Sync + Debug {
    /// Monotonic time, used for TTL arithmetic.
    fn now(&self) -> Instant;

    /// Wall-clock time, reported as `last_refreshed`.
    fn utc_now(&self) -> DateTime<Utc>;
}

/// Reads the real monotonic clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn utc_now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

// == Manual Clock ==
/// Clock that only moves when told to.
///
/// Clones share the same current time, so a test can hand one clone to a
/// cache and advance time through another. The monotonic and wall-clock
/// readings always move together.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<(Instant, DateTime<Utc>)>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Arc::new(Mutex::new((Instant::now(), Utc::now()))),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        now.0 += by;
        now.1 += chrono::Duration::microseconds(by.as_micros() as i64);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.lock().0
    }

    fn utc_now(&self) -> DateTime<Utc> {
        self.now.lock().1
    }
}
