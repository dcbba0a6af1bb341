//! Request pacing and the daily quota
//!
//! Two wait rules, and only these two:
//!
//! - `Pacer` spaces requests a fixed interval apart (6 s by default, matching
//!   a 10 requests/minute allowance). Built on the governor token bucket with
//!   one permit per interval.
//! - `DailyQuota` counts calls against a daily cap. Once the cap is exceeded
//!   the source sleeps until local midnight of the next day, then resets the
//!   counter and proceeds with the pending page — the page is never skipped.

use chrono::{DateTime, Days, Local};
use governor::clock::DefaultClock;
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as Governor};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

// ============================================================================
// Pacer
// ============================================================================

/// Fixed inter-request spacing
#[derive(Clone)]
pub struct Pacer {
    limiter: Option<Arc<Governor<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>>>,
}

impl Pacer {
    /// Create a pacer granting one request per `interval`.
    ///
    /// A zero interval disables pacing entirely.
    pub fn new(interval: Duration) -> Self {
        let limiter = Quota::with_period(interval).map(|quota| Arc::new(Governor::direct(quota)));
        Self { limiter }
    }

    /// Wait until the next request may be issued
    pub async fn acquire(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }

    /// Check whether pacing is enabled
    pub fn is_enabled(&self) -> bool {
        self.limiter.is_some()
    }
}

impl std::fmt::Debug for Pacer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pacer")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

// ============================================================================
// Daily Quota
// ============================================================================

/// Call counter against a daily cap
#[derive(Debug, Clone)]
pub struct DailyQuota {
    limit: u32,
    calls: u32,
}

impl DailyQuota {
    /// Create a quota with the given daily limit
    pub fn new(limit: u32) -> Self {
        Self { limit, calls: 0 }
    }

    /// Number of calls recorded since the last reset
    pub fn calls(&self) -> u32 {
        self.calls
    }

    /// The daily limit
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Record one API call
    pub fn record_call(&mut self) {
        self.calls += 1;
    }

    /// Check whether the counter has exceeded the daily limit
    pub fn exceeded(&self) -> bool {
        self.calls > self.limit
    }

    /// Sleep until local midnight of the next day, then reset the counter.
    ///
    /// This is a full-task blocking wait with no cancellation hook; a caller
    /// wanting cancellation must run the source in a task it can abort.
    pub async fn wait_until_next_day(&mut self) {
        let wait = duration_until_next_midnight(Local::now());
        warn!(
            calls = self.calls,
            limit = self.limit,
            wait_secs = wait.as_secs(),
            "daily request limit reached, waiting for the next day"
        );
        tokio::time::sleep(wait).await;
        self.calls = 0;
    }
}

/// Wall-clock duration from `now` until local midnight of the next day
pub fn duration_until_next_midnight(now: DateTime<Local>) -> Duration {
    let midnight = (now.date_naive() + Days::new(1))
        .and_hms_opt(0, 0, 0)
        .expect("midnight is a valid wall-clock time");
    (midnight - now.naive_local()).to_std().unwrap_or_default()
}
