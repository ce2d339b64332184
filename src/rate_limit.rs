use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::interval;
use tracing::{debug, info};
use crate::metrics::TRACKED_CLIENTS;

pub const DEFAULT_THRESHOLD: u32 = 5;
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

// Rate limit entry - tracks requests per IP/key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowCounter {
    pub count: u32,
    pub reset_at: u64, // limiter clock millis when the window closes
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Admit,
    Reject,
}

impl Decision {
    pub fn is_admit(self) -> bool {
        self == Decision::Admit
    }
}

/// Fixed-window limiter keyed by client identifier.
///
/// State lives for the lifetime of the process and is local to it: every
/// instance of the service counts on its own, so N warm instances admit up
/// to `threshold * N` requests per key and window.
pub struct RateLimiter {
    counters: DashMap<String, WindowCounter>,
    threshold: u32,
    window_ms: u64,
    started: Instant,
}

impl RateLimiter {
    pub fn new(threshold: u32, window: Duration) -> Self {
        Self {
            counters: DashMap::new(),
            threshold,
            window_ms: u64::try_from(window.as_millis()).unwrap_or(u64::MAX),
            started: Instant::now(),
        }
    }

    /// Milliseconds since the limiter was created.
    ///
    /// Monotonic, so wall clock steps never move a window backwards or
    /// close it early.
    pub fn now_millis(&self) -> u64 {
        u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    /// Records one request for `key` at `now` (see `now_millis`) and decides
    /// whether it is admitted.
    ///
    /// Rejected requests still advance the counter.
    pub fn check_and_record(&self, key: &str, now: u64) -> Decision {
        let reset_at = now.saturating_add(self.window_ms);

        // the entry guard holds the shard lock, so read-modify-write is atomic per key
        let mut entry = self
            .counters
            .entry(key.to_string())
            .or_insert(WindowCounter { count: 0, reset_at });

        // window expired..? start a new one
        if now > entry.reset_at {
            entry.count = 1;
            entry.reset_at = reset_at;
            return Decision::Admit;
        }

        entry.count = entry.count.saturating_add(1);
        if entry.count > self.threshold {
            Decision::Reject
        } else {
            Decision::Admit
        }
    }

    /// Drops counters whose window closed more than `grace` ago.
    /// Returns how many were removed.
    pub fn sweep(&self, now: u64, grace: Duration) -> usize {
        let grace_ms = u64::try_from(grace.as_millis()).unwrap_or(u64::MAX);
        let mut removed = 0;
        self.counters.retain(|_, counter| {
            let keep = counter.reset_at.saturating_add(grace_ms) >= now;
            if !keep {
                removed += 1;
            }
            keep
        });
        removed
    }

    pub fn counter(&self, key: &str) -> Option<WindowCounter> {
        self.counters.get(key).map(|entry| *entry)
    }

    pub fn tracked_keys(&self) -> usize {
        self.counters.len()
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD, DEFAULT_WINDOW)
    }
}

// Eviction loop - keeps the counter map from growing without bound
pub async fn sweeper(limiter: Arc<RateLimiter>, every: Duration, grace: Duration) {
    let mut ticker = interval(every);
    info!(interval = ?every, grace = ?grace, "Rate limit sweeper started");

    loop {
        ticker.tick().await;

        let removed = limiter.sweep(limiter.now_millis(), grace);
        let remaining = limiter.tracked_keys();
        TRACKED_CLIENTS.set(remaining as f64);

        if removed > 0 {
            debug!(removed, remaining, "Evicted expired rate limit counters");
        }
    }
}
