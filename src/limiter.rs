//! Fixed-window rate limiter over an in-memory map.
//!
//! Guards the web tier's REST endpoints: each key (client IP or session)
//! gets `max_requests` per window. Expired windows are swept on the fly so
//! the map does not grow without bound.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use tracing::warn;

struct Entry {
    count: u32,
    window_start: Instant,
}

/// In-memory fixed-window rate limiter, safe to share across threads.
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    entries: Mutex<HashMap<String, Entry>>,
}

impl RateLimiter {
    /// Create a limiter admitting `max_requests` per `window` per key.
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Record a request for `key` and report whether it is admitted.
    ///
    /// A key whose window has elapsed is reset and the request counts
    /// against the fresh window.
    pub fn check(&self, key: &str) -> bool {
        self.check_at(key, Instant::now())
    }

    fn check_at(&self, key: &str, now: Instant) -> bool {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        // TTL sweep: drop every window that has fully elapsed.
        let window = self.window;
        entries.retain(|_, e| now.duration_since(e.window_start) < window);

        let entry = entries.entry(key.to_owned()).or_insert(Entry {
            count: 0,
            window_start: now,
        });

        if entry.count >= self.max_requests {
            warn!(key, count = entry.count, "rate limit exceeded");
            return false;
        }

        entry.count += 1;
        true
    }
}
