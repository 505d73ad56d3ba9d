//! Fixed window request limiter.

use std::{
    sync::{Arc, Mutex, PoisonError},
    time::{Duration, Instant},
};

#[derive(Debug)]
struct Window {
    started_at: Instant,
    used: u64,
}

/// Allows at most `max` acquisitions per `period`.
///
/// Clones share the same window.
#[derive(Clone, Debug)]
pub struct RateLimiter {
    max: u64,
    period: Duration,
    window: Arc<Mutex<Window>>,
}

impl RateLimiter {
    /// Create a limiter whose first window starts now.
    pub fn new(max: u64, period: Duration) -> Self {
        let window = Window { started_at: Instant::now(), used: 0 };
        Self { max, period, window: Arc::new(Mutex::new(window)) }
    }

    /// Take one slot of the current window, returning `false` when it is exhausted.
    pub fn try_acquire(&self) -> bool {
        let mut window = self.window.lock().unwrap_or_else(PoisonError::into_inner);
        let now = Instant::now();
        if now.duration_since(window.started_at) >= self.period {
            window.started_at = now;
            window.used = 0;
        }
        if window.used < self.max {
            window.used += 1;
            true
        } else {
            false
        }
    }
}
