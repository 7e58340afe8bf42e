//! Fixed-window call quota shared by every client built on one Meta app.
//!
//! The window resets lazily: the first call made at least `window` after the
//! current window started opens a new one. Exhausted quota is reported, never
//! waited out.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Graph API app-level default: 200 calls per hour.
pub const DEFAULT_MAX_CALLS_PER_WINDOW: u32 = 200;
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60 * 60);

#[derive(Debug)]
struct RateWindow {
    started_at: Instant,
    count: u32,
}

/// Counts outbound calls inside a rolling window.
///
/// Acquisition is serialized through a mutex so concurrent fetch tasks see a
/// single counter. The lock is never held across an `.await`.
#[derive(Debug)]
pub struct RateLimiter {
    max_calls: u32,
    window: Duration,
    state: Mutex<RateWindow>,
}

impl RateLimiter {
    /// One-hour window with `max_calls` permits.
    #[must_use]
    pub fn new(max_calls: u32) -> Self {
        Self::with_window(max_calls, DEFAULT_WINDOW)
    }

    #[must_use]
    pub fn with_window(max_calls: u32, window: Duration) -> Self {
        Self {
            max_calls,
            window,
            state: Mutex::new(RateWindow {
                started_at: Instant::now(),
                count: 0,
            }),
        }
    }

    /// Takes one permit if the current window has quota left.
    pub fn try_acquire(&self) -> bool {
        self.try_acquire_at(Instant::now())
    }

    fn try_acquire_at(&self, now: Instant) -> bool {
        let mut window = self.lock();
        self.roll_window(&mut window, now);

        if window.count >= self.max_calls {
            return false;
        }

        window.count += 1;
        true
    }

    /// Permits left in the current window.
    #[must_use]
    pub fn remaining(&self) -> u32 {
        let mut window = self.lock();
        self.roll_window(&mut window, Instant::now());
        self.max_calls.saturating_sub(window.count)
    }

    #[must_use]
    pub fn max_calls(&self) -> u32 {
        self.max_calls
    }

    fn roll_window(&self, window: &mut RateWindow, now: Instant) {
        if now.saturating_duration_since(window.started_at) >= self.window {
            window.started_at = now;
            window.count = 0;
        }
    }

    // The window is always consistent, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, RateWindow> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CALLS_PER_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[test]
    fn denies_after_max_calls_in_one_window() {
        let limiter = RateLimiter::default();
        let now = Instant::now();
        for i in 0..DEFAULT_MAX_CALLS_PER_WINDOW {
            assert!(limiter.try_acquire_at(now), "call {i} should be permitted");
        }
        assert!(!limiter.try_acquire_at(now), "call 201 must be denied");
        assert_eq!(limiter.remaining(), 0);
    }

    #[test]
    fn window_expiry_resets_quota() {
        let limiter = RateLimiter::new(2);
        let start = Instant::now();
        assert!(limiter.try_acquire_at(start));
        assert!(limiter.try_acquire_at(start));
        assert!(!limiter.try_acquire_at(start + Duration::from_secs(3599)));
        assert!(limiter.try_acquire_at(start + DEFAULT_WINDOW + Duration::from_secs(1)));
    }

    #[test]
    fn zero_quota_never_permits() {
        let limiter = RateLimiter::new(0);
        assert!(!limiter.try_acquire());
    }

    #[test]
    fn remaining_counts_down() {
        let limiter = RateLimiter::new(3);
        assert_eq!(limiter.remaining(), 3);
        assert!(limiter.try_acquire());
        assert_eq!(limiter.remaining(), 2);
    }

    #[test]
    fn concurrent_callers_share_one_counter() {
        let limiter = Arc::new(RateLimiter::new(10));
        let granted = Arc::new(AtomicU32::new(0));

        let handles: Vec<_> = (0..40)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                let granted = Arc::clone(&granted);
                std::thread::spawn(move || {
                    if limiter.try_acquire() {
                        granted.fetch_add(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(granted.load(Ordering::SeqCst), 10);
    }
}
