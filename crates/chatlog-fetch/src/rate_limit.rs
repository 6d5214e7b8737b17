//! Process-wide request rate limiting.

use std::collections::VecDeque;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep_until};

/// Sliding-window rate limiter shared by every worker of a batch.
///
/// At most `max_calls` call starts are admitted within any window of length
/// `period`. Callers are delayed, never rejected. Waiters queue on a fair
/// mutex, so slots are handed out in arrival order.
#[derive(Debug)]
pub struct RateLimiter {
    max_calls: usize,
    period: Duration,
    admitted: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    /// Default number of calls per period.
    pub const DEFAULT_MAX_CALLS: usize = 5;
    /// Default period.
    pub const DEFAULT_PERIOD: Duration = Duration::from_secs(1);

    /// Creates a limiter admitting `max_calls` per `period`.
    ///
    /// A `max_calls` of zero is treated as one.
    #[must_use]
    pub fn new(max_calls: usize, period: Duration) -> Self {
        let max_calls = max_calls.max(1);
        Self {
            max_calls,
            period,
            admitted: Mutex::new(VecDeque::with_capacity(max_calls)),
        }
    }

    /// Returns the number of calls admitted per period.
    #[must_use]
    pub const fn max_calls(&self) -> usize {
        self.max_calls
    }

    /// Returns the window length.
    #[must_use]
    pub const fn period(&self) -> Duration {
        self.period
    }

    /// Waits until a call may start without exceeding the budget, then
    /// reserves the slot.
    ///
    /// Dropping the returned future before it completes reserves nothing.
    pub async fn acquire(&self) {
        let mut admitted = self.admitted.lock().await;
        loop {
            let now = Instant::now();
            while admitted
                .front()
                .is_some_and(|start| now.duration_since(*start) >= self.period)
            {
                admitted.pop_front();
            }

            if admitted.len() < self.max_calls {
                admitted.push_back(now);
                return;
            }

            if let Some(oldest) = admitted.front().copied() {
                sleep_until(oldest + self.period).await;
            }
        }
    }

    /// Returns how many call starts fall inside the current window.
    #[cfg(test)]
    async fn in_window(&self) -> usize {
        let admitted = self.admitted.lock().await;
        let now = Instant::now();
        admitted
            .iter()
            .filter(|start| now.duration_since(**start) < self.period)
            .count()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_CALLS, Self::DEFAULT_PERIOD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_rate_limiter_defaults() {
        let limiter = RateLimiter::default();
        assert_eq!(limiter.max_calls(), 5);
        assert_eq!(limiter.period(), Duration::from_secs(1));
    }

    #[test]
    fn test_zero_calls_clamped() {
        let limiter = RateLimiter::new(0, Duration::from_secs(1));
        assert_eq!(limiter.max_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_within_budget_is_immediate() {
        let limiter = RateLimiter::default();
        let start = Instant::now();

        for _ in 0..5 {
            limiter.acquire().await;
        }

        assert_eq!(Instant::now(), start);
        assert_eq!(limiter.in_window().await, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sixth_call_waits_for_oldest_to_expire() {
        let limiter = RateLimiter::default();
        let start = Instant::now();

        for _ in 0..5 {
            limiter.acquire().await;
        }
        limiter.acquire().await;

        assert!(Instant::now() - start >= Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_window_slides() {
        let limiter = RateLimiter::new(2, Duration::from_secs(1));
        let start = Instant::now();

        limiter.acquire().await;
        tokio::time::advance(Duration::from_millis(600)).await;
        limiter.acquire().await;

        // Third call may start once the first one leaves the window at t=1s,
        // not at t=1.6s.
        limiter.acquire().await;
        let elapsed = Instant::now() - start;
        assert!(elapsed >= Duration::from_secs(1));
        assert!(elapsed < Duration::from_millis(1600));
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_window_exceeds_budget_under_contention() {
        let limiter = Arc::new(RateLimiter::new(5, Duration::from_secs(1)));
        let mut handles = Vec::new();

        for _ in 0..23 {
            let limiter = Arc::clone(&limiter);
            handles.push(tokio::spawn(async move {
                limiter.acquire().await;
                Instant::now()
            }));
        }

        let mut starts = Vec::new();
        for handle in handles {
            starts.push(handle.await.unwrap());
        }
        starts.sort();

        for (i, first) in starts.iter().enumerate() {
            let in_window = starts[i..]
                .iter()
                .take_while(|s| s.duration_since(*first) < Duration::from_secs(1))
                .count();
            assert!(in_window <= 5, "{in_window} calls within one second");
        }
        // Every caller was eventually admitted.
        assert_eq!(starts.len(), 23);
    }
}
