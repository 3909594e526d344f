use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Per-key sliding window: at most `max_requests` hits inside `window`.
#[derive(Debug, Clone)]
pub struct SlidingWindowLimiter {
    state: Arc<Mutex<WindowState>>,
    window: Duration,
    max_requests: usize,
}

#[derive(Debug)]
struct WindowState {
    hits: HashMap<String, VecDeque<Instant>>,
    last_sweep: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed,
    Limited { retry_after: Duration },
}

impl SlidingWindowLimiter {
    pub fn new(window: Duration, max_requests: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(WindowState {
                hits: HashMap::new(),
                last_sweep: Instant::now(),
            })),
            window,
            max_requests: max_requests.max(1),
        }
    }

    pub fn check(&self, key: &str) -> RateDecision {
        self.check_at(key, Instant::now())
    }

    fn check_at(&self, key: &str, now: Instant) -> RateDecision {
        let mut guard = self.state.lock();
        if now.duration_since(guard.last_sweep) > self.window {
            let window = self.window;
            guard.hits.retain(|_, queue| {
                queue
                    .back()
                    .is_some_and(|last| now.duration_since(*last) <= window)
            });
            guard.last_sweep = now;
        }

        let queue = guard.hits.entry(key.to_string()).or_default();

        while queue
            .front()
            .is_some_and(|front| now.duration_since(*front) > self.window)
        {
            queue.pop_front();
        }

        if queue.len() >= self.max_requests {
            let oldest = queue.front().copied().unwrap_or(now);
            let retry_after = self.window.saturating_sub(now.duration_since(oldest));
            return RateDecision::Limited { retry_after };
        }

        queue.push_back(now);
        RateDecision::Allowed
    }

    #[cfg(test)]
    fn tracked_keys(&self) -> usize {
        self.state.lock().hits.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limits_after_max_requests() {
        let limiter = SlidingWindowLimiter::new(Duration::from_secs(60), 2);
        let now = Instant::now();
        assert_eq!(limiter.check_at("ip", now), RateDecision::Allowed);
        assert_eq!(limiter.check_at("ip", now), RateDecision::Allowed);
        assert!(matches!(
            limiter.check_at("ip", now),
            RateDecision::Limited { .. }
        ));
        assert_eq!(limiter.check_at("other", now), RateDecision::Allowed);
    }

    #[test]
    fn window_slides() {
        let limiter = SlidingWindowLimiter::new(Duration::from_secs(1), 1);
        let start = Instant::now();
        assert_eq!(limiter.check_at("ip", start), RateDecision::Allowed);
        assert!(matches!(
            limiter.check_at("ip", start + Duration::from_millis(500)),
            RateDecision::Limited { .. }
        ));
        assert_eq!(
            limiter.check_at("ip", start + Duration::from_millis(1_500)),
            RateDecision::Allowed
        );
    }

    #[test]
    fn idle_keys_are_swept() {
        let limiter = SlidingWindowLimiter::new(Duration::from_secs(1), 5);
        let start = Instant::now();
        for n in 0..1_000 {
            limiter.check_at(&format!("10.0.{}.{}", n / 256, n % 256), start);
        }
        assert_eq!(limiter.tracked_keys(), 1_000);

        let later = start + Duration::from_secs(3);
        assert_eq!(limiter.check_at("fresh", later), RateDecision::Allowed);
        assert_eq!(limiter.tracked_keys(), 1);
    }
}
