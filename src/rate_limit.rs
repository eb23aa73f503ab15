use std::time::Duration;
use tokio::time::{sleep, Instant};

// ---------------------------------------------------------------------------
// Rate limiter
// ---------------------------------------------------------------------------

/// Enforces a fixed minimum spacing between consecutive remote calls. Not
/// adaptive: the window never widens or shrinks.
pub struct RateLimiter {
    delay: Duration,
    last_request: Option<Instant>,
}

impl RateLimiter {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_request: None,
        }
    }

    /// Sleep out whatever remains of the spacing window since the previous
    /// call, then claim the current slot.
    pub async fn wait(&mut self) {
        if let Some(last) = self.last_request {
            let elapsed = last.elapsed();
            if elapsed < self.delay {
                sleep(self.delay - elapsed).await;
            }
        }
        self.last_request = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn first_call_does_not_wait() {
        let mut limiter = RateLimiter::new(Duration::from_millis(500));
        let start = Instant::now();
        limiter.wait().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn consecutive_calls_keep_the_minimum_spacing() {
        let mut limiter = RateLimiter::new(Duration::from_millis(500));
        let start = Instant::now();
        limiter.wait().await;
        limiter.wait().await;
        limiter.wait().await;
        assert!(start.elapsed() >= Duration::from_millis(1000));
    }

    #[tokio::test(start_paused = true)]
    async fn time_already_spent_counts_toward_the_window() {
        let mut limiter = RateLimiter::new(Duration::from_millis(500));
        limiter.wait().await;
        sleep(Duration::from_millis(400)).await;
        let before = Instant::now();
        limiter.wait().await;
        let waited = before.elapsed();
        assert!(waited >= Duration::from_millis(100));
        assert!(waited < Duration::from_millis(500));
    }
}
