//! Token bucket used for per-client rate accounting.

use std::time::Instant;

/// A capped, continuously refilling token counter.
///
/// Refill happens lazily on access: the bucket adds `elapsed * refill_rate`
/// tokens (capped at `capacity`) whenever it is consulted, so idle buckets
/// climb back to full without any background task.
///
/// Invariant: `0 <= tokens <= capacity` after every method call.
#[derive(Debug, Clone)]
pub struct TokenBucket {
    tokens: f64,
    capacity: f64,
    refill_rate: f64,
    last_refill: Instant,
}

impl TokenBucket {
    /// Creates a full bucket.
    pub fn new(capacity: f64, refill_rate: f64, now: Instant) -> Self {
        Self {
            tokens: capacity,
            capacity,
            refill_rate,
            last_refill: now,
        }
    }

    pub fn tokens(&self) -> f64 {
        self.tokens
    }

    pub fn last_refill(&self) -> Instant {
        self.last_refill
    }

    /// Credits tokens for the time elapsed since the last accounting pass.
    ///
    /// A `now` earlier than `last_refill` credits nothing.
    pub fn refill(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last_refill).as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.refill_rate).min(self.capacity);
        if now > self.last_refill {
            self.last_refill = now;
        }
    }

    /// Refills, then takes one token if available.
    pub fn try_acquire(&mut self, now: Instant) -> bool {
        self.refill(now);

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_new_bucket_is_full() {
        let bucket = TokenBucket::new(10.0, 5.0, Instant::now());
        assert_eq!(bucket.tokens(), 10.0);
    }

    #[test]
    fn test_burst_then_deny() {
        let now = Instant::now();
        let mut bucket = TokenBucket::new(3.0, 1.0, now);

        assert!(bucket.try_acquire(now));
        assert!(bucket.try_acquire(now));
        assert!(bucket.try_acquire(now));
        assert!(!bucket.try_acquire(now));
        assert!(bucket.tokens() >= 0.0);
    }

    #[test]
    fn test_refill_is_capped() {
        let now = Instant::now();
        let mut bucket = TokenBucket::new(2.0, 100.0, now);
        bucket.try_acquire(now);

        bucket.refill(now + Duration::from_secs(60));
        assert_eq!(bucket.tokens(), 2.0);
    }

    #[test]
    fn test_fractional_refill() {
        let now = Instant::now();
        let mut bucket = TokenBucket::new(1.0, 2.0, now);
        assert!(bucket.try_acquire(now));

        // 0.25s at 2 tokens/s is half a token
        assert!(!bucket.try_acquire(now + Duration::from_millis(250)));
        assert!(bucket.try_acquire(now + Duration::from_millis(500)));
    }

    #[test]
    fn test_clock_going_backwards_credits_nothing() {
        let now = Instant::now() + Duration::from_secs(10);
        let mut bucket = TokenBucket::new(1.0, 1.0, now);
        assert!(bucket.try_acquire(now));

        assert!(!bucket.try_acquire(now - Duration::from_secs(5)));
        assert_eq!(bucket.last_refill(), now);
    }
}
