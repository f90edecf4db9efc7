//! Token-bucket rate limiter keyed by client identity.

use std::sync::{Arc, PoisonError};
use std::time::{Duration, Instant};

use crate::domain::entities::TokenBucket;
use crate::domain::repositories::BucketStore;

/// Admits bursts up to `capacity` and a steady `refill_rate` requests/second
/// per client key.
///
/// Buckets are created lazily and refilled on access, so idle clients return
/// to full capacity without a background task. The refill-and-decide step for
/// one client runs under that client's bucket lock; different clients never
/// contend.
pub struct RateLimiter {
    store: Arc<dyn BucketStore>,
    capacity: f64,
    refill_rate: f64,
}

impl RateLimiter {
    /// Creates a limiter over `store`.
    ///
    /// # Arguments
    ///
    /// - `capacity` - maximum burst size
    /// - `refill_rate` - tokens credited per second
    pub fn new(capacity: f64, refill_rate: f64, store: Arc<dyn BucketStore>) -> Self {
        Self {
            store,
            capacity,
            refill_rate,
        }
    }

    /// Takes one token for `key`; `false` means the request must be denied.
    pub fn allow(&self, key: &str) -> bool {
        self.allow_at(key, Instant::now())
    }

    /// Same as [`Self::allow`] with an explicit clock reading.
    pub fn allow_at(&self, key: &str, now: Instant) -> bool {
        let bucket = self.store.get_or_create(key, &|| {
            TokenBucket::new(self.capacity, self.refill_rate, now)
        });

        // A panic while holding the lock cannot leave the bucket outside its
        // bounds, so a poisoned lock is still usable.
        let mut bucket = bucket.lock().unwrap_or_else(PoisonError::into_inner);
        bucket.try_acquire(now)
    }

    /// How long a bucket must sit untouched before it is back at full
    /// capacity and can be forgotten.
    pub fn idle_after(&self) -> Duration {
        if self.refill_rate <= 0.0 {
            return Duration::MAX;
        }
        // a tiny rate overflows `Duration`; such a bucket is never idle
        Duration::try_from_secs_f64(self.capacity / self.refill_rate).unwrap_or(Duration::MAX)
    }

    /// Forgets buckets that have fully refilled; returns how many were dropped.
    pub fn sweep(&self, now: Instant) -> usize {
        self.store.evict_idle(now, self.idle_after())
    }

    /// Number of clients currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.store.len()
    }
}
