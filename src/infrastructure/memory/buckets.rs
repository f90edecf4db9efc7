//! In-memory token bucket map.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::domain::entities::TokenBucket;
use crate::domain::repositories::{BucketStore, SharedBucket};

/// Per-client buckets keyed by client identity (usually an IP address).
///
/// The map lock is only held long enough to find or insert a bucket; the
/// refill-and-decide sequence runs under the bucket's own mutex.
#[derive(Debug, Default)]
pub struct MemoryBucketStore {
    buckets: DashMap<String, SharedBucket>,
}

impl MemoryBucketStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BucketStore for MemoryBucketStore {
    fn get_or_create(&self, key: &str, create: &dyn Fn() -> TokenBucket) -> SharedBucket {
        if let Some(bucket) = self.buckets.get(key) {
            return bucket.value().clone();
        }

        self.buckets
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(create())))
            .value()
            .clone()
    }

    fn evict_idle(&self, now: Instant, idle_for: Duration) -> usize {
        let before = self.buckets.len();
        // `retain` holds the shard write lock, and handles are only cloned
        // under a shard lock, so a bucket with another owner is mid-request
        self.buckets.retain(|_, bucket| {
            if Arc::strong_count(bucket) > 1 {
                return true;
            }
            let bucket = bucket.lock().unwrap_or_else(PoisonError::into_inner);
            now.saturating_duration_since(bucket.last_refill()) < idle_for
        });
        before.saturating_sub(self.buckets.len())
    }

    fn len(&self) -> usize {
        self.buckets.len()
    }
}
