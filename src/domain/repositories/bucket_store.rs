//! Store contract for per-client token buckets.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::domain::entities::TokenBucket;

/// A bucket shared between concurrent requests from the same client.
///
/// Each bucket carries its own lock so that clients never contend with each
/// other.
pub type SharedBucket = Arc<Mutex<TokenBucket>>;

/// Keyed collection of token buckets.
///
/// # Implementations
///
/// - [`crate::infrastructure::memory::MemoryBucketStore`] - process-local map
pub trait BucketStore: Send + Sync {
    /// Returns the bucket for `key`, creating it with `create` on first use.
    ///
    /// Concurrent first requests for the same key must observe the same
    /// bucket.
    fn get_or_create(&self, key: &str, create: &dyn Fn() -> TokenBucket) -> SharedBucket;

    /// Drops buckets not refilled for at least `idle_for` as of `now`;
    /// returns how many were removed.
    ///
    /// A bucket handed out by `get_or_create` and still held by a caller is
    /// kept, so a request never spends from a bucket that left the store.
    fn evict_idle(&self, now: Instant, idle_for: Duration) -> usize;

    /// Number of tracked clients.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
