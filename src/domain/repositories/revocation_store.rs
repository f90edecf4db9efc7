//! Store contract for revoked refresh tokens.

use chrono::{DateTime, Utc};

/// Record of refresh tokens invalidated before their natural expiry.
///
/// Keys are raw token strings. No signature check happens on insert: a
/// malformed string is inert and never matches a real token.
///
/// Implementations must make every read-modify-write atomic with respect to
/// concurrent callers.
///
/// # Implementations
///
/// - [`crate::infrastructure::memory::MemoryRevocationStore`] - process-local map
pub trait RevocationStore: Send + Sync {
    /// Marks `token` revoked at `at`.
    ///
    /// Returns `true` if this call inserted the entry, `false` if the token
    /// was already revoked (the original timestamp is kept).
    fn mark_revoked(&self, token: &str, at: DateTime<Utc>) -> bool;

    /// Returns `true` if `token` has been revoked.
    fn is_revoked(&self, token: &str) -> bool;

    /// Drops entries revoked before `cutoff`; returns how many were removed.
    fn evict_before(&self, cutoff: DateTime<Utc>) -> usize;

    /// Number of tracked entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
