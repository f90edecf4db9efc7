//! In-memory revocation set.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::domain::repositories::RevocationStore;

/// Maps raw refresh-token strings to the time they were revoked.
#[derive(Debug, Default)]
pub struct MemoryRevocationStore {
    entries: DashMap<String, DateTime<Utc>>,
}

impl MemoryRevocationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Revocation time of `token`, if any.
    pub fn revoked_at(&self, token: &str) -> Option<DateTime<Utc>> {
        self.entries.get(token).map(|entry| *entry.value())
    }
}

impl RevocationStore for MemoryRevocationStore {
    fn mark_revoked(&self, token: &str, at: DateTime<Utc>) -> bool {
        match self.entries.entry(token.to_string()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(at);
                true
            }
        }
    }

    fn is_revoked(&self, token: &str) -> bool {
        self.entries.contains_key(token)
    }

    fn evict_before(&self, cutoff: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, revoked_at| *revoked_at >= cutoff);
        before.saturating_sub(self.entries.len())
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::sync::Arc;

    #[test]
    fn test_mark_is_idempotent() {
        let store = MemoryRevocationStore::new();
        let first = Utc::now();

        assert!(store.mark_revoked("tok", first));
        assert!(!store.mark_revoked("tok", first + Duration::seconds(5)));

        assert!(store.is_revoked("tok"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.revoked_at("tok"), Some(first));
    }

    #[test]
    fn test_unknown_token_not_revoked() {
        let store = MemoryRevocationStore::new();
        assert!(!store.is_revoked("never-seen"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_evict_before() {
        let store = MemoryRevocationStore::new();
        let now = Utc::now();
        store.mark_revoked("old", now - Duration::days(8));
        store.mark_revoked("recent", now - Duration::hours(1));

        let removed = store.evict_before(now - Duration::days(7));

        assert_eq!(removed, 1);
        assert!(!store.is_revoked("old"));
        assert!(store.is_revoked("recent"));
    }

    #[test]
    fn test_concurrent_marks_single_winner() {
        let store = Arc::new(MemoryRevocationStore::new());
        let now = Utc::now();

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || store.mark_revoked("contested", now))
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count();

        assert_eq!(winners, 1);
    }
}
