//! In-memory window store.
//!
//! A process-local multiset keyed by rate-limit key. Suitable for
//! single-replica deployments and as a deterministic test double for the
//! limiter; it never fails.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use parking_lot::RwLock;

use super::WindowStore;
use crate::error::Result;

/// An in-memory window store backed by per-key ordered multisets.
///
/// Each key maps to a `BTreeMap<score, occurrences>`, so duplicate scores
/// count separately and range/max queries stay ordered.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, BTreeMap<i64, u64>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of entries recorded for `key`, across all scores.
    ///
    /// This is primarily useful for testing unbounded-growth behavior.
    pub fn entry_count(&self, key: &str) -> u64 {
        let entries = self.entries.read();
        entries
            .get(key)
            .map(|set| set.values().sum())
            .unwrap_or(0)
    }
}

#[async_trait]
impl WindowStore for MemoryStore {
    async fn count_in_range(&self, key: &str, low: i64, high: i64) -> Result<u64> {
        if low > high {
            return Ok(0);
        }
        let entries = self.entries.read();
        let count = entries
            .get(key)
            .map(|set| set.range(low..=high).map(|(_, n)| n).sum())
            .unwrap_or(0);
        Ok(count)
    }

    async fn insert_score(&self, key: &str, score: i64) -> Result<()> {
        let mut entries = self.entries.write();
        let set = entries.entry(key.to_string()).or_default();
        *set.entry(score).or_insert(0) += 1;
        Ok(())
    }

    async fn max_score(&self, key: &str) -> Result<Option<i64>> {
        let entries = self.entries.read();
        let max = entries
            .get(key)
            .and_then(|set| set.keys().next_back().copied());
        Ok(max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_key_has_no_entries() {
        let store = MemoryStore::new();

        assert_eq!(store.count_in_range("k", 0, 100).await.unwrap(), 0);
        assert_eq!(store.max_score("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_count_range_is_inclusive() {
        let store = MemoryStore::new();
        for score in [10, 20, 30] {
            store.insert_score("k", score).await.unwrap();
        }

        // Both bounds included
        assert_eq!(store.count_in_range("k", 10, 30).await.unwrap(), 3);
        assert_eq!(store.count_in_range("k", 11, 30).await.unwrap(), 2);
        assert_eq!(store.count_in_range("k", 10, 29).await.unwrap(), 2);
        assert_eq!(store.count_in_range("k", 11, 29).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_scores_count_separately() {
        let store = MemoryStore::new();
        store.insert_score("k", 42).await.unwrap();
        store.insert_score("k", 42).await.unwrap();
        store.insert_score("k", 42).await.unwrap();

        assert_eq!(store.count_in_range("k", 42, 42).await.unwrap(), 3);
        assert_eq!(store.entry_count("k"), 3);
    }

    #[tokio::test]
    async fn test_max_score() {
        let store = MemoryStore::new();
        store.insert_score("k", 5).await.unwrap();
        store.insert_score("k", 99).await.unwrap();
        store.insert_score("k", 12).await.unwrap();

        assert_eq!(store.max_score("k").await.unwrap(), Some(99));
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let store = MemoryStore::new();
        store.insert_score("a", 1).await.unwrap();
        store.insert_score("b", 2).await.unwrap();

        assert_eq!(store.count_in_range("a", 0, 10).await.unwrap(), 1);
        assert_eq!(store.count_in_range("b", 0, 10).await.unwrap(), 1);
        assert_eq!(store.max_score("a").await.unwrap(), Some(1));
    }
}
