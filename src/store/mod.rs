//! Window store abstraction and implementations.
//!
//! The store holds, per rate-limit key, a multiset of integer scores
//! (UNIX-seconds timestamps). The limiter only needs three operations,
//! so any backend with sorted-set semantics can sit behind this trait.

use async_trait::async_trait;

use crate::error::Result;

mod memory;
mod redis;

pub use memory::MemoryStore;
pub use redis::RedisStore;

/// Trait for window store implementations.
///
/// All three operations may fail with a store-unavailable error; the
/// limiter performs no retries and propagates failures to its caller.
#[async_trait]
pub trait WindowStore: Send + Sync {
    /// Count entries for `key` with a score in the closed range `[low, high]`.
    async fn count_in_range(&self, key: &str, low: i64, high: i64) -> Result<u64>;

    /// Add one entry for `key`. Duplicate scores are permitted and each
    /// counts separately (multiset semantics).
    async fn insert_score(&self, key: &str, score: i64) -> Result<()>;

    /// The highest score recorded for `key`, or `None` if the key has no
    /// entries.
    async fn max_score(&self, key: &str) -> Result<Option<i64>>;
}
