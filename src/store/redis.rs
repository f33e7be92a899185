//! Redis-backed window store.
//!
//! Each rate-limit key maps to a sorted set whose scores are UNIX-seconds
//! timestamps. Members carry a random suffix so two requests landing in
//! the same second remain distinct entries (multiset semantics).

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::debug;
use uuid::Uuid;

use super::WindowStore;
use crate::error::Result;

/// A window store backed by Redis sorted sets.
///
/// Cheap to clone; the underlying connection manager multiplexes and
/// reconnects on its own. Failed commands surface as store-unavailable
/// errors without retry.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
    /// Key-level TTL applied after each insert, if configured. This is the
    /// only pruning the deployment gets; the limiter itself never deletes.
    key_ttl: Option<u64>,
}

impl RedisStore {
    /// Connect to the store at `url`.
    pub async fn connect(url: &str, key_ttl: Option<u64>) -> Result<Self> {
        let client = redis::Client::open(url)?;
        let conn = client.get_connection_manager().await?;
        debug!(ttl = ?key_ttl, "Connected to window store");
        Ok(Self { conn, key_ttl })
    }
}

#[async_trait]
impl WindowStore for RedisStore {
    async fn count_in_range(&self, key: &str, low: i64, high: i64) -> Result<u64> {
        let mut conn = self.conn.clone();
        let count: u64 = conn.zcount(key, low, high).await?;
        Ok(count)
    }

    async fn insert_score(&self, key: &str, score: i64) -> Result<()> {
        let mut conn = self.conn.clone();
        let member = format!("{}:{}", score, Uuid::new_v4());
        let _: i64 = conn.zadd(key, member, score).await?;

        if let Some(ttl) = self.key_ttl {
            let _: bool = conn.expire(key, ttl as i64).await?;
        }
        Ok(())
    }

    async fn max_score(&self, key: &str) -> Result<Option<i64>> {
        let mut conn = self.conn.clone();
        let top: Vec<(String, i64)> = conn.zrevrange_withscores(key, 0, 0).await?;
        Ok(top.first().map(|(_, score)| *score))
    }
}
