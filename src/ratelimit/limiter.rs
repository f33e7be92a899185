//! Core rate limiter implementation.
//!
//! Sliding-window counting with an escalating penalty. The limiter holds
//! only configuration; every piece of mutable state lives in the window
//! store, so any number of limiter instances can share one store.

use tracing::{debug, trace};

use super::key::rate_limit_key;
use crate::error::{FloodgateError, Result};
use crate::store::WindowStore;

/// Length of the trailing request window. Fixed by design, not configurable.
pub const WINDOW_SECONDS: i64 = 60;

/// Configuration for a rate limit.
#[derive(Debug, Clone, Copy)]
pub struct LimitConfig {
    /// Maximum requests allowed in the window
    pub max_requests: u32,
    /// Penalty duration in seconds applied once the window is exhausted
    pub delay_secs: i64,
}

/// The outcome of one admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    /// The configured request limit
    pub limit: u32,
    /// Requests left in the window before this one is served
    pub remaining: u32,
    /// UNIX-seconds timestamp at which the client's state resets
    pub reset: i64,
    /// Whether the request must be refused
    pub rejected: bool,
}

/// The core rate limiter.
///
/// Stateless apart from its configuration; safe to share across tasks
/// behind an `Arc`.
pub struct RateLimiter<S> {
    store: S,
    limits: LimitConfig,
}

impl<S: WindowStore> RateLimiter<S> {
    /// Create a limiter over the given store.
    pub fn new(store: S, limits: LimitConfig) -> Self {
        Self { store, limits }
    }

    /// Get the configured limits.
    pub fn limits(&self) -> LimitConfig {
        self.limits
    }

    /// Decide whether to admit a request from `identifier` at time `now`.
    ///
    /// `now` is injected rather than read from a global clock so the
    /// decision is deterministic under test; callers pass UNIX seconds
    /// from a clock consistent with the store's.
    ///
    /// Performs one range count, then either records the admission or
    /// inspects the top score to serve or extend a penalty. At most one
    /// insert per call, never a delete; old entries age out of the count
    /// by falling behind the window.
    pub async fn check(&self, identifier: &str, now: i64) -> Result<Verdict> {
        if identifier.is_empty() {
            return Err(FloodgateError::InvalidInput(
                "client identifier must be non-empty".to_string(),
            ));
        }

        let key = rate_limit_key(identifier);
        let limit = self.limits.max_requests;

        let count = self
            .store
            .count_in_range(&key, now - WINDOW_SECONDS, now)
            .await?;
        trace!(key = %key, count = count, now = now, "Checked request window");

        if count < u64::from(limit) {
            // Normal flow: record the admission for future window counts.
            self.store.insert_score(&key, now).await?;
            return Ok(Verdict {
                limit,
                remaining: limit - count as u32,
                reset: now,
                rejected: false,
            });
        }

        // Window exhausted. The top score tells penalty state apart from
        // plain history: a score at or beyond `now` can only be a penalty
        // sentinel still in force.
        match self.store.max_score(&key).await? {
            Some(top) if top >= now => {
                trace!(key = %key, reset = top, "Client under active penalty");
                Ok(Verdict {
                    limit,
                    remaining: 0,
                    reset: top,
                    rejected: true,
                })
            }
            top => {
                // Newly over the limit: extend the cooldown from the last
                // recorded score. An empty set here means the count came
                // from state we cannot see; fall back to now.
                let penalty_until = top.unwrap_or(now) + self.limits.delay_secs;
                self.store.insert_score(&key, penalty_until).await?;
                debug!(
                    key = %key,
                    reset = penalty_until,
                    "Rate limit exceeded, penalty applied"
                );
                Ok(Verdict {
                    limit,
                    remaining: 0,
                    reset: penalty_until,
                    rejected: true,
                })
            }
        }
    }
}
