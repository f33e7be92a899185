//! Core admission-control logic.

mod key;
mod limiter;

pub use key::rate_limit_key;
pub use limiter::{LimitConfig, RateLimiter, Verdict, WINDOW_SECONDS};
