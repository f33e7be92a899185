//! Configuration management for Floodgate.
//!
//! Every knob is readable from the environment (`MAX_REQUESTS`, `DELAY`,
//! `REDIS_URL`, ...) or overridable on the command line. Values are read
//! once at startup and constant thereafter.

use clap::Parser;
use std::net::SocketAddr;

use crate::error::{FloodgateError, Result};

/// Runtime settings for the Floodgate service.
#[derive(Parser, Debug, Clone)]
#[command(name = "floodgate", version, about = "Sliding-window admission control service")]
pub struct Settings {
    /// Address the HTTP server binds to
    #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:8080")]
    pub listen_addr: SocketAddr,

    /// Connection string for the backing window store
    #[arg(long, env = "REDIS_URL")]
    pub redis_url: String,

    /// Requests allowed per client in the trailing window
    #[arg(long, env = "MAX_REQUESTS", default_value_t = 15)]
    pub max_requests: u32,

    /// Penalty duration in seconds applied once a client exceeds the limit
    #[arg(long, env = "DELAY", default_value_t = 60)]
    pub delay: i64,

    /// Optional store-side TTL in seconds applied to each client's entry set.
    /// Unset means entries are never expired by the store.
    #[arg(long, env = "KEY_TTL")]
    pub key_ttl: Option<u64>,
}

impl Settings {
    /// Check invariants that clap's types alone cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.max_requests == 0 {
            return Err(FloodgateError::Config(
                "MAX_REQUESTS must be a positive integer".to_string(),
            ));
        }
        if self.delay <= 0 {
            return Err(FloodgateError::Config(
                "DELAY must be a positive number of seconds".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings =
            Settings::try_parse_from(["floodgate", "--redis-url", "redis://localhost:6379"])
                .unwrap();

        assert_eq!(settings.max_requests, 15);
        assert_eq!(settings.delay, 60);
        assert_eq!(settings.key_ttl, None);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_missing_store_url_is_fatal() {
        let result = Settings::try_parse_from(["floodgate"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_max_requests_rejected() {
        let settings = Settings::try_parse_from([
            "floodgate",
            "--redis-url",
            "redis://localhost:6379",
            "--max-requests",
            "0",
        ])
        .unwrap();

        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_negative_delay_rejected() {
        // Attached form so the value parses as a negative number and
        // validate() is what rejects it.
        let settings = Settings::try_parse_from([
            "floodgate",
            "--redis-url",
            "redis://localhost:6379",
            "--delay=-5",
        ])
        .unwrap();

        assert!(settings.validate().is_err());

        let settings = Settings::try_parse_from([
            "floodgate",
            "--redis-url",
            "redis://localhost:6379",
            "--delay=0",
        ])
        .unwrap();

        assert!(settings.validate().is_err());
    }
}
