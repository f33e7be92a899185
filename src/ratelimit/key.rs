//! Rate-limit key derivation.

use sha2::{Digest, Sha256};

/// Derive the store partition key for a client identifier.
///
/// The identifier is hashed so the store never holds raw addresses; the
/// digest is one-way and stable for the process lifetime, which is all
/// the partitioning needs.
pub fn rate_limit_key(identifier: &str) -> String {
    format!("{:x}", Sha256::digest(identifier.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_is_stable() {
        assert_eq!(rate_limit_key("10.0.0.1"), rate_limit_key("10.0.0.1"));
    }

    #[test]
    fn test_key_is_fixed_length() {
        // SHA-256 hex digest
        assert_eq!(rate_limit_key("a").len(), 64);
        assert_eq!(rate_limit_key("a much longer client identifier").len(), 64);
    }

    #[test]
    fn test_distinct_identifiers_get_distinct_keys() {
        assert_ne!(rate_limit_key("10.0.0.1"), rate_limit_key("10.0.0.2"));
    }

    #[test]
    fn test_key_does_not_contain_identifier() {
        let key = rate_limit_key("203.0.113.7");
        assert!(!key.contains("203.0.113.7"));
    }
}
