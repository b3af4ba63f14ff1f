//! Domain primitives: TimeSec, ChainId, Address.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Time in seconds since Unix epoch.
///
/// Stage and redemption computations never read the wall clock; the caller
/// samples "now" once and threads it through as a `TimeSec`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeSec(pub i64);

impl TimeSec {
    /// Create a TimeSec from seconds.
    pub fn new(secs: i64) -> Self {
        TimeSec(secs)
    }

    /// Get the underlying seconds value.
    pub fn as_i64(&self) -> i64 {
        self.0
    }

    /// Shift forward by a duration in seconds.
    pub fn plus(&self, duration_secs: u64) -> Self {
        TimeSec(self.0.saturating_add(duration_secs as i64))
    }
}

/// EVM chain identifier (1 = mainnet, 10 = optimism, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChainId(pub u64);

impl ChainId {
    /// Create a ChainId.
    pub fn new(id: u64) -> Self {
        ChainId(id)
    }

    /// Get the underlying chain id.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ChainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when an address string does not parse.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddressParseError {
    /// Missing the `0x` prefix.
    #[error("address must start with 0x: {0:?}")]
    MissingPrefix(String),
    /// Wrong length or non-hex characters after the prefix.
    #[error("address must be 20 bytes of hex: {0:?}")]
    InvalidHex(String),
}

/// Wallet or contract address, normalized to lowercase hex.
///
/// Normalizing at the boundary makes every downstream comparison (merkle
/// allowlist keys, NFT collection matching) case-insensitive for free.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address(String);

impl Address {
    /// Parse and normalize an address string.
    pub fn parse(input: &str) -> Result<Self, AddressParseError> {
        let hex_part = input
            .strip_prefix("0x")
            .or_else(|| input.strip_prefix("0X"))
            .ok_or_else(|| AddressParseError::MissingPrefix(input.to_string()))?;
        let bytes =
            hex::decode(hex_part).map_err(|_| AddressParseError::InvalidHex(input.to_string()))?;
        if bytes.len() != 20 {
            return Err(AddressParseError::InvalidHex(input.to_string()));
        }
        Ok(Address(format!("0x{}", hex_part.to_lowercase())))
    }

    /// Get the normalized address as a string reference.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Compare against an arbitrarily-cased address string.
    pub fn matches(&self, other: &str) -> bool {
        self.0 == other.to_lowercase()
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_normalizes_case() {
        let upper = Address::parse("0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2").unwrap();
        let lower = Address::parse("0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2").unwrap();
        assert_eq!(upper, lower);
        assert_eq!(upper.as_str(), "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2");
    }

    #[test]
    fn test_address_rejects_missing_prefix() {
        let result = Address::parse("c02aaa39b223fe8d0a0e5c4f27ead9083c756cc2");
        assert!(matches!(result, Err(AddressParseError::MissingPrefix(_))));
    }

    #[test]
    fn test_address_rejects_bad_length() {
        let result = Address::parse("0x1234");
        assert!(matches!(result, Err(AddressParseError::InvalidHex(_))));
    }

    #[test]
    fn test_address_rejects_non_hex() {
        let result = Address::parse("0xzz2aaa39b223fe8d0a0e5c4f27ead9083c756cc2");
        assert!(matches!(result, Err(AddressParseError::InvalidHex(_))));
    }

    #[test]
    fn test_address_matches_any_case() {
        let addr = Address::parse("0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2").unwrap();
        assert!(addr.matches("0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"));
        assert!(!addr.matches("0xdac17f958d2ee523a2206206994597c13d831ec7"));
    }

    #[test]
    fn test_timesec_plus() {
        let t = TimeSec::new(1000);
        assert_eq!(t.plus(3600), TimeSec::new(4600));
    }

    #[test]
    fn test_timesec_ordering() {
        assert!(TimeSec::new(1000) < TimeSec::new(2000));
    }

    #[test]
    fn test_chain_id_display() {
        assert_eq!(ChainId::new(10).to_string(), "10");
    }
}
