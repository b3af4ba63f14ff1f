//! Merkle allowlist entry shape and hash helpers.

use super::{Address, FixedPointAmount};

/// One account's entry in a merkle distribution document.
///
/// The proof is carried verbatim for on-chain verification elsewhere;
/// this core never verifies it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleAllowlistEntry {
    pub index: u64,
    pub account: Address,
    pub amount: FixedPointAmount,
    pub proof: Vec<String>,
}

/// True when a content hash denotes "no merkle gating": empty, or hex
/// zeros with or without a `0x` prefix.
pub fn is_zero_hash(hash: &str) -> bool {
    let digits = hash.strip_prefix("0x").unwrap_or(hash);
    digits.chars().all(|c| c == '0')
}
