//! Domain types for the pool lifecycle & eligibility core.
//!
//! This module provides:
//! - Decimal-aware token amounts backed by U256 (FixedPointAmount)
//! - Domain primitives: TimeSec, ChainId, Address
//! - Pool / Deal / UpfrontDeal value objects with derived date math
//! - NFT gating rules and user holdings
//! - Merkle allowlist entry shape
//!
//! Everything here is an immutable value object: on-chain state changes
//! produce a new `Pool` via re-parsing, never an in-place mutation.

pub mod allowlist;
pub mod amount;
pub mod deal;
pub mod nft;
pub mod pool;
pub mod primitives;

pub use allowlist::{is_zero_hash, MerkleAllowlistEntry};
pub use amount::FixedPointAmount;
pub use deal::{
    Deal, ExchangeRates, RedemptionPeriod, RedemptionWindow, UnderlyingToken, UpfrontDeal,
    VestingSchedule,
};
pub use nft::{NftCollectionRule, NftStandard, UserNftHolding};
pub use pool::{Pool, PoolDeal, PrivacyMode};
pub use primitives::{Address, AddressParseError, ChainId, TimeSec};

use thiserror::Error;

/// Error type for the pure computation core.
///
/// Every failure is scoped to a single pool/user computation; there is no
/// partial state to roll back and no fatal/process-level class.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A raw amount string is not a non-negative base-10 integer.
    #[error("invalid number format: {0:?}")]
    InvalidNumberFormat(String),
    /// Degenerate exchange-rate or amount inputs.
    #[error("division by zero")]
    DivisionByZero,
    /// A pool snapshot is missing required purchase-token decimal metadata.
    #[error("missing purchase token decimals for pool {0}")]
    MissingDecimals(String),
    /// A merkle distribution document does not match the expected shape.
    #[error("invalid distribution format: {0}")]
    InvalidDistributionFormat(String),
    /// A collection rule references neither ERC721 nor ERC1155 semantics.
    #[error("unsupported NFT standard: {0:?}")]
    UnsupportedNftStandard(String),
    /// A collection rule violates the gating-rule invariants, e.g. duplicate
    /// ERC1155 token-id minimums within one collection.
    #[error("invalid collection rule: {0}")]
    InvalidCollectionRule(String),
    /// A pool record carries both a deal and an upfront-deal payload.
    #[error("pool record carries both deal and upfront deal payloads")]
    ConflictingDealPayloads,
    /// A pool or deal record is missing a field or has a field of the
    /// wrong type.
    #[error("malformed record: {0}")]
    MalformedRecord(String),
}
