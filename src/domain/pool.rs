//! The normalized Pool entity.

use super::{
    is_zero_hash, Address, ChainId, Deal, FixedPointAmount, NftCollectionRule, TimeSec, UpfrontDeal,
};

/// Who may invest in a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrivacyMode {
    /// Anyone may invest.
    Public,
    /// Sponsor-maintained allowlist.
    Private,
    /// Investment gated or scaled by NFT ownership.
    NftGated,
}

impl std::fmt::Display for PrivacyMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrivacyMode::Public => write!(f, "public"),
            PrivacyMode::Private => write!(f, "private"),
            PrivacyMode::NftGated => write!(f, "nftGated"),
        }
    }
}

/// The deal attached to a pool, if any.
///
/// A pool carries at most one of the two variants; the indexer invariant
/// "never both" is asserted at parse time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoolDeal {
    None,
    Deal(Deal),
    Upfront(UpfrontDeal),
}

impl PoolDeal {
    pub fn is_upfront(&self) -> bool {
        matches!(self, PoolDeal::Upfront(_))
    }
}

/// A funding pool, normalized from one indexer snapshot.
///
/// Immutable value object: any change in on-chain state produces a new
/// `Pool` via re-parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pool {
    pub address: Address,
    pub chain_id: ChainId,
    pub name: String,
    pub symbol: String,

    pub created_at: TimeSec,
    /// End of the investment window; `None` for upfront-deal pools.
    pub investment_deadline: Option<TimeSec>,
    /// Deadline for a sponsor to present a deal; `None` for upfront pools.
    pub deal_deadline: Option<TimeSec>,

    pub investment_token_address: Address,
    pub investment_token_symbol: String,
    pub investment_token_decimals: u8,
    /// Deposit cap; a raw value of zero means uncapped, not a zero cap.
    pub cap: FixedPointAmount,
    pub total_deposited: FixedPointAmount,
    pub total_withdrawn: FixedPointAmount,
    pub total_redeemed: FixedPointAmount,

    pub privacy: PrivacyMode,
    pub nft_collection_rules: Vec<NftCollectionRule>,
    /// Content hash of the merkle distribution document, if any.
    pub ipfs_hash: Option<String>,

    pub deal: PoolDeal,
}

impl Pool {
    /// True when deposits are not capped (`cap.raw == 0`).
    pub fn is_uncapped(&self) -> bool {
        self.cap.is_zero()
    }

    /// True when investment eligibility is gated by a merkle distribution.
    /// Orthogonal to `privacy`.
    pub fn is_merkle_gated(&self) -> bool {
        self.ipfs_hash
            .as_deref()
            .map(|hash| !is_zero_hash(hash))
            .unwrap_or(false)
    }
}
