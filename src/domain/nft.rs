//! NFT gating rules and user holdings.

use alloy_primitives::U256;
use std::collections::{BTreeMap, BTreeSet};

use super::{Address, FixedPointAmount};

/// The two NFT contract standards a gating rule can reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NftStandard {
    Erc721,
    Erc1155,
}

impl std::fmt::Display for NftStandard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NftStandard::Erc721 => write!(f, "ERC721"),
            NftStandard::Erc1155 => write!(f, "ERC1155"),
        }
    }
}

/// One collection-level gating rule on an NFT-gated pool.
///
/// `blacklisted_token_ids` applies to ERC721 rules only;
/// `token_id_minimums` applies to ERC1155 rules only. Within one
/// collection, no token id may appear in more than one rule's minimums.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NftCollectionRule {
    pub collection_address: Address,
    pub standard: NftStandard,
    /// True: each eligible token grants `purchase_amount`.
    /// False: holding any eligible token grants `purchase_amount` once.
    pub purchase_amount_per_token: bool,
    pub purchase_amount: FixedPointAmount,
    pub blacklisted_token_ids: BTreeSet<String>,
    /// Minimum held balance per token id for the holding to count.
    pub token_id_minimums: BTreeMap<String, U256>,
}

/// An NFT the user holds and has selected for an investment action.
///
/// Ephemeral, supplied per request by the caller; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserNftHolding {
    pub contract_address: Address,
    pub token_id: String,
    pub standard: NftStandard,
    /// Held balance, ERC1155 only.
    pub balance: Option<U256>,
}
