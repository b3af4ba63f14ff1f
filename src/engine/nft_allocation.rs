//! NFT eligibility & allocation engine.
//!
//! Evaluates a pool's collection gating rules against the NFTs the user
//! has selected for an investment action. Consumed-token-id tracking
//! across separate deposits is the caller's responsibility.

use crate::domain::{FixedPointAmount, NftCollectionRule, NftStandard, UserNftHolding};

/// The investable allocation derived from selected NFTs.
///
/// `unlimited` takes precedence over `amount`: an unlimited allocation is
/// not zero, it means no deposit cap at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NftAllocation {
    pub amount: FixedPointAmount,
    pub unlimited: bool,
}

/// Compute the total allocation the selected holdings grant under the
/// pool's collection rules.
///
/// ERC721 rules: a holding is eligible unless its token id is
/// blacklisted. Per-token rules contribute `purchase_amount` for every
/// eligible selected token; flat rules contribute it once if any selected
/// holding is eligible.
///
/// ERC1155 rules contribute no amount; instead, when every required
/// token-id/minimum pair across all ERC1155 rules is satisfied by some
/// selected holding, the whole allocation is flagged unlimited.
pub fn compute_nft_allocation(
    rules: &[NftCollectionRule],
    selected: &[UserNftHolding],
    investment_decimals: u8,
) -> NftAllocation {
    let mut amount = FixedPointAmount::zero(investment_decimals);
    let mut saw_erc1155 = false;
    let mut all_minimums_met = true;

    for rule in rules {
        let in_collection: Vec<&UserNftHolding> = selected
            .iter()
            .filter(|holding| {
                holding.standard == rule.standard
                    && holding.contract_address == rule.collection_address
            })
            .collect();

        match rule.standard {
            NftStandard::Erc721 => {
                let eligible = in_collection
                    .iter()
                    .filter(|holding| !rule.blacklisted_token_ids.contains(&holding.token_id))
                    .count();
                if eligible == 0 {
                    continue;
                }
                let contribution = if rule.purchase_amount_per_token {
                    rule.purchase_amount.scale(eligible as u64)
                } else {
                    rule.purchase_amount
                };
                amount = amount.add(&contribution);
            }
            NftStandard::Erc1155 => {
                saw_erc1155 = true;
                for (token_id, minimum) in &rule.token_id_minimums {
                    let satisfied = in_collection.iter().any(|holding| {
                        holding.token_id == *token_id
                            && holding.balance.map(|b| b >= *minimum).unwrap_or(false)
                    });
                    if !satisfied {
                        all_minimums_met = false;
                    }
                }
            }
        }
    }

    NftAllocation {
        amount,
        unlimited: saw_erc1155 && all_minimums_met,
    }
}

/// Render an allocation for display.
///
/// The display scale is pinned at 18 raw decimals and 4 visible digits
/// regardless of the investment token's actual decimals.
pub fn format_allocation(allocation: &NftAllocation) -> String {
    if allocation.unlimited {
        return "unlimited".to_string();
    }
    FixedPointAmount::new(allocation.amount.raw(), 18).format(4)
}
