//! Pool snapshot parsing.

use alloy_primitives::U256;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet, HashSet};

use super::{
    address_field, bool_field_or, field, i64_field, opt_i64_field, opt_str_field, str_field,
    u64_field,
};
use crate::domain::{
    ChainId, CoreError, FixedPointAmount, NftCollectionRule, NftStandard, Pool, PoolDeal,
    PrivacyMode, TimeSec,
};

/// Parse a raw indexer pool record into a normalized `Pool`.
///
/// The chain id comes from the caller's context rather than the record so
/// the parser stays free of ambient state. `purchaseTokenDecimals` is
/// required; a record without it cannot express any amount correctly, so
/// parsing fails with `MissingDecimals` rather than guessing.
pub fn parse_pool(record: &Value, chain_id: ChainId) -> Result<Pool, CoreError> {
    let address = address_field(record, "address")?;

    let investment_token_decimals = match field(record, "purchaseTokenDecimals") {
        None => return Err(CoreError::MissingDecimals(address.to_string())),
        Some(_) => super::u8_field(record, "purchaseTokenDecimals")?,
    };

    let created_at = TimeSec::new(i64_field(record, "timestamp")?);
    let investment_deadline = opt_i64_field(record, "purchaseExpiry")?.map(TimeSec::new);

    let deal_record = field(record, "deal");
    let upfront_record = field(record, "upfrontDeal");
    if deal_record.is_some() && upfront_record.is_some() {
        return Err(CoreError::ConflictingDealPayloads);
    }

    // Upfront pools have no sponsor deadline to present a deal.
    let deal_deadline = if upfront_record.is_some() {
        None
    } else {
        let duration = u64_field(record, "duration")?;
        let purchase_duration = u64_field(record, "purchaseDuration")?;
        Some(created_at.plus(duration).plus(purchase_duration))
    };

    let nft_collection_rules = match field(record, "nftCollectionRules") {
        None => Vec::new(),
        Some(value) => parse_nft_rules(value, investment_token_decimals)?,
    };

    let privacy = if bool_field_or(record, "hasAllowList", false) {
        PrivacyMode::Private
    } else if !nft_collection_rules.is_empty() {
        PrivacyMode::NftGated
    } else {
        PrivacyMode::Public
    };

    let amount_field = |name: &str| -> Result<FixedPointAmount, CoreError> {
        match opt_str_field(record, name) {
            None => Ok(FixedPointAmount::zero(investment_token_decimals)),
            Some(raw) => FixedPointAmount::from_raw_str(raw, investment_token_decimals),
        }
    };

    let deal = match (deal_record, upfront_record) {
        (Some(deal), None) => {
            PoolDeal::Deal(super::parse_deal(deal, investment_token_decimals)?)
        }
        (None, Some(upfront)) => {
            PoolDeal::Upfront(super::parse_upfront_deal(upfront, investment_token_decimals)?)
        }
        _ => PoolDeal::None,
    };

    // The distribution hash may sit on the pool record or on the nested
    // upfront payload; pool-level wins when both are present.
    let ipfs_hash = opt_str_field(record, "ipfsHash")
        .or_else(|| upfront_record.and_then(|u| opt_str_field(u, "ipfsHash")))
        .map(str::to_string);

    Ok(Pool {
        address,
        chain_id,
        name: str_field(record, "name")?.to_string(),
        symbol: str_field(record, "symbol")?.to_string(),
        created_at,
        investment_deadline,
        deal_deadline,
        investment_token_address: address_field(record, "purchaseToken")?,
        investment_token_symbol: str_field(record, "purchaseTokenSymbol")?.to_string(),
        investment_token_decimals,
        cap: amount_field("purchaseTokenCap")?,
        total_deposited: amount_field("totalDeposited")?,
        total_withdrawn: amount_field("totalWithdrawn")?,
        total_redeemed: amount_field("totalRedeemed")?,
        privacy,
        nft_collection_rules,
        ipfs_hash,
        deal,
    })
}

fn parse_standard(raw: &str) -> Result<NftStandard, CoreError> {
    match raw.to_ascii_uppercase().as_str() {
        "ERC721" => Ok(NftStandard::Erc721),
        "ERC1155" => Ok(NftStandard::Erc1155),
        _ => Err(CoreError::UnsupportedNftStandard(raw.to_string())),
    }
}

fn parse_token_count(value: &Value) -> Result<U256, CoreError> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .map(U256::from)
            .ok_or_else(|| CoreError::InvalidNumberFormat(n.to_string())),
        Value::String(s) => U256::from_str_radix(s, 10)
            .map_err(|_| CoreError::InvalidNumberFormat(s.clone())),
        other => Err(CoreError::InvalidNumberFormat(other.to_string())),
    }
}

/// Parse the collection gating rules of an NFT-gated pool.
///
/// ERC1155 token-id minimums must be unique within a collection across
/// all of its rules; duplicates are a data error.
fn parse_nft_rules(
    value: &Value,
    investment_decimals: u8,
) -> Result<Vec<NftCollectionRule>, CoreError> {
    let entries = value.as_array().ok_or_else(|| {
        CoreError::MalformedRecord("nftCollectionRules must be an array".to_string())
    })?;

    let mut rules = Vec::with_capacity(entries.len());
    let mut seen_minimums: HashSet<(String, String)> = HashSet::new();

    for entry in entries {
        let collection_address = address_field(entry, "collectionAddress")?;
        let standard = parse_standard(str_field(entry, "nftType")?)?;

        let purchase_amount = match opt_str_field(entry, "purchaseAmount") {
            None => FixedPointAmount::zero(investment_decimals),
            Some(raw) => FixedPointAmount::from_raw_str(raw, investment_decimals)?,
        };

        let mut blacklisted_token_ids = BTreeSet::new();
        if let Some(ids) = field(entry, "blacklistedTokenIds").and_then(Value::as_array) {
            for id in ids {
                blacklisted_token_ids.insert(
                    id.as_str()
                        .map(str::to_string)
                        .unwrap_or_else(|| id.to_string()),
                );
            }
        }

        let mut token_id_minimums = BTreeMap::new();
        if standard == NftStandard::Erc1155 {
            let ids = field(entry, "tokenIds")
                .and_then(Value::as_array)
                .ok_or_else(|| {
                    CoreError::InvalidCollectionRule(format!(
                        "ERC1155 rule for {} has no tokenIds",
                        collection_address
                    ))
                })?;
            let minimums = field(entry, "minTokensEligible")
                .and_then(Value::as_array)
                .ok_or_else(|| {
                    CoreError::InvalidCollectionRule(format!(
                        "ERC1155 rule for {} has no minTokensEligible",
                        collection_address
                    ))
                })?;
            if ids.len() != minimums.len() {
                return Err(CoreError::InvalidCollectionRule(format!(
                    "tokenIds and minTokensEligible lengths differ for {}",
                    collection_address
                )));
            }
            for (id, minimum) in ids.iter().zip(minimums) {
                let id = id
                    .as_str()
                    .map(str::to_string)
                    .unwrap_or_else(|| id.to_string());
                let key = (collection_address.to_string(), id.clone());
                if !seen_minimums.insert(key) {
                    return Err(CoreError::InvalidCollectionRule(format!(
                        "duplicate token id {} for collection {}",
                        id, collection_address
                    )));
                }
                token_id_minimums.insert(id, parse_token_count(minimum)?);
            }
        }

        rules.push(NftCollectionRule {
            collection_address,
            standard,
            purchase_amount_per_token: bool_field_or(entry, "purchaseAmountPerToken", false),
            purchase_amount,
            blacklisted_token_ids,
            token_id_minimums,
        });
    }

    Ok(rules)
}
