//! Merkle allowlist resolution.
//!
//! Resolves an address against a merkle distribution document. The zero
//! hash means "not merkle-gated" and must be checked by the caller before
//! any document fetch; this module only inspects documents that exist.
//! No proof verification happens here; proofs are passed through verbatim
//! for on-chain use.

use alloy_primitives::U256;
use serde_json::Value;

use crate::domain::{Address, CoreError, FixedPointAmount, MerkleAllowlistEntry};

/// Outcome of resolving an address against a pool's merkle gating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowlistStatus {
    /// The pool has no merkle gating at all (zero/absent hash).
    /// Distinct from being ineligible.
    NotGated,
    /// The address appears in the distribution.
    Eligible(MerkleAllowlistEntry),
    /// The distribution exists but does not include the address.
    NotEligible,
}

fn claims_map(document: &Value) -> Result<&serde_json::Map<String, Value>, CoreError> {
    // Accept either the full distribution document (with a `claims`
    // wrapper) or the bare address map.
    if let Some(claims) = document.get("claims") {
        return claims.as_object().ok_or_else(|| {
            CoreError::InvalidDistributionFormat("claims is not an object".to_string())
        });
    }
    document.as_object().ok_or_else(|| {
        CoreError::InvalidDistributionFormat("distribution is not an object".to_string())
    })
}

fn parse_amount(value: &Value, decimals: u8) -> Result<FixedPointAmount, CoreError> {
    match value {
        Value::String(s) => {
            let raw = if let Some(hex_digits) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X"))
            {
                U256::from_str_radix(hex_digits, 16)
                    .map_err(|_| CoreError::InvalidDistributionFormat(format!("amount {:?}", s)))?
            } else {
                U256::from_str_radix(s, 10)
                    .map_err(|_| CoreError::InvalidDistributionFormat(format!("amount {:?}", s)))?
            };
            Ok(FixedPointAmount::new(raw, decimals))
        }
        Value::Number(n) => n
            .as_u64()
            .map(|v| FixedPointAmount::new(U256::from(v), decimals))
            .ok_or_else(|| {
                CoreError::InvalidDistributionFormat(format!("amount {}", n))
            }),
        other => Err(CoreError::InvalidDistributionFormat(format!(
            "amount {}",
            other
        ))),
    }
}

fn parse_entry(
    account: &Address,
    entry: &Value,
    decimals: u8,
) -> Result<MerkleAllowlistEntry, CoreError> {
    let index = entry
        .get("index")
        .and_then(Value::as_u64)
        .ok_or_else(|| CoreError::InvalidDistributionFormat("missing claim index".to_string()))?;

    let amount = parse_amount(
        entry.get("amount").ok_or_else(|| {
            CoreError::InvalidDistributionFormat("missing claim amount".to_string())
        })?,
        decimals,
    )?;

    let proof_values = entry
        .get("proof")
        .and_then(Value::as_array)
        .ok_or_else(|| CoreError::InvalidDistributionFormat("missing claim proof".to_string()))?;
    let mut proof = Vec::with_capacity(proof_values.len());
    for hash in proof_values {
        proof.push(
            hash.as_str()
                .ok_or_else(|| {
                    CoreError::InvalidDistributionFormat("non-string proof element".to_string())
                })?
                .to_string(),
        );
    }

    Ok(MerkleAllowlistEntry {
        index,
        account: account.clone(),
        amount,
        proof,
    })
}

/// Look an address up in a fetched distribution document.
///
/// Matching is case-insensitive on the document keys; the returned amount
/// is expressed at the pool's investment-token decimals. Only ever
/// returns `Eligible` or `NotEligible`; `NotGated` is decided before a
/// document is fetched.
///
/// # Errors
/// `InvalidDistributionFormat` when the document or the matched entry
/// does not have the expected shape.
pub fn lookup_allowlist(
    document: &Value,
    account: &Address,
    investment_decimals: u8,
) -> Result<AllowlistStatus, CoreError> {
    let claims = claims_map(document)?;

    for (key, entry) in claims {
        if account.matches(key) {
            let entry = parse_entry(account, entry, investment_decimals)?;
            return Ok(AllowlistStatus::Eligible(entry));
        }
    }
    Ok(AllowlistStatus::NotEligible)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn account() -> Address {
        Address::parse("0x1111111111111111111111111111111111111111").unwrap()
    }

    fn distribution() -> Value {
        json!({
            "merkleRoot": "0xdeadbeef00000000000000000000000000000000000000000000000000000000",
            "tokenTotal": "0x64",
            "claims": {
                "0x1111111111111111111111111111111111111111": {
                    "index": 0,
                    "amount": "0x2710",
                    "proof": [
                        "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"
                    ]
                }
            }
        })
    }

    #[test]
    fn test_lookup_eligible() {
        let status = lookup_allowlist(&distribution(), &account(), 6).unwrap();
        match status {
            AllowlistStatus::Eligible(entry) => {
                assert_eq!(entry.index, 0);
                assert_eq!(entry.amount.raw_string(), "10000");
                assert_eq!(entry.amount.decimals(), 6);
                assert_eq!(entry.proof.len(), 1);
            }
            other => panic!("expected eligible, got {:?}", other),
        }
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let document = json!({
            "claims": {
                "0x1111111111111111111111111111111111111111": {
                    "index": 3,
                    "amount": "500000",
                    "proof": []
                }
            }
        });
        // Account parsed from a checksummed string still matches.
        let checksummed = Address::parse("0x1111111111111111111111111111111111111111").unwrap();
        let status = lookup_allowlist(&document, &checksummed, 6).unwrap();
        assert!(matches!(status, AllowlistStatus::Eligible(_)));
    }

    #[test]
    fn test_lookup_uppercase_document_keys() {
        // Document keyed by a checksummed (mixed-case) address.
        let mut claims = serde_json::Map::new();
        claims.insert(
            "0x1111111111111111111111111111111111111111".to_uppercase(),
            json!({ "index": 1, "amount": "42", "proof": [] }),
        );
        let document = Value::Object(claims);
        let status = lookup_allowlist(&document, &account(), 18).unwrap();
        assert!(matches!(status, AllowlistStatus::Eligible(_)));
    }

    #[test]
    fn test_lookup_not_eligible() {
        let other = Address::parse("0x2222222222222222222222222222222222222222").unwrap();
        let status = lookup_allowlist(&distribution(), &other, 6).unwrap();
        assert_eq!(status, AllowlistStatus::NotEligible);
    }

    #[test]
    fn test_lookup_rejects_non_object() {
        let result = lookup_allowlist(&json!([1, 2, 3]), &account(), 6);
        assert!(matches!(
            result,
            Err(CoreError::InvalidDistributionFormat(_))
        ));
    }

    #[test]
    fn test_lookup_rejects_malformed_entry() {
        let document = json!({
            "claims": {
                "0x1111111111111111111111111111111111111111": { "index": 0 }
            }
        });
        let result = lookup_allowlist(&document, &account(), 6);
        assert!(matches!(
            result,
            Err(CoreError::InvalidDistributionFormat(_))
        ));
    }

    #[test]
    fn test_lookup_decimal_amount_string() {
        let document = json!({
            "claims": {
                "0x1111111111111111111111111111111111111111": {
                    "index": 2,
                    "amount": "123456",
                    "proof": []
                }
            }
        });
        match lookup_allowlist(&document, &account(), 6).unwrap() {
            AllowlistStatus::Eligible(entry) => assert_eq!(entry.amount.raw_string(), "123456"),
            other => panic!("expected eligible, got {:?}", other),
        }
    }
}
