use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use super::pools::{fetch_parsed_pool, parse_address_param};
use super::AppState;
use crate::domain::ChainId;
use crate::engine::{lookup_allowlist, AllowlistStatus};
use crate::error::AppError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllowlistResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<AllowlistEntryDto>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllowlistEntryDto {
    pub index: u64,
    pub account: String,
    pub amount: String,
    pub proof: Vec<String>,
}

pub async fn get_allowlist_status(
    Path((chain_id, address, account)): Path<(u64, String, String)>,
    State(state): State<AppState>,
) -> Result<Json<AllowlistResponse>, AppError> {
    let address = parse_address_param(&address)?;
    let account = parse_address_param(&account)?;
    let pool = fetch_parsed_pool(&state, ChainId::new(chain_id), &address).await?;

    // Ungated pools never touch the merkle store.
    if !pool.is_merkle_gated() {
        return Ok(Json(AllowlistResponse {
            status: "notGated".to_string(),
            entry: None,
        }));
    }

    // is_merkle_gated implies a non-zero hash is present
    let ipfs_hash = pool
        .ipfs_hash
        .as_deref()
        .ok_or_else(|| AppError::Internal("Merkle-gated pool without ipfs hash".to_string()))?;

    let document = state.merkle_store.fetch_distribution(ipfs_hash).await?;
    let status = lookup_allowlist(&document, &account, pool.investment_token_decimals)?;

    let response = match status {
        AllowlistStatus::NotGated => AllowlistResponse {
            status: "notGated".to_string(),
            entry: None,
        },
        AllowlistStatus::NotEligible => AllowlistResponse {
            status: "notEligible".to_string(),
            entry: None,
        },
        AllowlistStatus::Eligible(entry) => AllowlistResponse {
            status: "eligible".to_string(),
            entry: Some(AllowlistEntryDto {
                index: entry.index,
                account: entry.account.as_str().to_string(),
                amount: entry.amount.raw_string(),
                proof: entry.proof,
            }),
        },
    };

    Ok(Json(response))
}
