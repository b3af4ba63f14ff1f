use alloy_primitives::U256;
use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use super::pools::{fetch_parsed_pool, parse_address_param};
use super::AppState;
use crate::domain::{ChainId, NftStandard, PrivacyMode, UserNftHolding};
use crate::engine::{compute_nft_allocation, format_allocation};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationRequest {
    pub holdings: Vec<HoldingDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingDto {
    pub contract_address: String,
    pub token_id: String,
    pub standard: String,
    /// Held balance as a decimal string, ERC1155 only.
    pub balance: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationResponse {
    pub allocation: String,
    pub formatted: String,
    pub unlimited: bool,
}

pub async fn post_nft_allocation(
    Path((chain_id, address)): Path<(u64, String)>,
    State(state): State<AppState>,
    Json(request): Json<AllocationRequest>,
) -> Result<Json<AllocationResponse>, AppError> {
    let address = parse_address_param(&address)?;
    let pool = fetch_parsed_pool(&state, ChainId::new(chain_id), &address).await?;

    if pool.privacy != PrivacyMode::NftGated {
        return Err(AppError::BadRequest(
            "Pool is not NFT-gated".to_string(),
        ));
    }

    let selected = request
        .holdings
        .iter()
        .map(parse_holding)
        .collect::<Result<Vec<_>, _>>()?;

    let allocation = compute_nft_allocation(
        &pool.nft_collection_rules,
        &selected,
        pool.investment_token_decimals,
    );

    Ok(Json(AllocationResponse {
        allocation: allocation.amount.raw_string(),
        formatted: format_allocation(&allocation),
        unlimited: allocation.unlimited,
    }))
}

fn parse_holding(dto: &HoldingDto) -> Result<UserNftHolding, AppError> {
    let contract_address = parse_address_param(&dto.contract_address)?;
    let standard = match dto.standard.to_uppercase().as_str() {
        "ERC721" | "721" => NftStandard::Erc721,
        "ERC1155" | "1155" => NftStandard::Erc1155,
        other => {
            return Err(AppError::BadRequest(format!(
                "Unsupported NFT standard: {}",
                other
            )))
        }
    };
    let balance = dto
        .balance
        .as_deref()
        .map(|s| {
            U256::from_str_radix(s, 10)
                .map_err(|_| AppError::BadRequest(format!("Invalid balance: {}", s)))
        })
        .transpose()?;

    Ok(UserNftHolding {
        contract_address,
        token_id: dto.token_id.clone(),
        standard,
        balance,
    })
}
