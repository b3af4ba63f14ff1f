use axum::extract::{Path, Query, State};
use axum::Json;
use futures::future::join_all;
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::domain::{Address, ChainId, Pool, PoolDeal, TimeSec};
use crate::engine::pool_stage;
use crate::error::AppError;
use crate::parse::parse_pool;

#[derive(Debug, Deserialize)]
pub struct StageQuery {
    /// Optional unix-seconds override for "now", for historical reads.
    pub at: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolResponse {
    pub address: String,
    pub chain_id: u64,
    pub name: String,
    pub symbol: String,
    pub stage: String,
    pub privacy: String,
    pub created_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub investment_deadline: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deal_deadline: Option<i64>,
    pub investment_token: TokenDto,
    /// Raw deposit cap; `null` when the pool is uncapped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cap: Option<String>,
    pub total_deposited: String,
    pub total_withdrawn: String,
    pub total_redeemed: String,
    pub merkle_gated: bool,
    pub nft_gated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deal: Option<DealDto>,
    pub evaluated_at: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenDto {
    pub address: String,
    pub symbol: String,
    pub decimals: u8,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DealDto {
    pub deal_type: String,
    pub underlying_token: TokenDto,
    pub underlying_total: String,
    pub investment_per_deal: String,
    pub deal_per_investment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redemption_period: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redemption_start: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redemption_end: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vesting_cliff_end: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vesting_end: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub holder_funded: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_raise_minimum: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allows_deallocation: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_users_accepted: Option<u64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedPoolsResponse {
    pub pools: Vec<PoolResponse>,
    pub errors: Vec<TrackedPoolError>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedPoolError {
    pub chain_id: u64,
    pub address: String,
    pub error: String,
}

pub async fn get_pool(
    Path((chain_id, address)): Path<(u64, String)>,
    Query(params): Query<StageQuery>,
    State(state): State<AppState>,
) -> Result<Json<PoolResponse>, AppError> {
    let address = parse_address_param(&address)?;
    let now = resolve_now(params.at);
    let pool = fetch_parsed_pool(&state, ChainId::new(chain_id), &address).await?;
    Ok(Json(pool_response(&pool, now)))
}

/// Snapshot of every configured pool, one indexer round trip each.
/// Failures on individual pools are reported alongside the successes
/// instead of failing the whole response.
pub async fn get_tracked_pools(
    Query(params): Query<StageQuery>,
    State(state): State<AppState>,
) -> Result<Json<TrackedPoolsResponse>, AppError> {
    let now = resolve_now(params.at);

    let fetches = state.config.tracked_pools.iter().map(|tracked| {
        let state = state.clone();
        async move {
            let address = parse_address_param(&tracked.address)?;
            let pool = fetch_parsed_pool(&state, ChainId::new(tracked.chain_id), &address).await?;
            Ok::<PoolResponse, AppError>(pool_response(&pool, now))
        }
    });

    let mut pools = Vec::new();
    let mut errors = Vec::new();
    for (tracked, result) in state.config.tracked_pools.iter().zip(join_all(fetches).await) {
        match result {
            Ok(response) => pools.push(response),
            Err(e) => {
                tracing::warn!(
                    "Failed to load tracked pool {} on chain {}: {}",
                    tracked.address,
                    tracked.chain_id,
                    e
                );
                errors.push(TrackedPoolError {
                    chain_id: tracked.chain_id,
                    address: tracked.address.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    Ok(Json(TrackedPoolsResponse { pools, errors }))
}

pub(crate) fn parse_address_param(address: &str) -> Result<Address, AppError> {
    Address::parse(address).map_err(|e| AppError::BadRequest(e.to_string()))
}

/// "Now" for stage math: the `at` override if given, otherwise the wall
/// clock sampled exactly once per request.
pub(crate) fn resolve_now(at: Option<i64>) -> TimeSec {
    TimeSec::new(at.unwrap_or_else(|| chrono::Utc::now().timestamp()))
}

pub(crate) async fn fetch_parsed_pool(
    state: &AppState,
    chain_id: ChainId,
    address: &Address,
) -> Result<Pool, AppError> {
    let record = state.pool_source.fetch_pool(chain_id, address).await?;
    let pool = parse_pool(&record, chain_id)?;
    Ok(pool)
}

fn token_dto(address: &Address, symbol: &str, decimals: u8) -> TokenDto {
    TokenDto {
        address: address.as_str().to_string(),
        symbol: symbol.to_string(),
        decimals,
    }
}

fn deal_dto(deal: &PoolDeal, now: TimeSec) -> Option<DealDto> {
    match deal {
        PoolDeal::None => None,
        PoolDeal::Deal(deal) => Some(DealDto {
            deal_type: "deal".to_string(),
            underlying_token: token_dto(
                &deal.underlying.address,
                &deal.underlying.symbol,
                deal.underlying.decimals,
            ),
            underlying_total: deal.underlying.total.raw_string(),
            investment_per_deal: deal.exchange_rates.investment_per_deal.format(4),
            deal_per_investment: deal.exchange_rates.deal_per_investment.format(4),
            redemption_period: deal
                .redemption
                .as_ref()
                .and_then(|w| w.period_at(now))
                .map(|p| p.as_u8()),
            redemption_start: deal.redemption.as_ref().map(|w| w.pro_rata_start.as_i64()),
            redemption_end: deal.redemption.as_ref().map(|w| w.end().as_i64()),
            vesting_cliff_end: deal.vesting.cliff_end.map(|t| t.as_i64()),
            vesting_end: deal.vesting.vesting_end.map(|t| t.as_i64()),
            holder_funded: Some(deal.holder_has_funded),
            purchase_raise_minimum: None,
            allows_deallocation: None,
            total_users_accepted: None,
        }),
        PoolDeal::Upfront(upfront) => Some(DealDto {
            deal_type: "upfront".to_string(),
            underlying_token: token_dto(
                &upfront.underlying.address,
                &upfront.underlying.symbol,
                upfront.underlying.decimals,
            ),
            underlying_total: upfront.underlying.total.raw_string(),
            investment_per_deal: upfront.exchange_rates.investment_per_deal.format(4),
            deal_per_investment: upfront.exchange_rates.deal_per_investment.format(4),
            redemption_period: None,
            redemption_start: None,
            redemption_end: None,
            vesting_cliff_end: upfront.vesting.cliff_end.map(|t| t.as_i64()),
            vesting_end: upfront.vesting.vesting_end.map(|t| t.as_i64()),
            holder_funded: None,
            purchase_raise_minimum: Some(upfront.purchase_raise_minimum.raw_string()),
            allows_deallocation: Some(upfront.allows_deallocation),
            total_users_accepted: Some(upfront.total_users_accepted),
        }),
    }
}

pub(crate) fn pool_response(pool: &Pool, now: TimeSec) -> PoolResponse {
    PoolResponse {
        address: pool.address.as_str().to_string(),
        chain_id: pool.chain_id.as_u64(),
        name: pool.name.clone(),
        symbol: pool.symbol.clone(),
        stage: pool_stage(pool, now).to_string(),
        privacy: pool.privacy.to_string(),
        created_at: pool.created_at.as_i64(),
        investment_deadline: pool.investment_deadline.map(|t| t.as_i64()),
        deal_deadline: pool.deal_deadline.map(|t| t.as_i64()),
        investment_token: token_dto(
            &pool.investment_token_address,
            &pool.investment_token_symbol,
            pool.investment_token_decimals,
        ),
        cap: if pool.is_uncapped() {
            None
        } else {
            Some(pool.cap.raw_string())
        },
        total_deposited: pool.total_deposited.raw_string(),
        total_withdrawn: pool.total_withdrawn.raw_string(),
        total_redeemed: pool.total_redeemed.raw_string(),
        merkle_gated: pool.is_merkle_gated(),
        nft_gated: !pool.nft_collection_rules.is_empty(),
        deal: deal_dto(&pool.deal, now),
        evaluated_at: now.as_i64(),
    }
}
