pub mod allocation;
pub mod allowlist;
pub mod health;
pub mod pools;

use crate::config::Config;
use crate::datasource::{MerkleStore, PoolSource};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub pool_source: Arc<dyn PoolSource>,
    pub merkle_store: Arc<dyn MerkleStore>,
    pub config: Config,
}

impl AppState {
    pub fn new(
        pool_source: Arc<dyn PoolSource>,
        merkle_store: Arc<dyn MerkleStore>,
        config: Config,
    ) -> Self {
        Self {
            pool_source,
            merkle_store,
            config,
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/v1/pools", get(pools::get_tracked_pools))
        .route("/v1/pools/:chain_id/:address", get(pools::get_pool))
        .route(
            "/v1/pools/:chain_id/:address/nft-allocation",
            post(allocation::post_nft_allocation),
        )
        .route(
            "/v1/pools/:chain_id/:address/allowlist/:account",
            get(allowlist::get_allowlist_status),
        )
        .layer(cors)
        .with_state(state)
}
