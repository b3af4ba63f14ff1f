use anyhow::Context;
use poolwatch::datasource::{IpfsMerkleStore, SubgraphPoolSource};
use poolwatch::{api, config::Config};
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    // Load configuration
    let config = Config::from_env().context("configuration error")?;
    let port = config.port;

    let pool_source = Arc::new(SubgraphPoolSource::new(config.subgraph_api_url.clone()));
    let merkle_store = Arc::new(IpfsMerkleStore::new(config.ipfs_gateway_url.clone()));

    // Create router
    let app = api::create_router(api::AppState::new(pool_source, merkle_store, config));

    // Bind to address
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
