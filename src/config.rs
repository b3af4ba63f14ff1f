use std::collections::HashMap;
use thiserror::Error;

/// One pool the batch endpoint reports on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedPool {
    pub chain_id: u64,
    pub address: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub subgraph_api_url: String,
    pub ipfs_gateway_url: String,
    pub app_chain_id: u64,
    pub tracked_pools: Vec<TrackedPool>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let port = env_map
            .get("PORT")
            .map(|s| s.as_str())
            .unwrap_or("8080")
            .parse::<u16>()
            .map_err(|_| {
                ConfigError::InvalidValue("PORT".to_string(), "must be a valid u16".to_string())
            })?;

        let subgraph_api_url = env_map
            .get("SUBGRAPH_API_URL")
            .cloned()
            .ok_or_else(|| ConfigError::MissingEnv("SUBGRAPH_API_URL".to_string()))?;

        let ipfs_gateway_url = env_map
            .get("IPFS_GATEWAY_URL")
            .cloned()
            .unwrap_or_else(|| "https://ipfs.io".to_string());

        let app_chain_id = env_map
            .get("APP_CHAIN_ID")
            .map(|s| s.as_str())
            .unwrap_or("1")
            .parse::<u64>()
            .map_err(|_| {
                ConfigError::InvalidValue(
                    "APP_CHAIN_ID".to_string(),
                    "must be a valid u64".to_string(),
                )
            })?;

        let tracked_pools = parse_tracked_pools_from_map(&env_map, app_chain_id)?;

        Ok(Config {
            port,
            subgraph_api_url,
            ipfs_gateway_url,
            app_chain_id,
            tracked_pools,
        })
    }
}

/// Parse a tracked-pool entry: either `chainId:address` or a bare
/// address, which falls back to the app chain id.
fn parse_tracked_pool(entry: &str, app_chain_id: u64) -> Result<TrackedPool, ConfigError> {
    match entry.split_once(':') {
        Some((chain, address)) => {
            let chain_id = chain.parse::<u64>().map_err(|_| {
                ConfigError::InvalidValue(
                    "TRACKED_POOLS".to_string(),
                    format!("invalid chain id in {}", entry),
                )
            })?;
            Ok(TrackedPool {
                chain_id,
                address: address.to_lowercase(),
            })
        }
        None => Ok(TrackedPool {
            chain_id: app_chain_id,
            address: entry.to_lowercase(),
        }),
    }
}

fn parse_tracked_pools_from_map(
    env_map: &HashMap<String, String>,
    app_chain_id: u64,
) -> Result<Vec<TrackedPool>, ConfigError> {
    let entries: Vec<String> = if let Some(pools_str) = env_map.get("TRACKED_POOLS") {
        pools_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    } else if let Some(file_path) = env_map.get("TRACKED_POOLS_FILE") {
        let content = std::fs::read_to_string(file_path).map_err(|_| {
            ConfigError::InvalidValue(
                "TRACKED_POOLS_FILE".to_string(),
                "file not found or unreadable".to_string(),
            )
        })?;
        content
            .lines()
            .map(|line| line.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    } else {
        Vec::new()
    };

    entries
        .iter()
        .map(|entry| parse_tracked_pool(entry, app_chain_id))
        .collect()
}
