//! Merkle distribution store backed by an IPFS HTTP gateway.

use super::{DataSourceError, MerkleStore};
use async_trait::async_trait;
use backoff::future::retry;
use backoff::ExponentialBackoff;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Fetches distribution documents from `{gateway}/ipfs/{hash}`.
#[derive(Debug, Clone)]
pub struct IpfsMerkleStore {
    client: Client,
    gateway_url: String,
}

impl IpfsMerkleStore {
    /// Create a store pointed at an IPFS gateway.
    pub fn new(gateway_url: String) -> Self {
        Self {
            client: Client::new(),
            gateway_url: gateway_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl MerkleStore for IpfsMerkleStore {
    async fn fetch_distribution(
        &self,
        ipfs_hash: &str,
    ) -> Result<serde_json::Value, DataSourceError> {
        debug!("Fetching merkle distribution {}", ipfs_hash);
        let url = format!("{}/ipfs/{}", self.gateway_url, ipfs_hash);

        let backoff = ExponentialBackoff {
            max_elapsed_time: Some(Duration::from_secs(30)),
            ..Default::default()
        };

        retry(backoff, || async {
            let response = self.client.get(&url).send().await.map_err(|e| {
                backoff::Error::transient(DataSourceError::NetworkError(e.to_string()))
            })?;

            let status = response.status();
            if status == 404 {
                return Err(backoff::Error::permanent(DataSourceError::NotFound(
                    format!("distribution {}", ipfs_hash),
                )));
            }
            if status == 429 {
                return Err(backoff::Error::transient(DataSourceError::RateLimited));
            }
            if status.is_server_error() {
                return Err(backoff::Error::transient(DataSourceError::HttpError {
                    status: status.as_u16(),
                    message: "Server error".to_string(),
                }));
            }
            if !status.is_success() {
                return Err(backoff::Error::permanent(DataSourceError::HttpError {
                    status: status.as_u16(),
                    message: "Client error".to_string(),
                }));
            }

            response
                .json::<serde_json::Value>()
                .await
                .map_err(|e| backoff::Error::permanent(DataSourceError::ParseError(e.to_string())))
        })
        .await
    }
}
