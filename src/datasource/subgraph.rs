//! Subgraph pool indexer client.

use super::{DataSourceError, PoolSource};
use crate::domain::{Address, ChainId};
use async_trait::async_trait;
use backoff::future::retry;
use backoff::ExponentialBackoff;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

const POOL_QUERY: &str = r#"
query Pool($id: ID!) {
  pool(id: $id) {
    address name symbol timestamp purchaseExpiry duration purchaseDuration
    purchaseToken purchaseTokenSymbol purchaseTokenDecimals purchaseTokenCap
    totalDeposited totalWithdrawn totalRedeemed hasAllowList ipfsHash
    nftCollectionRules {
      collectionAddress nftType purchaseAmountPerToken purchaseAmount
      blacklistedTokenIds tokenIds minTokensEligible
    }
    deal {
      underlyingDealToken underlyingDealTokenSymbol underlyingDealTokenDecimals
      underlyingDealTokenTotal purchaseTokenTotalForDeal holderFundingExpiration
      isDealFunded proRataRedemptionPeriodStart proRataRedemptionPeriod
      openRedemptionPeriod vestingCliff vestingPeriod
    }
    upfrontDeal {
      underlyingDealToken underlyingDealTokenSymbol underlyingDealTokenDecimals
      underlyingDealTokenTotal purchaseTokenPerDealToken purchaseRaiseMinimum
      allowDeallocation merkleRoot ipfsHash totalUsersAccepted vestingStart
      vestingCliffPeriod vestingPeriod
    }
  }
}
"#;

/// Pool source backed by a GraphQL subgraph endpoint.
///
/// The configured URL may contain a `{chainId}` placeholder, which is
/// substituted per request so one deployment can serve several chains.
#[derive(Debug, Clone)]
pub struct SubgraphPoolSource {
    client: Client,
    base_url: String,
}

impl SubgraphPoolSource {
    /// Create a new subgraph pool source.
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }

    fn url_for(&self, chain_id: ChainId) -> String {
        self.base_url.replace("{chainId}", &chain_id.to_string())
    }

    async fn post_query(
        &self,
        url: &str,
        payload: serde_json::Value,
    ) -> Result<serde_json::Value, DataSourceError> {
        let backoff = ExponentialBackoff {
            max_elapsed_time: Some(Duration::from_secs(30)),
            ..Default::default()
        };

        retry(backoff, || async {
            let response = self
                .client
                .post(url)
                .json(&payload)
                .send()
                .await
                .map_err(|e| {
                    backoff::Error::transient(DataSourceError::NetworkError(e.to_string()))
                })?;

            let status = response.status();
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

#[async_trait]
impl PoolSource for SubgraphPoolSource {
    async fn fetch_pool(
        &self,
        chain_id: ChainId,
        address: &Address,
    ) -> Result<serde_json::Value, DataSourceError> {
        debug!("Fetching pool {} on chain {}", address, chain_id);

        let payload = serde_json::json!({
            "query": POOL_QUERY,
            "variables": { "id": address.as_str() }
        });

        let response = self.post_query(&self.url_for(chain_id), payload).await?;

        if let Some(errors) = response.get("errors").filter(|e| !e.is_null()) {
            return Err(DataSourceError::ParseError(format!(
                "subgraph errors: {}",
                errors
            )));
        }

        match response.pointer("/data/pool") {
            Some(record) if !record.is_null() => Ok(record.clone()),
            _ => Err(DataSourceError::NotFound(format!(
                "pool {} on chain {}",
                address, chain_id
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_substitutes_chain_id() {
        let source =
            SubgraphPoolSource::new("https://api.example.com/subgraphs/{chainId}".to_string());
        assert_eq!(
            source.url_for(ChainId::new(10)),
            "https://api.example.com/subgraphs/10"
        );
    }

    #[test]
    fn test_url_without_placeholder_unchanged() {
        let source = SubgraphPoolSource::new("https://api.example.com/graphql".to_string());
        assert_eq!(
            source.url_for(ChainId::new(1)),
            "https://api.example.com/graphql"
        );
    }
}
