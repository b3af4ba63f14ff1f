//! Mock data sources for testing without network calls.

use super::{DataSourceError, MerkleStore, PoolSource};
use crate::domain::{Address, ChainId};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Mock pool source returning predefined raw records.
#[derive(Debug, Default)]
pub struct MockPoolSource {
    pools: HashMap<(u64, String), serde_json::Value>,
}

impl MockPoolSource {
    /// Create a mock with no pools.
    pub fn new() -> Self {
        Self {
            pools: HashMap::new(),
        }
    }

    /// Register a raw pool record.
    pub fn with_pool(mut self, chain_id: u64, address: &str, record: serde_json::Value) -> Self {
        self.pools
            .insert((chain_id, address.to_lowercase()), record);
        self
    }
}

#[async_trait]
impl PoolSource for MockPoolSource {
    async fn fetch_pool(
        &self,
        chain_id: ChainId,
        address: &Address,
    ) -> Result<serde_json::Value, DataSourceError> {
        self.pools
            .get(&(chain_id.as_u64(), address.as_str().to_string()))
            .cloned()
            .ok_or_else(|| {
                DataSourceError::NotFound(format!("pool {} on chain {}", address, chain_id))
            })
    }
}

/// Mock merkle store returning predefined distribution documents and
/// counting fetches, so tests can assert that the zero hash never
/// triggers a fetch.
#[derive(Debug, Default)]
pub struct MockMerkleStore {
    documents: HashMap<String, serde_json::Value>,
    fetch_count: AtomicUsize,
}

impl MockMerkleStore {
    /// Create a mock with no documents.
    pub fn new() -> Self {
        Self {
            documents: HashMap::new(),
            fetch_count: AtomicUsize::new(0),
        }
    }

    /// Register a distribution document under a content hash.
    pub fn with_distribution(mut self, ipfs_hash: &str, document: serde_json::Value) -> Self {
        self.documents.insert(ipfs_hash.to_string(), document);
        self
    }

    /// How many fetches have been attempted.
    pub fn fetches(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MerkleStore for MockMerkleStore {
    async fn fetch_distribution(
        &self,
        ipfs_hash: &str,
    ) -> Result<serde_json::Value, DataSourceError> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
        self.documents
            .get(ipfs_hash)
            .cloned()
            .ok_or_else(|| DataSourceError::NotFound(format!("distribution {}", ipfs_hash)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_mock_pool_source_lowercases_keys() {
        let source = MockPoolSource::new().with_pool(
            1,
            "0xABCDEF0123456789abcdef0123456789ABCDEF01",
            json!({"name": "p"}),
        );
        let address = Address::parse("0xabcdef0123456789abcdef0123456789abcdef01").unwrap();
        let record = source.fetch_pool(ChainId::new(1), &address).await.unwrap();
        assert_eq!(record["name"], "p");
    }

    #[tokio::test]
    async fn test_mock_merkle_store_counts_fetches() {
        let store = MockMerkleStore::new().with_distribution("Qm123", json!({}));
        assert_eq!(store.fetches(), 0);
        store.fetch_distribution("Qm123").await.unwrap();
        let missing = store.fetch_distribution("Qm999").await;
        assert!(matches!(missing, Err(DataSourceError::NotFound(_))));
        assert_eq!(store.fetches(), 2);
    }
}
