//! Data source abstraction for the core's external collaborators: the
//! pool indexer (subgraph) and the merkle distribution store (IPFS).
//!
//! Implementations own retry/backoff and rate limiting; the core never
//! retries. Raw records come back as `serde_json::Value` and are handed
//! to the parsers in `crate::parse`.

use crate::domain::{Address, ChainId};
use async_trait::async_trait;
use std::fmt;

pub mod ipfs;
pub mod mock;
pub mod subgraph;

pub use ipfs::IpfsMerkleStore;
pub use mock::{MockMerkleStore, MockPoolSource};
pub use subgraph::SubgraphPoolSource;

/// Source of raw pool records.
#[async_trait]
pub trait PoolSource: Send + Sync + fmt::Debug {
    /// Fetch the raw indexer record for one pool.
    ///
    /// # Returns
    /// The raw record, or `NotFound` when the indexer has no such pool.
    async fn fetch_pool(
        &self,
        chain_id: ChainId,
        address: &Address,
    ) -> Result<serde_json::Value, DataSourceError>;
}

/// Source of merkle distribution documents, keyed by content hash.
#[async_trait]
pub trait MerkleStore: Send + Sync + fmt::Debug {
    /// Fetch the distribution document for a non-zero content hash.
    async fn fetch_distribution(
        &self,
        ipfs_hash: &str,
    ) -> Result<serde_json::Value, DataSourceError>;
}

/// Error type for data source operations.
#[derive(Debug, Clone)]
pub enum DataSourceError {
    /// Network error (e.g., connection timeout, DNS failure)
    NetworkError(String),
    /// HTTP error (e.g., 5xx server error)
    HttpError { status: u16, message: String },
    /// Parsing error (invalid JSON or malformed response)
    ParseError(String),
    /// The requested pool or document does not exist upstream
    NotFound(String),
    /// Rate limit exceeded (caller should implement backoff)
    RateLimited,
    /// Other error
    Other(String),
}

impl fmt::Display for DataSourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSourceError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            DataSourceError::HttpError { status, message } => {
                write!(f, "HTTP error {}: {}", status, message)
            }
            DataSourceError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            DataSourceError::NotFound(msg) => write!(f, "Not found: {}", msg),
            DataSourceError::RateLimited => write!(f, "Rate limited"),
            DataSourceError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for DataSourceError {}
