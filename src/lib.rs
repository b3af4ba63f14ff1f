pub mod api;
pub mod config;
pub mod datasource;
pub mod domain;
pub mod engine;
pub mod error;
pub mod parse;

pub use config::{Config, TrackedPool};
pub use datasource::{
    DataSourceError, IpfsMerkleStore, MerkleStore, MockMerkleStore, MockPoolSource, PoolSource,
    SubgraphPoolSource,
};
pub use domain::{
    Address, ChainId, CoreError, Deal, FixedPointAmount, Pool, PoolDeal, PrivacyMode, TimeSec,
    UpfrontDeal,
};
pub use engine::{pool_stage, AllowlistStatus, NftAllocation, PoolStage};
pub use error::AppError;
pub use parse::parse_pool;
