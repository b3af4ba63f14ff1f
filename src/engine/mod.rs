//! Pure derivation engines over normalized pools.
//!
//! Nothing here performs I/O, reads the wall clock, or holds state between
//! calls; every function is a pure map from (pool data, explicit inputs)
//! to a derived result, so concurrent evaluation across pools needs no
//! coordination.

pub mod allowlist;
pub mod nft_allocation;
pub mod stage;

pub use allowlist::{lookup_allowlist, AllowlistStatus};
pub use nft_allocation::{compute_nft_allocation, format_allocation, NftAllocation};
pub use stage::{pool_stage, PoolStage};
