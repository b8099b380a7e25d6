//! Chain data source contract and its TronGrid-backed implementation.
//!
//! The engine trusts whatever block this crate hands it; all it needs is a
//! tip and the ability to fetch a specific height. Transient failure is a
//! distinct outcome from "block not yet produced" so the poller can skip a
//! cycle without mistaking lag for an outage.

pub mod tron;

#[cfg(any(test, feature = "mocks"))]
pub mod mocks;

pub use tron::TronClient;

use pc28_types::Block;
use std::future::Future;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChainError {
    /// The node could not be reached or answered outside protocol; retry
    /// next cycle.
    #[error("chain node unavailable: {0}")]
    Unavailable(String),
    /// The node is healthy but the block does not exist yet.
    #[error("block {0} not yet produced")]
    NotFound(u64),
    /// The node answered with a body we cannot interpret.
    #[error("malformed node response: {0}")]
    InvalidResponse(String),
}

/// Trait for fetching blocks from the chain collaborator.
pub trait ChainSource: Clone + Send + Sync + 'static {
    /// Fetch the current chain tip.
    fn latest_block(&self) -> impl Future<Output = Result<Block, ChainError>> + Send;

    /// Fetch a specific block by height.
    fn block_by_height(&self, height: u64) -> impl Future<Output = Result<Block, ChainError>> + Send;
}
