//! Store traits: the abstract interfaces for ledger persistence.
//!
//! These traits allow the services to be storage-agnostic. Implementations
//! include SQLite (primary) and in-memory (for tests).

use async_trait::async_trait;
use star_notary_core::{Block, ValidationRequest};

use crate::error::Result;

/// A stored block as read back by a scan.
#[derive(Debug)]
pub struct BlockEntry {
    /// Height the record is stored under.
    pub height: u64,
    /// The decoded block, or the decode error when the record no longer parses.
    pub block: Result<Block>,
}

/// Height-keyed block storage.
///
/// All methods are async to support both sync (SQLite) and async backends.
/// For SQLite, we use `spawn_blocking` internally to avoid blocking the runtime.
#[async_trait]
pub trait BlockStore: Send + Sync {
    /// Store `block` under `block.height`, replacing any existing value.
    async fn put_block(&self, block: &Block) -> Result<()>;

    /// Get the block at `height`.
    async fn get_block(&self, height: u64) -> Result<Option<Block>>;

    /// Every stored block, ordered by ascending height.
    ///
    /// Records are decoded one by one; an undecodable record is returned as
    /// a failed entry, never as an error of the whole scan.
    async fn scan_blocks(&self) -> Result<Vec<BlockEntry>>;

    /// Highest stored height, `None` when empty.
    async fn latest_height(&self) -> Result<Option<u64>>;
}

/// Address-keyed validation request storage.
#[async_trait]
pub trait ValidationStore: Send + Sync {
    /// Get the request for `address`.
    async fn get_request(&self, address: &str) -> Result<Option<ValidationRequest>>;

    /// Insert or replace the request for `request.address`.
    async fn put_request(&self, request: &ValidationRequest) -> Result<()>;

    /// Delete the request for `address`. Returns whether one existed.
    async fn delete_request(&self, address: &str) -> Result<bool>;
}
