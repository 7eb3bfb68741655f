//! In-memory implementation of the store traits.
//!
//! This is primarily for testing. It has the same semantics as SQLite
//! but keeps everything in memory with no persistence.

use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use star_notary_core::{Block, ValidationRequest};

use crate::error::{Result, StoreError};
use crate::traits::{BlockEntry, BlockStore, ValidationStore};

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
pub struct MemoryStore {
    inner: RwLock<MemoryStoreInner>,
}

struct MemoryStoreInner {
    /// Blocks indexed by height; BTreeMap keeps scans ordered.
    blocks: BTreeMap<u64, Block>,

    /// Validation requests indexed by address.
    requests: HashMap<String, ValidationRequest>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryStoreInner {
                blocks: BTreeMap::new(),
                requests: HashMap::new(),
            }),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryStoreInner>> {
        self.inner
            .read()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryStoreInner>> {
        self.inner
            .write()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlockStore for MemoryStore {
    async fn put_block(&self, block: &Block) -> Result<()> {
        self.write()?.blocks.insert(block.height, block.clone());
        Ok(())
    }

    async fn get_block(&self, height: u64) -> Result<Option<Block>> {
        Ok(self.read()?.blocks.get(&height).cloned())
    }

    async fn scan_blocks(&self) -> Result<Vec<BlockEntry>> {
        Ok(self
            .read()?
            .blocks
            .iter()
            .map(|(&height, block)| BlockEntry {
                height,
                block: Ok(block.clone()),
            })
            .collect())
    }

    async fn latest_height(&self) -> Result<Option<u64>> {
        Ok(self.read()?.blocks.keys().next_back().copied())
    }
}

#[async_trait]
impl ValidationStore for MemoryStore {
    async fn get_request(&self, address: &str) -> Result<Option<ValidationRequest>> {
        Ok(self.read()?.requests.get(address).cloned())
    }

    async fn put_request(&self, request: &ValidationRequest) -> Result<()> {
        self.write()?
            .requests
            .insert(request.address.clone(), request.clone());
        Ok(())
    }

    async fn delete_request(&self, address: &str) -> Result<bool> {
        Ok(self.write()?.requests.remove(address).is_some())
    }
}
