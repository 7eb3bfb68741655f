//! The hash-linked ledger.
//!
//! Appends are serialized through a ledger-wide lock so that two concurrent
//! adds can never observe the same height. Reads go straight to the store.

use std::collections::BTreeMap;
use std::sync::Arc;

use star_notary_core::{Block, BlockBody, Clock, SystemClock};
use star_notary_store::{BlockStore, StoreError};
use tokio::sync::Mutex;

use crate::error::{NotaryError, Result};

/// Append-only block ledger over a [`BlockStore`].
pub struct Blockchain<S: BlockStore> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    /// Held for the whole read-height / link / write sequence of an append.
    write_lock: Mutex<()>,
}

impl<S: BlockStore> Blockchain<S> {
    /// Wrap a store without touching it.
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            write_lock: Mutex::new(()),
        }
    }

    /// Open the ledger, writing the genesis block if the store is empty.
    pub async fn open(store: Arc<S>, clock: Arc<dyn Clock>) -> Result<Self> {
        let chain = Self::new(store, clock);
        chain.ensure_genesis().await?;
        Ok(chain)
    }

    /// Open against the system clock.
    pub async fn open_default(store: Arc<S>) -> Result<Self> {
        Self::open(store, Arc::new(SystemClock)).await
    }

    /// Write the genesis block if there are no blocks yet.
    ///
    /// Returns the new genesis block, or `None` if one already existed.
    pub async fn ensure_genesis(&self) -> Result<Option<Block>> {
        let _guard = self.write_lock.lock().await;
        if self.store.latest_height().await?.is_some() {
            return Ok(None);
        }
        let genesis = self.append_locked(None, BlockBody::genesis()).await?;
        Ok(Some(genesis))
    }

    /// Get the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Height of the latest block, or `None` for an empty ledger.
    pub async fn height(&self) -> Result<Option<u64>> {
        Ok(self.store.latest_height().await?)
    }

    /// Append a block carrying `body`.
    ///
    /// An empty ledger gets its genesis block first, so a star body never
    /// lands at height 0.
    pub async fn add_block(&self, body: BlockBody) -> Result<Block> {
        let _guard = self.write_lock.lock().await;

        let mut current = self.store.latest_height().await?;
        if current.is_none() && !matches!(body, BlockBody::Genesis(_)) {
            let genesis = self.append_locked(None, BlockBody::genesis()).await?;
            current = Some(genesis.height);
        }

        self.append_locked(current, body).await
    }

    /// Build, seal, and persist the block after `current`. Caller holds `write_lock`.
    async fn append_locked(&self, current: Option<u64>, body: BlockBody) -> Result<Block> {
        let (height, previous_hash) = match current {
            Some(tip) => {
                let previous = self.get_block(tip).await?;
                (tip + 1, previous.hash)
            }
            None => (0, String::new()),
        };

        let block = Block::new(height, self.clock.now_secs(), previous_hash, body).seal()?;
        self.store.put_block(&block).await?;

        tracing::info!(height, hash = %block.hash, "block appended");
        Ok(block)
    }

    /// The block stored at `height`.
    pub async fn get_block(&self, height: u64) -> Result<Block> {
        self.store
            .get_block(height)
            .await?
            .ok_or_else(|| NotaryError::BlockNotFound(format!("height {}", height)))
    }

    /// Whether the block at `height` still matches its stored hash.
    ///
    /// A stored record that no longer decodes is reported as invalid.
    pub async fn validate_block(&self, height: u64) -> Result<bool> {
        let block = match self.store.get_block(height).await {
            Ok(Some(block)) => block,
            Ok(None) => return Err(NotaryError::BlockNotFound(format!("height {}", height))),
            Err(StoreError::Serialization(e)) => {
                tracing::warn!(height, error = %e, "undecodable block");
                return Ok(false);
            }
            Err(e) => return Err(e.into()),
        };

        let valid = block.is_hash_valid()?;
        if !valid {
            tracing::warn!(height, stored = %block.hash, "block hash mismatch");
        }
        Ok(valid)
    }

    /// Audit every block against its own hash and its successor's link.
    ///
    /// Returns the failing heights in ascending order, each at most once.
    /// A height that is missing, undecodable, or stored under the wrong key
    /// counts as a failure.
    pub async fn validate_chain(&self) -> Result<Vec<u64>> {
        let mut blocks: BTreeMap<u64, Option<Block>> = BTreeMap::new();
        for entry in self.store.scan_blocks().await? {
            let block = match entry.block {
                Ok(block) if block.height == entry.height => Some(block),
                Ok(block) => {
                    tracing::warn!(
                        height = entry.height,
                        recorded = block.height,
                        "block stored under wrong height"
                    );
                    None
                }
                Err(e) => {
                    tracing::warn!(height = entry.height, error = %e, "undecodable block");
                    None
                }
            };
            blocks.insert(entry.height, block);
        }

        let Some(&tip) = blocks.keys().next_back() else {
            return Ok(Vec::new());
        };

        let mut errors = Vec::new();
        for height in 0..=tip {
            let block = match blocks.get(&height) {
                Some(Some(block)) => block,
                Some(None) => {
                    errors.push(height);
                    continue;
                }
                None => {
                    tracing::warn!(height, "block missing from ledger");
                    errors.push(height);
                    continue;
                }
            };

            let hash_ok = block.is_hash_valid()?;
            if !hash_ok {
                tracing::warn!(height, "block hash mismatch");
            }

            // An undecodable successor is reported under its own height.
            let link_ok = match blocks.get(&(height + 1)) {
                Some(Some(next)) => next.previous_block_hash == block.hash,
                _ => true,
            };
            if !link_ok {
                tracing::warn!(height, "broken link to next block");
            }

            if !(hash_ok && link_ok) {
                errors.push(height);
            }
        }

        tracing::debug!(blocks = blocks.len(), errors = errors.len(), "chain validated");
        Ok(errors)
    }

    /// The block whose stored hash equals `hash`, with its story decoded.
    pub async fn get_block_by_hash(&self, hash: &str) -> Result<Block> {
        let block = self
            .readable_blocks()
            .await?
            .into_iter()
            .find(|b| b.hash == hash)
            .ok_or_else(|| NotaryError::BlockNotFound(format!("hash {}", hash)))?;

        Ok(with_story(block))
    }

    /// All star blocks notarized by `address`, ascending by height, stories decoded.
    pub async fn get_blocks_by_address(&self, address: &str) -> Result<Vec<Block>> {
        Ok(self
            .readable_blocks()
            .await?
            .into_iter()
            .filter(|b| b.body.address() == Some(address))
            .map(with_story)
            .collect())
    }

    /// Every block that still decodes, ascending by height.
    async fn readable_blocks(&self) -> Result<Vec<Block>> {
        Ok(self
            .store
            .scan_blocks()
            .await?
            .into_iter()
            .filter_map(|entry| match entry.block {
                Ok(block) => Some(block),
                Err(e) => {
                    tracing::warn!(height = entry.height, error = %e, "skipping undecodable block");
                    None
                }
            })
            .collect())
    }
}

/// Populate `storyDecoded`, leaving it unset when the stored hex is damaged.
fn with_story(block: Block) -> Block {
    match block.clone().with_decoded_story() {
        Ok(decoded) => decoded,
        Err(e) => {
            tracing::warn!(height = block.height, error = %e, "story does not decode");
            block
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use star_notary_core::{StarSubmission, GENESIS_MARKER};
    use star_notary_store::MemoryStore;

    fn star_body(address: &str, story: &str) -> BlockBody {
        StarSubmission::new("16h29m1.0s", "-26d29m24.9s", "2.9", "Sco", story)
            .unwrap()
            .into_body(address)
    }

    async fn open_chain() -> (Arc<MemoryStore>, Blockchain<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let chain = Blockchain::open_default(Arc::clone(&store)).await.unwrap();
        (store, chain)
    }

    #[tokio::test]
    async fn test_open_creates_genesis_once() {
        let (store, chain) = open_chain().await;
        assert_eq!(chain.height().await.unwrap(), Some(0));

        let genesis = chain.get_block(0).await.unwrap();
        assert_eq!(genesis.body, BlockBody::Genesis(GENESIS_MARKER.into()));
        assert_eq!(genesis.previous_block_hash, "");
        assert!(genesis.is_hash_valid().unwrap());

        let reopened = Blockchain::open_default(store).await.unwrap();
        assert_eq!(reopened.height().await.unwrap(), Some(0));
        assert!(reopened.ensure_genesis().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_add_block_links_to_previous() {
        let (_, chain) = open_chain().await;
        let genesis = chain.get_block(0).await.unwrap();

        let block = chain.add_block(star_body("addr", "story")).await.unwrap();
        assert_eq!(block.height, 1);
        assert_eq!(block.previous_block_hash, genesis.hash);
        assert_eq!(block.hash.len(), 64);
        assert!(chain.validate_block(1).await.unwrap());
    }

    #[tokio::test]
    async fn test_add_block_on_empty_store_writes_genesis_first() {
        let chain = Blockchain::new(Arc::new(MemoryStore::new()), Arc::new(SystemClock));
        assert_eq!(chain.height().await.unwrap(), None);

        let block = chain.add_block(star_body("addr", "story")).await.unwrap();
        assert_eq!(block.height, 1);
        assert!(chain.get_block(0).await.unwrap().is_genesis());
    }

    #[tokio::test]
    async fn test_get_block_missing() {
        let (_, chain) = open_chain().await;
        let err = chain.get_block(7).await.unwrap_err();
        assert!(matches!(err, NotaryError::BlockNotFound(_)));
        assert!(chain.validate_block(7).await.is_err());
    }

    #[tokio::test]
    async fn test_tampered_body_is_reported() {
        let (store, chain) = open_chain().await;
        chain.add_block(star_body("addr", "one")).await.unwrap();
        chain.add_block(star_body("addr", "two")).await.unwrap();
        assert!(chain.validate_chain().await.unwrap().is_empty());

        let mut block = chain.get_block(1).await.unwrap();
        if let BlockBody::Star(record) = &mut block.body {
            record.star.mag = "9.9".into();
        }
        store.put_block(&block).await.unwrap();

        assert!(!chain.validate_block(1).await.unwrap());
        assert_eq!(chain.validate_chain().await.unwrap(), vec![1]);
    }

    #[tokio::test]
    async fn test_rehashed_tamper_breaks_link() {
        let (store, chain) = open_chain().await;
        chain.add_block(star_body("addr", "one")).await.unwrap();
        chain.add_block(star_body("addr", "two")).await.unwrap();

        // Tamper and re-seal: the block is self-consistent but its successor's
        // link no longer matches.
        let mut block = chain.get_block(1).await.unwrap();
        if let BlockBody::Star(record) = &mut block.body {
            record.star.con = "Ori".into();
        }
        let block = block.seal().unwrap();
        store.put_block(&block).await.unwrap();

        assert!(chain.validate_block(1).await.unwrap());
        assert_eq!(chain.validate_chain().await.unwrap(), vec![1]);
    }

    #[tokio::test]
    async fn test_lookup_by_hash_decodes_story() {
        let (_, chain) = open_chain().await;
        let block = chain.add_block(star_body("addr", "Found star")).await.unwrap();

        let found = chain.get_block_by_hash(&block.hash).await.unwrap();
        match found.body {
            BlockBody::Star(record) => {
                assert_eq!(record.star.story_decoded.as_deref(), Some("Found star"));
            }
            BlockBody::Genesis(_) => panic!("expected star body"),
        }

        let genesis = chain.get_block(0).await.unwrap();
        let found = chain.get_block_by_hash(&genesis.hash).await.unwrap();
        assert!(found.is_genesis());

        let err = chain.get_block_by_hash("deadbeef").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_lookup_by_address() {
        let (_, chain) = open_chain().await;
        chain.add_block(star_body("alice", "a1")).await.unwrap();
        chain.add_block(star_body("bob", "b1")).await.unwrap();
        chain.add_block(star_body("alice", "a2")).await.unwrap();

        let heights: Vec<u64> = chain
            .get_blocks_by_address("alice")
            .await
            .unwrap()
            .iter()
            .map(|b| b.height)
            .collect();
        assert_eq!(heights, vec![1, 3]);
        assert!(chain.get_blocks_by_address("carol").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_lookup_survives_damaged_story() {
        let (store, chain) = open_chain().await;
        let mut block = chain.add_block(star_body("addr", "ok")).await.unwrap();
        if let BlockBody::Star(record) = &mut block.body {
            record.star.story_hex = "zz".into();
        }
        store.put_block(&block).await.unwrap();

        let found = chain.get_blocks_by_address("addr").await.unwrap();
        assert_eq!(found.len(), 1);
        match &found[0].body {
            BlockBody::Star(record) => assert_eq!(record.star.story_decoded, None),
            BlockBody::Genesis(_) => panic!("expected star body"),
        }
        assert_eq!(chain.validate_chain().await.unwrap(), vec![1]);
    }
}
