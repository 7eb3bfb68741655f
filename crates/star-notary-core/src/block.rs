//! Block: one immutable entry of the hash-linked ledger.
//!
//! The persisted JSON shape is `{ height, time, previousBlockHash, hash, body }`.
//! The body is either the genesis marker string or a notarized star record.

use serde::{Deserialize, Serialize};

use crate::canonical::block_hash;
use crate::error::CoreError;
use crate::star::decode_story;

/// Body of the block at height 0.
pub const GENESIS_MARKER: &str = "First block in the chain - Genesis block";

/// Star coordinates and story as stored on the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Star {
    /// Right ascension.
    pub ra: String,
    /// Declination.
    pub dec: String,
    /// Magnitude.
    pub mag: String,
    /// Constellation.
    pub con: String,
    /// Hex encoding of the ASCII story text.
    #[serde(rename = "story")]
    pub story_hex: String,
    /// Story text decoded from `story_hex` on lookup. Never hashed.
    #[serde(
        rename = "storyDecoded",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub story_decoded: Option<String>,
}

/// A star bound to the wallet address that notarized it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarRecord {
    pub address: String,
    pub star: Star,
}

/// Block payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BlockBody {
    /// Fixed marker text of the genesis block.
    Genesis(String),
    /// A notarized star.
    Star(StarRecord),
}

impl BlockBody {
    /// The genesis body.
    pub fn genesis() -> Self {
        BlockBody::Genesis(GENESIS_MARKER.to_string())
    }

    /// The notarizing address, if this is a star body.
    pub fn address(&self) -> Option<&str> {
        match self {
            BlockBody::Star(record) => Some(&record.address),
            BlockBody::Genesis(_) => None,
        }
    }
}

/// A ledger block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub height: u64,
    /// Creation time, Unix seconds.
    pub time: i64,
    #[serde(rename = "previousBlockHash")]
    pub previous_block_hash: String,
    /// Hex SHA-256 of the canonical encoding with this field empty.
    pub hash: String,
    pub body: BlockBody,
}

impl Block {
    /// Build an unsealed block (empty hash).
    pub fn new(height: u64, time: i64, previous_block_hash: String, body: BlockBody) -> Self {
        Self {
            height,
            time,
            previous_block_hash,
            hash: String::new(),
            body,
        }
    }

    /// Recompute the hash from the canonical fields, ignoring `self.hash`.
    pub fn compute_hash(&self) -> Result<String, CoreError> {
        Ok(block_hash(self)?.to_hex())
    }

    /// Compute and store the hash.
    pub fn seal(mut self) -> Result<Self, CoreError> {
        self.hash = self.compute_hash()?;
        Ok(self)
    }

    /// Whether the stored hash matches the recomputed one.
    pub fn is_hash_valid(&self) -> Result<bool, CoreError> {
        Ok(self.compute_hash()? == self.hash)
    }

    pub fn is_genesis(&self) -> bool {
        self.height == 0
    }

    /// Populate `storyDecoded` for star bodies.
    pub fn with_decoded_story(mut self) -> Result<Self, CoreError> {
        if let BlockBody::Star(record) = &mut self.body {
            record.star.story_decoded = Some(decode_story(&record.star.story_hex)?);
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::star::encode_story;

    fn star_body(address: &str) -> BlockBody {
        BlockBody::Star(StarRecord {
            address: address.to_string(),
            star: Star {
                ra: "16h29m1.0s".into(),
                dec: "-26d29m24.9s".into(),
                mag: "2.9".into(),
                con: "Sco".into(),
                story_hex: encode_story("Found in the Scorpius constellation"),
                story_decoded: None,
            },
        })
    }

    #[test]
    fn test_seal_is_reproducible() {
        let block = Block::new(0, 1_700_000_000, String::new(), BlockBody::genesis())
            .seal()
            .unwrap();
        assert_eq!(block.hash.len(), 64);
        assert!(block.is_hash_valid().unwrap());
        assert_eq!(block.compute_hash().unwrap(), block.hash);
    }

    #[test]
    fn test_tampered_body_breaks_hash() {
        let mut block = Block::new(1, 1_700_000_000, "ab".repeat(32), star_body("addr"))
            .seal()
            .unwrap();
        if let BlockBody::Star(record) = &mut block.body {
            record.star.mag = "3.0".into();
        }
        assert!(!block.is_hash_valid().unwrap());
    }

    #[test]
    fn test_decoded_story_not_hashed() {
        let block = Block::new(1, 1_700_000_000, "ab".repeat(32), star_body("addr"))
            .seal()
            .unwrap();
        let decoded = block.clone().with_decoded_story().unwrap();

        assert!(decoded.is_hash_valid().unwrap());
        match decoded.body {
            BlockBody::Star(record) => assert_eq!(
                record.star.story_decoded.as_deref(),
                Some("Found in the Scorpius constellation")
            ),
            BlockBody::Genesis(_) => panic!("expected star body"),
        }
    }

    #[test]
    fn test_json_shape() {
        let block = Block::new(1, 1_700_000_000, "ff".repeat(32), star_body("addr"))
            .seal()
            .unwrap();
        let json = serde_json::to_value(&block).unwrap();

        assert_eq!(json["height"], 1);
        assert_eq!(json["time"], 1_700_000_000);
        assert_eq!(json["previousBlockHash"], "ff".repeat(32));
        assert_eq!(json["body"]["address"], "addr");
        assert_eq!(json["body"]["star"]["con"], "Sco");
        assert!(json["body"]["star"].get("storyDecoded").is_none());

        let back: Block = serde_json::from_value(json).unwrap();
        assert_eq!(back, block);
    }

    #[test]
    fn test_genesis_body_deserializes_as_marker() {
        let json = serde_json::json!({
            "height": 0,
            "time": 1,
            "previousBlockHash": "",
            "hash": "",
            "body": GENESIS_MARKER,
        });
        let block: Block = serde_json::from_value(json).unwrap();
        assert_eq!(block.body, BlockBody::genesis());
        assert_eq!(block.body.address(), None);
    }
}
