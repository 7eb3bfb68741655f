//! Golden test vectors for deterministic verification.
//!
//! Each vector fixes every hashed field of a block together with the hash it
//! must produce. A change to the canonical encoding shows up here first.

use star_notary_core::{Block, BlockBody, StarSubmission};

/// Star payload of a golden vector.
#[derive(Debug, Clone)]
pub struct VectorStar {
    pub address: &'static str,
    pub ra: &'static str,
    pub dec: &'static str,
    pub mag: &'static str,
    pub con: &'static str,
    pub story: &'static str,
}

/// A golden test vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    pub height: u64,
    /// Unix seconds.
    pub time: i64,
    pub previous_block_hash: &'static str,
    /// `None` for the genesis body.
    pub star: Option<VectorStar>,
    /// Expected block hash (hex).
    pub expected_hash: &'static str,
}

const GENESIS_HASH: &str = "f4430f357296713877f55a742d49fd5a7229200374c256850863ae79f244cd62";
const FIRST_STAR_HASH: &str = "09e7fb91e6e921a6bba11e67f894df05d96b6076cbc46541f81593406b160695";

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "Genesis block",
            height: 0,
            time: 1_700_000_000,
            previous_block_hash: "",
            star: None,
            expected_hash: GENESIS_HASH,
        },
        GoldenVector {
            name: "First star after genesis",
            height: 1,
            time: 1_700_000_060,
            previous_block_hash: GENESIS_HASH,
            star: Some(VectorStar {
                address: "addr-1",
                ra: "16h29m1.0s",
                dec: "-26d29m24.9s",
                mag: "2.9",
                con: "Sco",
                story: "Found star using https://www.google.com/sky/",
            }),
            expected_hash: FIRST_STAR_HASH,
        },
        GoldenVector {
            name: "Wide height and time",
            height: 300,
            time: 5_000_000_000,
            previous_block_hash: FIRST_STAR_HASH,
            star: Some(VectorStar {
                address: "addr-2",
                ra: "1",
                dec: "2",
                mag: "3",
                con: "Ori",
                story: "Hi",
            }),
            expected_hash: "e430c82dc9032da909efef5f04b7f3a16e80baad0e81c4a068f4c2663c62c86d",
        },
    ]
}

/// Build and seal the block a vector describes.
pub fn block_from_vector(vector: &GoldenVector) -> Block {
    let body = match &vector.star {
        None => BlockBody::genesis(),
        Some(star) => StarSubmission::new(star.ra, star.dec, star.mag, star.con, star.story)
            .expect("vector star is valid")
            .into_body(star.address),
    };

    Block::new(
        vector.height,
        vector.time,
        vector.previous_block_hash.to_string(),
        body,
    )
    .seal()
    .expect("vector block seals")
}

/// Names of the vectors whose computed hash differs from the expected one.
pub fn verify_all_vectors() -> Vec<&'static str> {
    all_vectors()
        .iter()
        .filter(|v| block_from_vector(v).hash != v.expected_hash)
        .map(|v| v.name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_vectors_match() {
        assert!(verify_all_vectors().is_empty());
    }

    #[test]
    fn test_vectors_form_a_chain() {
        let vectors = all_vectors();
        for pair in vectors.windows(2) {
            assert_eq!(pair[1].previous_block_hash, pair[0].expected_hash);
        }
    }

    #[test]
    fn test_story_is_hashed_as_hex() {
        let vector = &all_vectors()[2];
        let block = block_from_vector(vector);
        match block.body {
            BlockBody::Star(record) => assert_eq!(record.star.story_hex, "4869"),
            BlockBody::Genesis(_) => panic!("expected star body"),
        }
    }
}
