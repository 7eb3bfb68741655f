//! Proptest generators for property-based testing.

use proptest::prelude::*;

use star_notary_core::{Block, BlockBody, Keypair, StarSubmission, MAX_STORY_BYTES};

/// Generate a random keypair.
pub fn keypair() -> impl Strategy<Value = Keypair> {
    any::<[u8; 32]>().prop_map(|seed| Keypair::from_seed(&seed))
}

/// Generate a wallet address.
pub fn address() -> impl Strategy<Value = String> {
    keypair().prop_map(|kp| kp.address())
}

/// Generate a non-empty coordinate-like field.
pub fn star_field() -> impl Strategy<Value = String> {
    "[0-9A-Za-z .:'+-]{1,24}"
}

/// Generate an ASCII story within the size limit.
pub fn story() -> impl Strategy<Value = String> {
    prop::collection::vec(0x20u8..0x7f, 1..=MAX_STORY_BYTES)
        .prop_map(|bytes| bytes.into_iter().map(char::from).collect())
}

/// Generate an ASCII story just past the size limit.
pub fn oversized_story() -> impl Strategy<Value = String> {
    (MAX_STORY_BYTES + 1..MAX_STORY_BYTES * 2).prop_map(|len| "x".repeat(len))
}

/// Generate a story containing at least one non-ASCII character.
pub fn non_ascii_story() -> impl Strategy<Value = String> {
    ("[a-z ]{0,20}", "[é☆αß]", "[a-z ]{0,20}").prop_map(|(a, b, c)| format!("{a}{b}{c}"))
}

/// Generate a valid star submission.
pub fn star_submission() -> impl Strategy<Value = StarSubmission> {
    (star_field(), star_field(), star_field(), star_field(), story()).prop_map(
        |(ra, dec, mag, con, story)| {
            StarSubmission::new(ra, dec, mag, con, story).expect("generated star is valid")
        },
    )
}

/// Generate a sealed star block at an arbitrary height and time.
pub fn star_block() -> impl Strategy<Value = Block> {
    (
        0u64..1_000_000,
        0i64..=i64::MAX / 2,
        "[0-9a-f]{64}",
        address(),
        star_submission(),
    )
        .prop_map(|(height, time, previous, address, star)| {
            Block::new(height, time, previous, star.into_body(&address))
                .seal()
                .expect("generated block seals")
        })
}

/// Generate a sealed genesis block.
pub fn genesis_block() -> impl Strategy<Value = Block> {
    (0i64..=i64::MAX / 2).prop_map(|time| {
        Block::new(0, time, String::new(), BlockBody::genesis())
            .seal()
            .expect("genesis seals")
    })
}
