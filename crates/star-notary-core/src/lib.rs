//! # Star Notary Core
//!
//! Pure primitives for Star Notary: blocks, canonical hashing, star payloads,
//! and address validation requests.
//!
//! This crate contains no I/O, no storage, no networking. It is pure computation
//! over the ledger's data structures.
//!
//! ## Key Types
//!
//! - [`Block`] - One entry of the hash-linked ledger
//! - [`BlockBody`] - Genesis marker or a notarized [`StarRecord`]
//! - [`StarSubmission`] - A checked star payload, ready to be notarized
//! - [`ValidationRequest`] - The challenge/response record for an address
//! - [`SignatureVerifier`] - Black-box check of a signed challenge message
//!
//! ## Canonicalization
//!
//! Block hashes are SHA-256 over deterministic CBOR. See [`canonical`] module.

pub mod block;
pub mod canonical;
pub mod clock;
pub mod crypto;
pub mod error;
pub mod request;
pub mod star;

pub use block::{Block, BlockBody, Star, StarRecord, GENESIS_MARKER};
pub use canonical::{block_hash, canonical_block_bytes};
pub use clock::{Clock, SystemClock};
pub use crypto::{Ed25519Verifier, Keypair, Sha256Hash, SignatureVerifier};
pub use error::{CoreError, ValidationError};
pub use request::{
    ValidationOutcome, ValidationRequest, ValidationStatus, DEFAULT_VALIDATION_WINDOW_MS,
};
pub use star::{
    decode_story, encode_story, validate_address, validate_signature, StarSubmission,
    MAX_STORY_BYTES,
};
