//! # Star Notary Testkit
//!
//! Testing utilities for Star Notary.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Fixed blocks with their expected hashes, pinning the canonical encoding
//! - **Generators**: Proptest strategies for star payloads
//! - **Fixtures**: A wallet keypair and a manually driven clock
//!
//! ## Golden Vectors
//!
//! ```rust
//! use star_notary_testkit::vectors::{all_vectors, block_from_vector};
//!
//! for vector in all_vectors() {
//!     let block = block_from_vector(&vector);
//!     assert_eq!(block.hash, vector.expected_hash);
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use star_notary_testkit::generators::star_submission;
//!
//! proptest! {
//!     #[test]
//!     fn body_keeps_story(star in star_submission()) {
//!         let story = star.story().to_string();
//!         prop_assert!(star.into_body("addr").address().is_some());
//!         prop_assert!(story.len() <= 500);
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use star_notary_testkit::fixtures::TestFixture;
//!
//! let fixture = TestFixture::new();
//! fixture.clock().advance(300_001);
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{multi_party_fixtures, sample_star, ManualClock, TestFixture};
pub use generators::star_submission;
pub use vectors::{all_vectors, block_from_vector, verify_all_vectors, GoldenVector};
