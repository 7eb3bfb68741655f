//! # Star Notary
//!
//! Notarizes star observations against wallet addresses in an append-only,
//! hash-linked ledger.
//!
//! ## Overview
//!
//! - **Blockchain**: builds, links, and audits blocks. Appends are serialized
//!   ledger-wide; reads work against store snapshots.
//! - **ValidationRegistry**: the per-address challenge/response state machine
//!   gating who may notarize, with a five-minute window.
//! - **Notary**: accepts a star once its address holds a valid signature,
//!   appends it, and consumes the validation.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use star_notary::{Notary, NotaryConfig};
//! use star_notary::core::{Keypair, StarSubmission};
//! use star_notary::store::SqliteStore;
//!
//! async fn example() {
//!     let store = SqliteStore::open("notary.db").unwrap();
//!     let notary = Notary::open(store, NotaryConfig::default()).await.unwrap();
//!
//!     // Issue a challenge and answer it with the wallet key
//!     let wallet = Keypair::generate();
//!     let request = notary.registry().request_validation(&wallet.address()).await.unwrap();
//!     let signature = wallet.sign_message(&request.message);
//!     let outcome = notary
//!         .registry()
//!         .validate_message_signature(&wallet.address(), &signature)
//!         .await
//!         .unwrap();
//!     assert!(outcome.register_star);
//!
//!     // Notarize
//!     let star = StarSubmission::new("16h29m1.0s", "-26d29m24.9s", "2.9", "Sco", "Found it").unwrap();
//!     let block = notary.submit_star(&wallet.address(), star).await.unwrap();
//!     assert_eq!(block.height, 1);
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `star_notary::core` - Core primitives (Block, StarSubmission, etc.)
//! - `star_notary::store` - Storage abstraction and SQLite

pub mod blockchain;
pub mod config;
pub mod error;
pub mod notary;
pub mod registry;

// Re-export component crates
pub use star_notary_core as core;
pub use star_notary_store as store;

// Re-export main types for convenience
pub use blockchain::Blockchain;
pub use config::NotaryConfig;
pub use error::{NotaryError, Result};
pub use notary::Notary;
pub use registry::ValidationRegistry;

// Re-export commonly used core types
pub use star_notary_core::{
    Block, BlockBody, Star, StarRecord, StarSubmission, ValidationOutcome, ValidationRequest,
    ValidationStatus,
};
