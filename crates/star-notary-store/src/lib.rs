//! # Star Notary Store
//!
//! Storage abstraction for Star Notary. Provides trait-based interfaces for
//! ledger blocks and validation requests, with SQLite and in-memory
//! implementations.
//!
//! ## Overview
//!
//! The ledger only needs an ordered key/value store: blocks keyed by height
//! with `put`, `get`, and a full scan in ascending height order. Validation
//! requests are keyed by wallet address. Both concerns live behind
//! [`BlockStore`] and [`ValidationStore`] so the services stay
//! storage-agnostic.
//!
//! ## Key Types
//!
//! - [`BlockStore`] - Height-keyed block persistence
//! - [`ValidationStore`] - Address-keyed validation request persistence
//! - [`SqliteStore`] - SQLite-based persistent storage
//! - [`MemoryStore`] - In-memory storage for tests
//!
//! ## Usage
//!
//! ```rust,no_run
//! use star_notary_store::{BlockStore, SqliteStore};
//!
//! async fn example() {
//!     // Open a SQLite database
//!     let store = SqliteStore::open("notary.db").unwrap();
//!
//!     // Or use an in-memory database for testing
//!     let store = SqliteStore::open_memory().unwrap();
//!
//!     let height = store.latest_height().await.unwrap();
//!     assert_eq!(height, None);
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Numeric keys**: heights are stored as integers, so scans are ordered
//!   numerically ("10" never sorts before "2").
//! - **Plain overwrite**: `put_block` replaces whatever is stored at a height.
//!   Append-only discipline is enforced by the ledger, not the store.

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{BlockEntry, BlockStore, ValidationStore};
