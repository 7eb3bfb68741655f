//! SQLite implementation of the store traits.
//!
//! This is the primary storage backend for Star Notary. It uses rusqlite
//! with bundled SQLite, wrapped in async via tokio::spawn_blocking. Records
//! are kept as their JSON encoding next to an integer or text key.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};

use star_notary_core::{Block, ValidationRequest};

use crate::error::{Result, StoreError};
use crate::migration::{self, now_millis};
use crate::traits::{BlockEntry, BlockStore, ValidationStore};

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex. All operations use spawn_blocking
/// to avoid blocking the async runtime.
pub struct SqliteStore {
    /// The SQLite connection, protected by a mutex.
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        tracing::debug!(path = %path.display(), "sqlite store opened");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` against the connection on the blocking pool.
    async fn blocking<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);

        tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
            f(&conn)
        })
        .await
        .map_err(|e| StoreError::Task(format!("spawn_blocking failed: {}", e)))?
    }
}

#[async_trait]
impl BlockStore for SqliteStore {
    async fn put_block(&self, block: &Block) -> Result<()> {
        let height = block.height as i64;
        let value = serde_json::to_string(block)?;

        self.blocking(move |conn| {
            conn.execute(
                "INSERT INTO blocks (height, value) VALUES (?1, ?2)
                 ON CONFLICT(height) DO UPDATE SET value = excluded.value",
                params![height, value],
            )?;
            Ok(())
        })
        .await
    }

    async fn get_block(&self, height: u64) -> Result<Option<Block>> {
        let height = height as i64;

        self.blocking(move |conn| {
            let value: Option<String> = conn
                .query_row(
                    "SELECT value FROM blocks WHERE height = ?1",
                    params![height],
                    |row| row.get(0),
                )
                .optional()?;

            value
                .map(|v| serde_json::from_str(&v).map_err(StoreError::from))
                .transpose()
        })
        .await
    }

    async fn scan_blocks(&self) -> Result<Vec<BlockEntry>> {
        self.blocking(|conn| {
            let mut stmt = conn.prepare("SELECT height, value FROM blocks ORDER BY height ASC")?;
            let rows = stmt
                .query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)))?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            Ok(rows
                .into_iter()
                .map(|(height, value)| BlockEntry {
                    height: height as u64,
                    block: serde_json::from_str(&value).map_err(StoreError::from),
                })
                .collect())
        })
        .await
    }

    async fn latest_height(&self) -> Result<Option<u64>> {
        self.blocking(|conn| {
            let max: Option<i64> =
                conn.query_row("SELECT MAX(height) FROM blocks", [], |row| row.get(0))?;
            Ok(max.map(|h| h as u64))
        })
        .await
    }
}

#[async_trait]
impl ValidationStore for SqliteStore {
    async fn get_request(&self, address: &str) -> Result<Option<ValidationRequest>> {
        let address = address.to_string();

        self.blocking(move |conn| {
            let value: Option<String> = conn
                .query_row(
                    "SELECT value FROM validation_requests WHERE address = ?1",
                    params![address],
                    |row| row.get(0),
                )
                .optional()?;

            value
                .map(|v| serde_json::from_str(&v).map_err(StoreError::from))
                .transpose()
        })
        .await
    }

    async fn put_request(&self, request: &ValidationRequest) -> Result<()> {
        let address = request.address.clone();
        let value = serde_json::to_string(request)?;

        self.blocking(move |conn| {
            conn.execute(
                "INSERT INTO validation_requests (address, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(address) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![address, value, now_millis()],
            )?;
            Ok(())
        })
        .await
    }

    async fn delete_request(&self, address: &str) -> Result<bool> {
        let address = address.to_string();

        self.blocking(move |conn| {
            let deleted = conn.execute(
                "DELETE FROM validation_requests WHERE address = ?1",
                params![address],
            )?;
            Ok(deleted > 0)
        })
        .await
    }
}
