//! SQLite backend

use super::{QuoteStore, StoreError};
use crate::quote::{Quote, StoredQuote};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS bitcoin_data (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    amount TEXT NOT NULL,
    base TEXT NOT NULL,
    currency TEXT NOT NULL,
    timestamp TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)";

/// Quote store on a SQLite database
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Create a lazily-connecting pool
    pub fn connect_lazy(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_lazy(url)?;
        Ok(Self { pool })
    }

    /// Open an existing database file read-only
    ///
    /// Returns `None` when the file does not exist; nothing is created on
    /// disk, whatever `mode` the URL asks for. In-memory URLs never refer to
    /// existing data.
    pub fn open_existing(url: &str, max_connections: u32) -> Result<Option<Self>, StoreError> {
        let options = SqliteConnectOptions::from_str(url)?
            .read_only(true)
            .create_if_missing(false);
        if url.contains(":memory:") || !options.get_filename().exists() {
            return Ok(None);
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_lazy_with(options);
        Ok(Some(Self { pool }))
    }

    /// Private in-memory database
    ///
    /// Every connection to `sqlite::memory:` opens a fresh database, so the
    /// pool is pinned to a single connection that is never recycled.
    pub fn in_memory() -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_lazy("sqlite::memory:")?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl QuoteStore for SqliteStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        Ok(())
    }

    async fn insert(
        &self,
        quote: &Quote,
        timestamp: DateTime<Utc>,
    ) -> Result<StoredQuote, StoreError> {
        let mut tx = self.pool.begin().await?;

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO bitcoin_data (amount, base, currency, timestamp) \
             VALUES (?, ?, ?, ?) RETURNING id",
        )
        .bind(&quote.amount)
        .bind(&quote.base)
        .bind(&quote.currency)
        .bind(timestamp)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(StoredQuote {
            id,
            quote: quote.clone(),
            timestamp,
        })
    }

    async fn recent(&self, limit: u32) -> Result<Vec<StoredQuote>, StoreError> {
        let rows = sqlx::query_as::<_, StoredQuote>(
            "SELECT id, amount, base, currency, timestamp FROM bitcoin_data \
             ORDER BY id DESC LIMIT ?",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn has_table(&self) -> Result<bool, StoreError> {
        let tables: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'bitcoin_data'",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(tables > 0)
    }

    async fn count(&self) -> Result<i64, StoreError> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM bitcoin_data")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
