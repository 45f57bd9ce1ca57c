//! PostgreSQL backend

use super::{QuoteStore, StoreError};
use crate::quote::{Quote, StoredQuote};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS bitcoin_data (
    id BIGSERIAL PRIMARY KEY,
    amount VARCHAR NOT NULL,
    base VARCHAR NOT NULL,
    currency VARCHAR NOT NULL,
    timestamp TIMESTAMPTZ DEFAULT NOW()
)";

/// Quote store on a PostgreSQL database
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a lazily-connecting pool
    pub fn connect_lazy(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect_lazy(url)?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl QuoteStore for PostgresStore {
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
             VALUES ($1, $2, $3, $4) RETURNING id",
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
             ORDER BY id DESC LIMIT $1",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn has_table(&self) -> Result<bool, StoreError> {
        let exists = sqlx::query_scalar("SELECT to_regclass('bitcoin_data') IS NOT NULL")
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
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
