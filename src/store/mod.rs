//! Relational storage for captured quotes
//!
//! One append-only table, `bitcoin_data`, on PostgreSQL or SQLite. The
//! backend is picked from the connection URL scheme.

mod postgres;
mod sqlite;

pub use postgres::PostgresStore;
pub use sqlite::SqliteStore;

use crate::config::DatabaseConfig;
use crate::quote::{Quote, StoredQuote};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("unsupported database url scheme: {0}")]
    UnsupportedScheme(String),
}

/// Supported database backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Postgres,
    Sqlite,
}

impl Backend {
    /// Pick a backend from a connection string
    pub fn from_url(url: &str) -> Result<Self, StoreError> {
        let scheme = url.split(':').next().unwrap_or_default();
        match scheme {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "sqlite" => Ok(Self::Sqlite),
            other => Err(StoreError::UnsupportedScheme(other.to_string())),
        }
    }
}

/// Append-only quote storage
#[async_trait]
pub trait QuoteStore: Send + Sync {
    /// Round-trip a trivial query
    async fn ping(&self) -> Result<(), StoreError>;

    /// Create the table if it does not exist
    async fn ensure_schema(&self) -> Result<(), StoreError>;

    /// Insert one quote inside its own transaction
    async fn insert(
        &self,
        quote: &Quote,
        timestamp: DateTime<Utc>,
    ) -> Result<StoredQuote, StoreError>;

    /// Most recent quotes, newest first
    async fn recent(&self, limit: u32) -> Result<Vec<StoredQuote>, StoreError>;

    /// Whether `bitcoin_data` exists
    async fn has_table(&self) -> Result<bool, StoreError>;

    /// Number of stored quotes
    async fn count(&self) -> Result<i64, StoreError>;

    /// Close the underlying pool
    async fn close(&self);
}

/// Build a store for the configured URL
///
/// The pool connects lazily, so an unreachable database surfaces on the first
/// query rather than here.
pub fn connect(config: &DatabaseConfig) -> Result<Arc<dyn QuoteStore>, StoreError> {
    let store: Arc<dyn QuoteStore> = match Backend::from_url(&config.url)? {
        Backend::Postgres => Arc::new(PostgresStore::connect_lazy(
            &config.url,
            config.max_connections,
        )?),
        Backend::Sqlite => Arc::new(SqliteStore::connect_lazy(
            &config.url,
            config.max_connections,
        )?),
    };
    Ok(store)
}

/// Open the configured store without creating anything
///
/// `None` means there is no database yet. PostgreSQL databases are always
/// opened; the caller checks [`QuoteStore::has_table`].
pub fn open_existing(config: &DatabaseConfig) -> Result<Option<Arc<dyn QuoteStore>>, StoreError> {
    let store: Option<Arc<dyn QuoteStore>> = match Backend::from_url(&config.url)? {
        Backend::Postgres => Some(Arc::new(PostgresStore::connect_lazy(
            &config.url,
            config.max_connections,
        )?)),
        Backend::Sqlite => SqliteStore::open_existing(&config.url, config.max_connections)?
            .map(|store| Arc::new(store) as Arc<dyn QuoteStore>),
    };
    Ok(store)
}

/// Startup connectivity check
///
/// Logs the outcome. The error is swallowed unless `fail_fast` is set.
pub async fn check_connectivity(store: &dyn QuoteStore, fail_fast: bool) -> Result<(), StoreError> {
    match store.ping().await {
        Ok(()) => {
            tracing::info!("Database connection succeeded");
            Ok(())
        }
        Err(e) if fail_fast => {
            tracing::error!(error = %e, "Failed to connect to database, aborting");
            Err(e)
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to connect to database");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_from_url() {
        assert_eq!(
            Backend::from_url("postgres://u:p@localhost/db").unwrap(),
            Backend::Postgres
        );
        assert_eq!(
            Backend::from_url("postgresql://localhost/db").unwrap(),
            Backend::Postgres
        );
        assert_eq!(Backend::from_url("sqlite::memory:").unwrap(), Backend::Sqlite);
        assert_eq!(
            Backend::from_url("sqlite://btc_etl.db?mode=rwc").unwrap(),
            Backend::Sqlite
        );
    }

    #[test]
    fn test_backend_rejects_unknown_scheme() {
        let err = Backend::from_url("mysql://localhost/db").unwrap_err();
        assert!(matches!(err, StoreError::UnsupportedScheme(s) if s == "mysql"));
    }

    #[tokio::test]
    async fn test_connectivity_error_swallowed_by_default() {
        let config = DatabaseConfig {
            url: "sqlite:///nonexistent-dir/btc_etl.db".to_string(),
            max_connections: 1,
            fail_fast: false,
        };
        let store = connect(&config).unwrap();
        assert!(check_connectivity(store.as_ref(), false).await.is_ok());
    }

    #[tokio::test]
    async fn test_connectivity_error_fail_fast() {
        let config = DatabaseConfig {
            url: "sqlite:///nonexistent-dir/btc_etl.db".to_string(),
            max_connections: 1,
            fail_fast: true,
        };
        let store = connect(&config).unwrap();
        assert!(check_connectivity(store.as_ref(), true).await.is_err());
    }

    #[tokio::test]
    async fn test_connectivity_reachable_store() {
        let store = SqliteStore::in_memory().unwrap();
        assert!(check_connectivity(&store, true).await.is_ok());
    }
}
