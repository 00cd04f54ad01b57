use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::info;

/// Errors from DatabaseManager
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Builds the SQLite pool holding user accounts
pub struct DatabaseManager;

impl DatabaseManager {
    /// Open a pool for `database_url`. In-memory databases get a single connection
    /// that never recycles, otherwise every connection would see its own empty database.
    pub async fn connect(database_url: &str) -> Result<SqlitePool, DatabaseError> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| DatabaseError::Connection(e.to_string()))?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = if Self::is_memory(database_url) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await
        } else {
            SqlitePoolOptions::new()
                .max_connections(5)
                .connect_with(options)
                .await
        }
        .map_err(|e| DatabaseError::Connection(e.to_string()))?;

        info!("Created database pool for: {}", database_url);
        Ok(pool)
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(pool: &SqlitePool) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1")
            .execute(pool)
            .await
            .map_err(|e| DatabaseError::Connection(e.to_string()))?;
        Ok(())
    }

    fn is_memory(database_url: &str) -> bool {
        database_url.contains(":memory:") || database_url.contains("mode=memory")
    }
}
