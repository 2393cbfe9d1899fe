//! # Pool and Database Handle
//!
//! Opens the SQLite file, applies migrations and hands out repositories.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │  DbConfig::new("revenda.db")                                     │
//! │        │ .max_connections(n)                                     │
//! │        ▼                                                         │
//! │  Database::new(config) ── WAL, foreign keys, migrations          │
//! │        │                                                         │
//! │        ├── users()                  credential store             │
//! │        ├── reference(kind)          categories / channels        │
//! │        ├── products()               catalog                      │
//! │        └── stock()                  ledger (ownership via join)  │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every repository is a thin struct over a cloned `SqlitePool`, so handing
//! one out costs a reference-count bump.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use tracing::info;

use revenda_core::ReferenceKind;

use crate::error::{DbError, DbResult};
use crate::migrations::{self, MigrationStatus};
use crate::repository::product::ProductRepository;
use crate::repository::reference::ReferenceRepository;
use crate::repository::stock::StockRepository;
use crate::repository::user::UserRepository;

const MEMORY_PATH: &str = ":memory:";

// =============================================================================
// Configuration
// =============================================================================

/// Where the database lives and how many connections to keep.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub database_path: PathBuf,
    /// Default: 5
    pub max_connections: u32,
    /// How long a request waits for a free connection. Default: 30s
    pub acquire_timeout: Duration,
    /// Default: true
    pub run_migrations: bool,
}

impl DbConfig {
    /// File-backed database; the file is created on first open.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            acquire_timeout: Duration::from_secs(30),
            run_migrations: true,
        }
    }

    /// Private in-memory database for tests.
    ///
    /// A `:memory:` database exists per connection, so the pool is pinned
    /// to one. Repositories never hold a connection while calling back into
    /// the pool, which keeps that single connection sufficient.
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(MEMORY_PATH),
            max_connections: 1,
            acquire_timeout: Duration::from_secs(5),
            run_migrations: true,
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max.max(1);
        self
    }

    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    fn is_memory(&self) -> bool {
        self.database_path.as_os_str() == MEMORY_PATH
    }
}

// =============================================================================
// Database
// =============================================================================

/// Shared handle to the store. Clone freely.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the pool and, unless disabled, brings the schema up to date.
    ///
    /// ## Returns
    /// * `Err(DbError::ConnectionFailed)` - path unusable or SQLite refused
    /// * `Err(DbError::MigrationFailed)` - schema could not be applied
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        let url = format!("sqlite://{}", config.database_path.display());
        let mut options = SqliteConnectOptions::from_str(&url)
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
            .foreign_keys(true)
            .create_if_missing(true);

        // WAL needs a real file
        if !config.is_memory() {
            options = options
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal);
        }

        let max_connections = if config.is_memory() {
            1
        } else {
            config.max_connections
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(config.acquire_timeout)
            // An idle in-memory connection must never be reaped
            .idle_timeout(None)
            .connect_with(options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!(
            path = %config.database_path.display(),
            max_connections,
            "Database opened"
        );

        let db = Database { pool };
        if config.run_migrations {
            migrations::run_migrations(&db.pool).await?;
        }
        Ok(db)
    }

    /// Embedded versus applied migration counts, for the status endpoint.
    pub async fn migration_status(&self) -> DbResult<MigrationStatus> {
        migrations::migration_status(&self.pool).await
    }

    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.pool.clone())
    }

    /// Repository for one of the three reference sets.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let channels = db.reference(ReferenceKind::SaleChannel).list(&user_id).await?;
    /// ```
    pub fn reference(&self, kind: ReferenceKind) -> ReferenceRepository {
        ReferenceRepository::new(self.pool.clone(), kind)
    }

    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.pool.clone())
    }

    pub fn stock(&self) -> StockRepository {
        StockRepository::new(self.pool.clone())
    }

    /// Waits for in-flight queries, then closes every connection.
    pub async fn close(&self) {
        info!("Closing database");
        self.pool.close().await;
    }

    /// True when a trivial query round-trips.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_is_migrated() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        assert!(db.health_check().await);
        let status = db.migration_status().await.unwrap();
        assert_eq!(status.total, status.applied);
        assert!(status.total >= 1);
    }

    #[tokio::test]
    async fn test_skipping_migrations() {
        let db = Database::new(DbConfig::in_memory().run_migrations(false))
            .await
            .unwrap();

        assert_eq!(db.migration_status().await.unwrap().applied, 0);
    }

    #[tokio::test]
    async fn test_closed_pool_is_unhealthy() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.close().await;
        assert!(!db.health_check().await);
    }

    #[test]
    fn test_max_connections_floor() {
        assert_eq!(DbConfig::new("x.db").max_connections(0).max_connections, 1);
        assert!(DbConfig::in_memory().is_memory());
        assert!(!DbConfig::new("x.db").is_memory());
    }
}
