//! # Pool and Database Handle
//!
//! One `SqlitePool` serves the whole process. The aggregator and the
//! seed binary both go through [`Database`], which owns the pool and
//! hands out per-entity repositories cloned onto it.
//!
//! File-backed databases run in WAL journal mode so alert recomputes
//! and report reads never block a checkout writing a sale, with
//! `NORMAL` synchronous as the durability/latency trade and foreign
//! keys switched on (SQLite defaults them off). The in-memory variant
//! used by tests and `seed --dry-run` pins the pool to a single
//! connection, because every new in-memory connection is a separate
//! empty database.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::alert::StockAlertRepository;
use crate::repository::product::ProductRepository;
use crate::repository::sale::SaleRepository;
use crate::repository::setting::SettingRepository;
use crate::repository::user::UserRepository;

/// Sentinel path that selects a private in-memory database.
const MEMORY_PATH: &str = ":memory:";

/// Pool settings, consumed by [`Database::new`].
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Where the SQLite file lives. Created on first open.
    pub database_path: PathBuf,

    /// Upper bound on pooled connections. A till runs one process, so
    /// the default of 5 leaves headroom for reports alongside checkout.
    pub max_connections: u32,

    /// Connections kept warm between bursts.
    pub min_connections: u32,

    /// How long an acquire may wait before [`DbError::PoolExhausted`].
    pub connect_timeout: Duration,

    /// Idle time after which a surplus connection is dropped.
    pub idle_timeout: Duration,

    /// Apply pending migrations while opening. On by default; turn off
    /// only when something else owns the schema.
    pub run_migrations: bool,
}

impl DbConfig {
    /// Configuration for a file-backed database at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            run_migrations: true,
        }
    }

    /// Overrides the pool's connection ceiling.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Overrides how many connections stay warm.
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Overrides the acquire timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Enables or disables migrations during open.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Configuration for a throwaway in-memory database.
    ///
    /// Single connection: SQLite gives each in-memory connection its
    /// own database, so a wider pool would scatter the tables.
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(MEMORY_PATH),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            run_migrations: true,
        }
    }

    fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == MEMORY_PATH
    }

    fn connect_options(&self) -> SqliteConnectOptions {
        if self.is_in_memory() {
            // No journal tuning: WAL is meaningless without a file.
            SqliteConnectOptions::new().in_memory(true).foreign_keys(true)
        } else {
            SqliteConnectOptions::new()
                .filename(&self.database_path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
                .foreign_keys(true)
        }
    }
}

/// Owns the pool; everything else borrows repositories from it.
///
/// Cloning is cheap (the pool is internally reference-counted), which
/// is how the aggregator and auth service share one database.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens (and if needed creates) the database, then migrates it.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            in_memory = config.is_in_memory(),
            "opening database"
        );

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .connect_with(config.connect_options())
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        debug!(max_connections = config.max_connections, "pool ready");

        let db = Database { pool };

        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Applies pending migrations. `new` already does this unless the
    /// config said not to.
    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    /// Raw pool access for queries the repositories do not cover.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    // Repository accessors. Each clones the pool handle, so they are
    // free to create per call site.

    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.pool.clone())
    }

    pub fn sales(&self) -> SaleRepository {
        SaleRepository::new(self.pool.clone())
    }

    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.pool.clone())
    }

    pub fn stock_alerts(&self) -> StockAlertRepository {
        StockAlertRepository::new(self.pool.clone())
    }

    pub fn settings(&self) -> SettingRepository {
        SettingRepository::new(self.pool.clone())
    }

    /// Drains and closes the pool. Repository calls fail afterwards.
    pub async fn close(&self) {
        info!("closing database pool");
        self.pool.close().await;
    }

    /// Cheap liveness probe for startup diagnostics.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_open_and_probe() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(db.health_check().await);
    }

    #[tokio::test]
    async fn test_builder_overrides_pool_limits() {
        let config = DbConfig::new("data/hypermart.db")
            .max_connections(8)
            .min_connections(3)
            .connect_timeout(Duration::from_secs(3));

        assert_eq!(config.max_connections, 8);
        assert_eq!(config.min_connections, 3);
        assert_eq!(config.connect_timeout, Duration::from_secs(3));
        assert!(!config.is_in_memory());
    }

    #[tokio::test]
    async fn test_open_applies_every_embedded_migration() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let (embedded, applied) = migrations::migration_status(db.pool()).await.unwrap();
        assert!(embedded >= 1);
        assert_eq!(embedded, applied);
    }
}
