//! # Schema Migrations
//!
//! The HyperMart schema (products, sales, sale_items, users, stock_alerts,
//! settings) is created and evolved through SQL files under
//! `migrations/sqlite/`, embedded into the binary by `sqlx::migrate!` so a
//! fresh install needs nothing on disk besides the database file itself.
//!
//! sqlx tracks applied migrations in the `_sqlx_migrations` table and runs
//! only what is pending, in filename order, each inside its own
//! transaction. Checksums are recorded per file, so editing an
//! already-applied migration is detected and rejected. To change the
//! schema, add `NNN_description.sql` with the next number. Never rewrite
//! an existing file.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;

// Path is relative to this crate's manifest, resolving to the
// workspace-level migrations directory.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Applies any migrations the database has not seen yet.
///
/// Called during `Database::new` unless the config disables it. Safe to
/// call repeatedly; an up-to-date database is a no-op.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    debug!(
        embedded = MIGRATOR.migrations.len(),
        "checking for pending migrations"
    );

    MIGRATOR.run(pool).await?;

    info!("database schema is up to date");
    Ok(())
}

/// Reports `(embedded, applied)` migration counts for diagnostics.
///
/// A database that predates the migrator (or was created without it)
/// reports zero applied rather than erroring.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let embedded = MIGRATOR.migrations.len();

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(pool)
        .await
        .unwrap_or(0);

    Ok((embedded, applied as usize))
}
