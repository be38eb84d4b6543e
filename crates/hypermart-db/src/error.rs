//! # Storage Error Taxonomy
//!
//! Everything the repositories can fail with, as one `DbError` enum.
//! Raw `sqlx::Error` values never cross this crate's boundary; the
//! `From` impl below sorts them into categories the application layer
//! can act on (absent row, broken constraint, exhausted pool) while the
//! original driver message stays available for logging.
//!
//! `InsufficientStock` is not a driver error at all: the sale
//! repository raises it when a guarded stock decrement matches no row,
//! and it carries enough context to tell the cashier what went wrong.

use thiserror::Error;

/// Errors produced by the data access layer.
#[derive(Debug, Error)]
pub enum DbError {
    /// No row for the requested id.
    ///
    /// Raised both by lookups (`get_by_id` on a missing id) and by
    /// writes whose `UPDATE`/`DELETE` affected zero rows.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A UNIQUE index rejected the write. `field` is the
    /// `table.column` pair reported by SQLite, e.g. `users.email`.
    #[error("{field} violates a unique constraint")]
    UniqueViolation { field: String },

    /// A FOREIGN KEY constraint rejected the write, e.g. a sale item
    /// whose `sale_id` has no header row.
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// A guarded stock decrement found less stock than the sale needs.
    /// The surrounding transaction is rolled back; nothing is committed.
    #[error("Insufficient stock for {product}: {available} available, {requested} requested")]
    InsufficientStock {
        product: String,
        available: i64,
        requested: i64,
    },

    /// Could not open or reach the database (missing file that cannot
    /// be created, permissions, closed pool).
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// A schema migration did not apply cleanly.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// The statement itself failed at runtime.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Every pooled connection was busy past the acquire timeout.
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Anything the mapping below has no better bucket for.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Shorthand for [`DbError::NotFound`].
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

/// Result alias used throughout the crate.
pub type DbResult<T> = Result<T, DbError>;

/// Buckets a SQLite-level failure by sniffing the driver message.
///
/// SQLite reports constraint failures as text:
/// `UNIQUE constraint failed: users.email` and
/// `FOREIGN KEY constraint failed`. There is no structured code for the
/// offending column, so the `table.column` suffix is parsed out here.
fn classify_database_error(msg: &str) -> DbError {
    if let Some((_, field)) = msg.split_once("UNIQUE constraint failed: ") {
        return DbError::UniqueViolation {
            field: field.trim().to_string(),
        };
    }

    if msg.contains("FOREIGN KEY constraint failed") {
        return DbError::ForeignKeyViolation {
            message: msg.to_string(),
        };
    }

    DbError::QueryFailed(msg.to_string())
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            // fetch_one on an empty result. Repositories that know the
            // entity/id replace this with `not_found` themselves.
            sqlx::Error::RowNotFound => DbError::not_found("Record", "unknown"),

            sqlx::Error::Database(db_err) => classify_database_error(db_err.message()),

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            other => DbError::Internal(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
