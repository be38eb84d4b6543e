//! # User Repository
//!
//! Database operations for admin and cashier accounts.
//!
//! ## Credential Handling
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  This repository only ever sees password *hashes*.                      │
//! │                                                                         │
//! │  sign_in / add_user (hypermart-pos auth)                                │
//! │       │  hash with Argon2id + per-user salt                             │
//! │       ▼                                                                 │
//! │  UserRepository.insert(user)      ← user.password_hash is a PHC string │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  users.password_hash column       ← never plaintext, never logged      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use hypermart_core::{Role, User};

/// Repository for user database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Lists all accounts, oldest first.
    pub async fn list(&self) -> DbResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, role, password_hash, created_at
            FROM users
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = users.len(), "Listed users");
        Ok(users)
    }

    /// Gets a user by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, role, password_hash, created_at
            FROM users
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Looks up a user by email for sign-in.
    pub async fn find_by_email(&self, email: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, role, password_hash, created_at
            FROM users
            WHERE email = ?1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Inserts a new account. The caller provides an already-hashed
    /// password; plaintext never reaches this layer.
    ///
    /// ## Returns
    /// * `Ok(User)` - The inserted account
    /// * `Err(DbError::UniqueViolation)` - Email already registered
    pub async fn insert(
        &self,
        name: &str,
        email: &str,
        role: Role,
        password_hash: &str,
    ) -> DbResult<User> {
        let user = User {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
            role,
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };

        debug!(id = %user.id, email = %user.email, "Inserting user");

        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, role, password_hash, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.role)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;

        Ok(user)
    }

    /// Deletes an account. Their recorded sales keep the cashier name
    /// snapshot, so history is unaffected.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting user");

        let result = sqlx::query("DELETE FROM users WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }

        Ok(())
    }

    /// Counts accounts (for diagnostics and seeding).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
