//! # Settings Repository
//!
//! Store-wide key/value configuration: store name, receipt footer,
//! currency symbol, tax registration number and the like. Writes are
//! upserts keyed on the setting name.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use hypermart_core::Setting;

/// Repository for store settings.
#[derive(Debug, Clone)]
pub struct SettingRepository {
    pool: SqlitePool,
}

impl SettingRepository {
    /// Creates a new SettingRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SettingRepository { pool }
    }

    /// Lists all settings in key order.
    pub async fn all(&self) -> DbResult<Vec<Setting>> {
        let settings = sqlx::query_as::<_, Setting>(
            "SELECT key, value FROM settings ORDER BY key",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(settings)
    }

    /// Gets one setting.
    pub async fn get(&self, key: &str) -> DbResult<Option<Setting>> {
        let setting = sqlx::query_as::<_, Setting>(
            "SELECT key, value FROM settings WHERE key = ?1",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(setting)
    }

    /// Sets a value, inserting or overwriting.
    pub async fn set(&self, key: &str, value: &str) -> DbResult<Setting> {
        debug!(key = %key, "Writing setting");

        sqlx::query(
            r#"
            INSERT INTO settings (key, value)
            VALUES (?1, ?2)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(Setting {
            key: key.to_string(),
            value: value.to_string(),
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_set_inserts_then_overwrites() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.settings();

        repo.set("store_name", "HyperMart").await.unwrap();
        repo.set("store_name", "HyperMart Downtown").await.unwrap();

        let setting = repo.get("store_name").await.unwrap().unwrap();
        assert_eq!(setting.value, "HyperMart Downtown");

        let all = repo.all().await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn test_get_missing_key() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(db.settings().get("nope").await.unwrap().is_none());
    }
}
