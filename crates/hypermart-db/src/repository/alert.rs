//! # Stock Alert Repository
//!
//! Persistence for derived stock alerts.
//!
//! Alerts are computed in `hypermart-core::alerts` from the product
//! snapshot and written back wholesale: delete everything, insert the
//! fresh set. Alert ids derive deterministically from product ids, so a
//! recompute that changes nothing rewrites identical rows. The table is
//! a cache for external readers; the in-memory store never reads it back
//! except at startup.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use hypermart_core::StockAlert;

/// Repository for stock alert persistence.
#[derive(Debug, Clone)]
pub struct StockAlertRepository {
    pool: SqlitePool,
}

impl StockAlertRepository {
    /// Creates a new StockAlertRepository.
    pub fn new(pool: SqlitePool) -> Self {
        StockAlertRepository { pool }
    }

    /// Lists the persisted alert set.
    pub async fn list(&self) -> DbResult<Vec<StockAlert>> {
        let alerts = sqlx::query_as::<_, StockAlert>(
            r#"
            SELECT id, product_id, product_name, current_stock, threshold, status
            FROM stock_alerts
            ORDER BY rowid
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(alerts)
    }

    /// Replaces the whole alert set in one transaction.
    ///
    /// Delete-all-then-insert-all rather than a diff: the set is small
    /// (bounded by the catalog) and ids are stable across recomputes.
    pub async fn replace_all(&self, alerts: &[StockAlert]) -> DbResult<()> {
        debug!(count = alerts.len(), "Replacing stock alerts");

        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM stock_alerts")
            .execute(&mut *tx)
            .await?;

        for alert in alerts {
            sqlx::query(
                r#"
                INSERT INTO stock_alerts (id, product_id, product_name, current_stock, threshold, status)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )
            .bind(&alert.id)
            .bind(&alert.product_id)
            .bind(&alert.product_name)
            .bind(alert.current_stock)
            .bind(alert.threshold)
            .bind(alert.status)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use hypermart_core::AlertStatus;

    fn alert(product_id: &str, stock: i64, threshold: i64, status: AlertStatus) -> StockAlert {
        StockAlert {
            id: format!("alert-{product_id}"),
            product_id: product_id.to_string(),
            product_name: format!("Product {product_id}"),
            current_stock: stock,
            threshold,
            status,
        }
    }

    #[tokio::test]
    async fn test_replace_all_is_idempotent() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.stock_alerts();

        let set = vec![
            alert("p1", 2, 10, AlertStatus::Critical),
            alert("p2", 8, 10, AlertStatus::Warning),
        ];

        repo.replace_all(&set).await.unwrap();
        repo.replace_all(&set).await.unwrap();

        let listed = repo.list().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, "alert-p1");
        assert_eq!(listed[0].status, AlertStatus::Critical);
        assert_eq!(listed[1].status, AlertStatus::Warning);
    }

    #[tokio::test]
    async fn test_replace_all_with_empty_set_clears() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.stock_alerts();

        repo.replace_all(&[alert("p1", 0, 5, AlertStatus::Critical)])
            .await
            .unwrap();
        repo.replace_all(&[]).await.unwrap();

        assert!(repo.list().await.unwrap().is_empty());
    }
}
