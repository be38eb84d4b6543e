//! # Sale Repository
//!
//! Database operations for sales and sale items.
//!
//! ## Checkout Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 record_sale: one atomic unit                            │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    INSERT sale header                                                   │
//! │    for each item:                                                       │
//! │      INSERT sale item (snapshot of name + price)                        │
//! │      UPDATE products SET stock = stock - qty                            │
//! │            WHERE id = ? AND stock >= qty   ← guarded decrement          │
//! │        └── 0 rows? → ROLLBACK, report missing product or               │
//! │                      insufficient stock                                 │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  Either the header, every item, and every decrement land together,     │
//! │  or the database is untouched. No orphaned headers, no oversold        │
//! │  stock.                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! Sale items copy the product name and price at sale time. History stays
//! intact when products are renamed, repriced, or deleted.

use std::collections::HashMap;

use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use hypermart_core::{NewSale, Sale, SaleItem};

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Lists all sales, newest first, with their items attached.
    ///
    /// Two queries and an in-memory group-by instead of one query per
    /// sale. Items keep their insertion order within each sale.
    pub async fn list_with_items(&self) -> DbResult<Vec<Sale>> {
        let mut sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, total_amount_cents, cashier_id, cashier_name, timestamp
            FROM sales
            ORDER BY timestamp DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let items = sqlx::query_as::<_, SaleItem>(
            r#"
            SELECT id, sale_id, product_id, product_name, quantity, price_cents, total_cents
            FROM sale_items
            ORDER BY rowid
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut by_sale: HashMap<String, Vec<SaleItem>> = HashMap::new();
        for item in items {
            by_sale.entry(item.sale_id.clone()).or_default().push(item);
        }

        for sale in &mut sales {
            sale.items = by_sale.remove(&sale.id).unwrap_or_default();
        }

        debug!(count = sales.len(), "Listed sales");
        Ok(sales)
    }

    /// Gets one sale with its items.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, total_amount_cents, cashier_id, cashier_name, timestamp
            FROM sales
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(mut sale) = sale else {
            return Ok(None);
        };

        sale.items = sqlx::query_as::<_, SaleItem>(
            r#"
            SELECT id, sale_id, product_id, product_name, quantity, price_cents, total_cents
            FROM sale_items
            WHERE sale_id = ?1
            ORDER BY rowid
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(sale))
    }

    /// Records a sale: header, items, and stock decrements in one
    /// transaction.
    ///
    /// ## Guarantees
    /// - A draft with zero items never reaches the database; the store
    ///   layer rejects it first, and the CHECK constraint on quantity
    ///   backs that up per item
    /// - Stock decrements are guarded: a product with less stock than
    ///   the line needs aborts the whole sale
    /// - Any failure rolls back everything, including the header
    ///
    /// ## Returns
    /// The recorded sale with generated ids.
    pub async fn record_sale(&self, draft: &NewSale) -> DbResult<Sale> {
        let sale_id = Uuid::new_v4().to_string();

        debug!(
            sale_id = %sale_id,
            items = draft.items.len(),
            total_cents = draft.total_amount_cents,
            "Recording sale"
        );

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO sales (id, total_amount_cents, cashier_id, cashier_name, timestamp)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&sale_id)
        .bind(draft.total_amount_cents)
        .bind(&draft.cashier_id)
        .bind(&draft.cashier_name)
        .bind(draft.timestamp)
        .execute(&mut *tx)
        .await?;

        let mut items = Vec::with_capacity(draft.items.len());

        for line in &draft.items {
            let item = SaleItem {
                id: Uuid::new_v4().to_string(),
                sale_id: sale_id.clone(),
                product_id: line.product_id.clone(),
                product_name: line.product_name.clone(),
                quantity: line.quantity,
                price_cents: line.price_cents,
                total_cents: line.total_cents,
            };

            sqlx::query(
                r#"
                INSERT INTO sale_items (id, sale_id, product_id, product_name, quantity, price_cents, total_cents)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
            )
            .bind(&item.id)
            .bind(&item.sale_id)
            .bind(&item.product_id)
            .bind(&item.product_name)
            .bind(item.quantity)
            .bind(item.price_cents)
            .bind(item.total_cents)
            .execute(&mut *tx)
            .await?;

            self.decrement_stock(&mut tx, &item).await?;

            items.push(item);
        }

        tx.commit().await?;

        Ok(Sale {
            id: sale_id,
            items,
            total_amount_cents: draft.total_amount_cents,
            cashier_id: draft.cashier_id.clone(),
            cashier_name: draft.cashier_name.clone(),
            timestamp: draft.timestamp,
        })
    }

    /// Guarded stock decrement inside the checkout transaction.
    ///
    /// The `stock >= quantity` predicate makes overselling impossible at
    /// the database level; when it misses we look up whether the product
    /// is gone or just short, then let the transaction roll back.
    async fn decrement_stock(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        item: &SaleItem,
    ) -> DbResult<()> {
        let now = chrono::Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products
            SET stock = stock - ?2, updated_at = ?3
            WHERE id = ?1 AND stock >= ?2
            "#,
        )
        .bind(&item.product_id)
        .bind(item.quantity)
        .bind(now)
        .execute(&mut **tx)
        .await?;

        if result.rows_affected() == 0 {
            let available: Option<i64> =
                sqlx::query_scalar("SELECT stock FROM products WHERE id = ?1")
                    .bind(&item.product_id)
                    .fetch_optional(&mut **tx)
                    .await?;

            return Err(match available {
                None => DbError::not_found("Product", &item.product_id),
                Some(available) => DbError::InsufficientStock {
                    product: item.product_name.clone(),
                    available,
                    requested: item.quantity,
                },
            });
        }

        Ok(())
    }

    /// Replaces the entire sale history in one transaction.
    ///
    /// Administrative bulk reset only. The store layer refuses an empty
    /// replacement list before this is ever reached. Stock is not
    /// touched; this rewrites history, it does not re-run checkouts.
    pub async fn replace_all(&self, sales: &[Sale]) -> DbResult<()> {
        debug!(count = sales.len(), "Replacing all sales");

        let mut tx = self.pool.begin().await?;

        // Deleting headers cascades to sale_items
        sqlx::query("DELETE FROM sales").execute(&mut *tx).await?;

        for sale in sales {
            sqlx::query(
                r#"
                INSERT INTO sales (id, total_amount_cents, cashier_id, cashier_name, timestamp)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
            )
            .bind(&sale.id)
            .bind(sale.total_amount_cents)
            .bind(&sale.cashier_id)
            .bind(&sale.cashier_name)
            .bind(sale.timestamp)
            .execute(&mut *tx)
            .await?;

            for item in &sale.items {
                sqlx::query(
                    r#"
                    INSERT INTO sale_items (id, sale_id, product_id, product_name, quantity, price_cents, total_cents)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                    "#,
                )
                .bind(&item.id)
                .bind(&item.sale_id)
                .bind(&item.product_id)
                .bind(&item.product_name)
                .bind(item.quantity)
                .bind(item.price_cents)
                .bind(item.total_cents)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        Ok(())
    }

    /// Counts recorded sales (for diagnostics and seeding).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
