//! # Product Repository
//!
//! Database operations for the product catalog.
//!
//! ## Key Operations
//! - Full catalog listing in creation order
//! - Insert with generated id and timestamps
//! - Partial update (only provided fields change, `updated_at` always
//!   refreshes)
//! - Bulk update as a single transaction
//!
//! ## NULL Normalization
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  description/image are nullable columns. Every read path wraps them    │
//! │  in COALESCE(col, '') so the typed entity always carries a plain       │
//! │  String and the UI never sees null.                                    │
//! │                                                                         │
//! │  DB row:     { description: NULL, image: NULL, ... }                   │
//! │       │                                                                 │
//! │       ▼  SELECT COALESCE(description, '') AS description, ...          │
//! │  Entity:     Product { description: "", image: "", ... }               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use hypermart_core::{NewProduct, Product, ProductPatch};

/// Every product read goes through this projection so nullable text
/// comes back as empty strings.
const PRODUCT_COLUMNS: &str = r#"
    id,
    name,
    COALESCE(description, '') AS description,
    category,
    price_cents,
    stock,
    threshold,
    COALESCE(image, '') AS image,
    created_at,
    updated_at
"#;

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let all = repo.list().await?;
/// let one = repo.get_by_id("uuid-here").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists the whole catalog, oldest first.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Inserts a new product.
    ///
    /// The id and both timestamps are generated here; validation of the
    /// input happens in the store layer before this call.
    ///
    /// ## Returns
    /// * `Ok(Product)` - The inserted row as the authoritative entity
    pub async fn insert(&self, new_product: &NewProduct) -> DbResult<Product> {
        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: new_product.name.clone(),
            description: new_product.description.clone(),
            category: new_product.category.clone(),
            price_cents: new_product.price_cents,
            stock: new_product.stock,
            threshold: new_product.threshold,
            image: new_product.image.clone(),
            created_at: now,
            updated_at: now,
        };

        debug!(id = %product.id, name = %product.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, description, category,
                price_cents, stock, threshold, image,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.category)
        .bind(product.price_cents)
        .bind(product.stock)
        .bind(product.threshold)
        .bind(&product.image)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(product)
    }

    /// Applies a partial update and returns the updated row.
    ///
    /// ## Partial Semantics
    /// `None` fields keep their current value via `COALESCE(?, column)`.
    /// `updated_at` always moves to now, even for an empty patch.
    ///
    /// ## Returns
    /// * `Ok(Product)` - Updated row
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn update(&self, id: &str, patch: &ProductPatch) -> DbResult<Product> {
        debug!(id = %id, "Updating product");

        let now = Utc::now();

        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            UPDATE products SET
                name = COALESCE(?2, name),
                description = COALESCE(?3, description),
                category = COALESCE(?4, category),
                price_cents = COALESCE(?5, price_cents),
                stock = COALESCE(?6, stock),
                threshold = COALESCE(?7, threshold),
                image = COALESCE(?8, image),
                updated_at = ?9
            WHERE id = ?1
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&patch.name)
        .bind(&patch.description)
        .bind(&patch.category)
        .bind(patch.price_cents)
        .bind(patch.stock)
        .bind(patch.threshold)
        .bind(&patch.image)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Product", id))?;

        Ok(product)
    }

    /// Updates a batch of products in one transaction.
    ///
    /// All rows commit together or none do; the returned error names the
    /// first product that could not be updated. Each row's `updated_at`
    /// is refreshed.
    pub async fn update_all(&self, products: &[Product]) -> DbResult<()> {
        debug!(count = products.len(), "Bulk-updating products");

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        for product in products {
            let result = sqlx::query(
                r#"
                UPDATE products SET
                    name = ?2,
                    description = ?3,
                    category = ?4,
                    price_cents = ?5,
                    stock = ?6,
                    threshold = ?7,
                    image = ?8,
                    updated_at = ?9
                WHERE id = ?1
                "#,
            )
            .bind(&product.id)
            .bind(&product.name)
            .bind(&product.description)
            .bind(&product.category)
            .bind(product.price_cents)
            .bind(product.stock)
            .bind(product.threshold)
            .bind(&product.image)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                // Dropping the transaction rolls back the rows before this one
                return Err(DbError::not_found("Product", &product.id));
            }
        }

        tx.commit().await?;
        Ok(())
    }

    /// Deletes a product.
    ///
    /// Sale history is unaffected: sale items snapshot the product and
    /// carry no foreign key to it.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts catalog products (for diagnostics and seeding).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
