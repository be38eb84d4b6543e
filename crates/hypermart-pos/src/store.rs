//! # Store-Data Aggregator
//!
//! The single in-memory source of truth the UI layers read from.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                            StoreData                                    │
//! │                                                                         │
//! │  UI / Session                                                           │
//! │      │  mutations (add_product, add_sale, ...)                          │
//! │      ▼                                                                  │
//! │  ┌───────────────────────────────┐      ┌──────────────────────────┐    │
//! │  │  Arc<RwLock<StoreState>>      │      │  watch::Sender<u64>      │    │
//! │  │  ├── products  Vec<Product>   │─────▶│  revision bumped after   │    │
//! │  │  ├── sales     Vec<Sale>      │      │  every committed change  │    │
//! │  │  ├── users     Vec<User>      │      └───────────┬──────────────┘    │
//! │  │  └── alerts    Vec<StockAlert>│                  │ subscribe()       │
//! │  └──────────────┬────────────────┘                  ▼                   │
//! │                 │                          UI re-renders on change      │
//! │                 ▼                                                       │
//! │  ┌───────────────────────────────┐                                      │
//! │  │  Database (hypermart-db)      │  writes go to storage first;         │
//! │  │  products/sales/users/alerts  │  mirrors only reflect committed      │
//! │  └───────────────────────────────┘  rows                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Consistency Rules
//! 1. Storage commits first; mirrors are updated from the returned rows.
//! 2. A failed operation leaves the mirrors at the last-known-good
//!    snapshot. Readers never see a partial subset.
//! 3. Stock alerts are derived data: recomputed from the product list on
//!    every product or sale mutation, persisted best-effort (a failed
//!    alert write is logged, never surfaced).
//! 4. Every committed mutation bumps the revision channel exactly once.

use std::collections::HashMap;
use std::sync::Arc;

use hypermart_core::{
    compute_stock_alerts, validation, CoreError, NewProduct, NewSale, NewUser, Product,
    ProductPatch, Sale, Setting, StockAlert, User, ValidationError,
};
use hypermart_db::Database;
use tokio::sync::{watch, RwLock};
use tracing::{debug, info, warn};

use crate::auth;
use crate::error::PosResult;

// =============================================================================
// State
// =============================================================================

/// The mirrored collections. Swapped or patched only after storage has
/// committed the corresponding write.
#[derive(Debug, Default)]
struct StoreState {
    products: Vec<Product>,
    sales: Vec<Sale>,
    users: Vec<User>,
    stock_alerts: Vec<StockAlert>,
}

// =============================================================================
// StoreData
// =============================================================================

/// The store aggregator. Cheap to clone; clones share the same state.
#[derive(Clone)]
pub struct StoreData {
    db: Database,
    state: Arc<RwLock<StoreState>>,
    revision_tx: watch::Sender<u64>,
}

impl StoreData {
    /// Creates the aggregator and performs the initial full fetch.
    ///
    /// An empty database yields empty mirrors, not an error.
    pub async fn new(db: Database) -> PosResult<Self> {
        let (revision_tx, _) = watch::channel(0);
        let store = StoreData {
            db,
            state: Arc::new(RwLock::new(StoreState::default())),
            revision_tx,
        };
        store.fetch_all_data().await?;
        Ok(store)
    }

    /// Subscribes to revision bumps. The receiver wakes whenever any
    /// mirror changes; subscribers re-read the snapshots they care about.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision_tx.subscribe()
    }

    /// Current revision number. Starts at 0, bumps on every commit.
    pub fn revision(&self) -> u64 {
        *self.revision_tx.borrow()
    }

    /// The underlying database handle, for collaborators that need their
    /// own repository access (sign-in, seeding).
    pub fn database(&self) -> &Database {
        &self.db
    }

    fn bump_revision(&self) {
        self.revision_tx.send_modify(|rev| *rev += 1);
    }

    /// Persists the alert set, logging instead of failing. Alerts are
    /// derived from products and will be regenerated on the next
    /// recomputation, so a lost write costs nothing but staleness.
    async fn persist_alerts(&self, alerts: &[StockAlert]) {
        if let Err(e) = self.db.stock_alerts().replace_all(alerts).await {
            warn!(error = %e, "Failed to persist stock alerts; in-memory set stays authoritative");
        }
    }

    // =========================================================================
    // Full Refresh
    // =========================================================================

    /// Fetches products, sales, and users from storage, recomputes the
    /// stock alerts, and swaps all mirrors in one commit.
    ///
    /// Any fetch error aborts the refresh with the previous mirrors fully
    /// intact. Readers never observe a half-refreshed store.
    pub async fn fetch_all_data(&self) -> PosResult<()> {
        debug!("Fetching all store data");

        let products = self.db.products().list().await?;
        let sales = self.db.sales().list_with_items().await?;
        let users = self.db.users().list().await?;

        let stock_alerts = compute_stock_alerts(&products);
        self.persist_alerts(&stock_alerts).await;

        info!(
            products = products.len(),
            sales = sales.len(),
            users = users.len(),
            alerts = stock_alerts.len(),
            "Store data refreshed"
        );

        let mut state = self.state.write().await;
        state.products = products;
        state.sales = sales;
        state.users = users;
        state.stock_alerts = stock_alerts;
        drop(state);

        self.bump_revision();
        Ok(())
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Validates and inserts a product, then appends the stored row to
    /// the local list and recomputes alerts from it.
    pub async fn add_product(&self, draft: &NewProduct) -> PosResult<Product> {
        validation::validate_new_product(draft)?;

        let product = self.db.products().insert(draft).await?;
        info!(product_id = %product.id, name = %product.name, "Product added");

        let mut state = self.state.write().await;
        state.products.push(product.clone());
        state.stock_alerts = compute_stock_alerts(&state.products);
        let alerts = state.stock_alerts.clone();
        drop(state);

        self.persist_alerts(&alerts).await;
        self.bump_revision();
        Ok(product)
    }

    /// Applies a partial update. Only provided fields change;
    /// `updated_at` always refreshes. The stored row replaces the local
    /// entry and alerts are recomputed.
    pub async fn update_product(&self, id: &str, patch: &ProductPatch) -> PosResult<Product> {
        validation::validate_product_patch(patch)?;

        let product = self.db.products().update(id, patch).await?;
        debug!(product_id = %id, "Product updated");

        let mut state = self.state.write().await;
        if let Some(entry) = state.products.iter_mut().find(|p| p.id == id) {
            *entry = product.clone();
        }
        state.stock_alerts = compute_stock_alerts(&state.products);
        let alerts = state.stock_alerts.clone();
        drop(state);

        self.persist_alerts(&alerts).await;
        self.bump_revision();
        Ok(product)
    }

    /// Bulk full-row update in a single transaction: all rows commit or
    /// none do. Used for admin stock corrections across the catalog.
    /// Followed by a full refresh so mirrors match storage exactly.
    pub async fn update_products(&self, products: &[Product]) -> PosResult<()> {
        for product in products {
            validation::validate_product_name(&product.name)?;
            validation::validate_category(&product.category)?;
            validation::validate_price_cents(product.price_cents)?;
            validation::validate_stock(product.stock)?;
            validation::validate_threshold(product.threshold)?;
        }

        self.db.products().update_all(products).await?;
        info!(count = products.len(), "Products bulk-updated");

        self.fetch_all_data().await
    }

    /// Hard-deletes a product. Sale items that reference it survive as
    /// snapshots; cart lines that reference it become invalid and block
    /// checkout until removed.
    pub async fn delete_product(&self, id: &str) -> PosResult<()> {
        self.db.products().delete(id).await?;
        info!(product_id = %id, "Product deleted");

        let mut state = self.state.write().await;
        state.products.retain(|p| p.id != id);
        state.stock_alerts = compute_stock_alerts(&state.products);
        let alerts = state.stock_alerts.clone();
        drop(state);

        self.persist_alerts(&alerts).await;
        self.bump_revision();
        Ok(())
    }

    // =========================================================================
    // Sales
    // =========================================================================

    /// Records a sale: header, items, and guarded stock decrements in one
    /// storage transaction, then a full refresh to reconcile mirrors.
    ///
    /// The draft is validated before anything is written; an empty item
    /// list or a broken total never reaches storage.
    pub async fn add_sale(&self, draft: &NewSale) -> PosResult<Sale> {
        draft.validate()?;

        let sale = self.db.sales().record_sale(draft).await?;
        info!(
            sale_id = %sale.id,
            total_cents = sale.total_amount_cents,
            items = sale.items.len(),
            cashier = %sale.cashier_name,
            "Sale recorded"
        );

        // Stock levels changed inside the transaction; re-fetch everything
        // rather than patching mirrors piecemeal.
        self.fetch_all_data().await?;
        Ok(sale)
    }

    /// Destructive replace-all for admin resets. Refuses an empty
    /// replacement list so a stray call cannot wipe the sales history.
    pub async fn update_sales(&self, sales: &[Sale]) -> PosResult<()> {
        if sales.is_empty() {
            return Err(CoreError::EmptyReplacement.into());
        }

        self.db.sales().replace_all(sales).await?;
        warn!(count = sales.len(), "Sales history replaced");

        self.fetch_all_data().await
    }

    // =========================================================================
    // Stock Alerts
    // =========================================================================

    /// Recomputes alerts from the current local product list (no
    /// re-fetch), commits them locally, persists best-effort.
    pub async fn update_stock_alerts(&self) -> PosResult<Vec<StockAlert>> {
        let mut state = self.state.write().await;
        state.stock_alerts = compute_stock_alerts(&state.products);
        let alerts = state.stock_alerts.clone();
        drop(state);

        debug!(count = alerts.len(), "Stock alerts recomputed");
        self.persist_alerts(&alerts).await;
        self.bump_revision();
        Ok(alerts)
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Creates a user account. The plaintext password is hashed here and
    /// discarded; only the hash reaches storage.
    pub async fn add_user(&self, draft: &NewUser) -> PosResult<User> {
        if draft.name.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "name".to_string(),
            }
            .into());
        }
        validation::validate_email(&draft.email)?;
        if draft.password.is_empty() {
            return Err(ValidationError::Required {
                field: "password".to_string(),
            }
            .into());
        }

        let password_hash = auth::hash_password(&draft.password)?;
        let user = self
            .db
            .users()
            .insert(&draft.name, &draft.email, draft.role, &password_hash)
            .await?;
        info!(user_id = %user.id, role = ?user.role, "User added");

        let mut state = self.state.write().await;
        state.users.push(user.clone());
        drop(state);

        self.bump_revision();
        Ok(user)
    }

    /// Deletes a user account.
    pub async fn delete_user(&self, id: &str) -> PosResult<()> {
        self.db.users().delete(id).await?;
        info!(user_id = %id, "User deleted");

        let mut state = self.state.write().await;
        state.users.retain(|u| u.id != id);
        drop(state);

        self.bump_revision();
        Ok(())
    }

    // =========================================================================
    // Settings
    // =========================================================================

    /// All settings as a key/value map. Read-through, not mirrored.
    pub async fn settings(&self) -> PosResult<HashMap<String, String>> {
        let rows = self.db.settings().all().await?;
        Ok(rows.into_iter().map(|s| (s.key, s.value)).collect())
    }

    /// Upserts one setting.
    pub async fn update_setting(&self, key: &str, value: &str) -> PosResult<Setting> {
        let setting = self.db.settings().set(key, value).await?;
        debug!(key = %key, "Setting updated");
        Ok(setting)
    }

    // =========================================================================
    // Snapshot Accessors
    // =========================================================================

    /// Snapshot of the product catalog.
    pub async fn products(&self) -> Vec<Product> {
        self.state.read().await.products.clone()
    }

    /// Snapshot of the sales history (newest first, items nested).
    pub async fn sales(&self) -> Vec<Sale> {
        self.state.read().await.sales.clone()
    }

    /// Snapshot of the user accounts.
    pub async fn users(&self) -> Vec<User> {
        self.state.read().await.users.clone()
    }

    /// Snapshot of the current stock alerts.
    pub async fn stock_alerts(&self) -> Vec<StockAlert> {
        self.state.read().await.stock_alerts.clone()
    }

    /// Looks up one product by id in the local mirror.
    pub async fn find_product(&self, id: &str) -> Option<Product> {
        self.state
            .read()
            .await
            .products
            .iter()
            .find(|p| p.id == id)
            .cloned()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use chrono::Utc;
    use hypermart_core::{NewSaleItem, Role};
    use hypermart_db::DbConfig;

    async fn test_store() -> StoreData {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        StoreData::new(db).await.unwrap()
    }

    fn draft_product(name: &str, price_cents: i64, stock: i64, threshold: i64) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            description: String::new(),
            category: "Groceries".to_string(),
            price_cents,
            stock,
            threshold,
            image: String::new(),
        }
    }

    fn draft_sale(product: &Product, quantity: i64) -> NewSale {
        NewSale {
            items: vec![NewSaleItem {
                product_id: product.id.clone(),
                product_name: product.name.clone(),
                quantity,
                price_cents: product.price_cents,
                total_cents: product.price_cents * quantity,
            }],
            total_amount_cents: product.price_cents * quantity,
            cashier_id: "c1".to_string(),
            cashier_name: "John".to_string(),
            timestamp: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_add_product_updates_mirror_and_alerts() {
        let store = test_store().await;

        store
            .add_product(&draft_product("Women's Jeans", 4999, 4, 15))
            .await
            .unwrap();

        let products = store.products().await;
        assert_eq!(products.len(), 1);

        // stock 4 against threshold 15 is critical (4 <= 7.5)
        let alerts = store.stock_alerts().await;
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].id, format!("alert-{}", products[0].id));
    }

    #[tokio::test]
    async fn test_add_product_rejects_invalid_draft() {
        let store = test_store().await;

        let err = store
            .add_product(&draft_product("Milk", -1, 10, 5))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(store.products().await.is_empty());
    }

    #[tokio::test]
    async fn test_update_product_partial_patch() {
        let store = test_store().await;
        let product = store
            .add_product(&draft_product("Milk", 349, 100, 25))
            .await
            .unwrap();
        assert!(store.stock_alerts().await.is_empty());

        let updated = store
            .update_product(&product.id, &ProductPatch::stock(10))
            .await
            .unwrap();

        assert_eq!(updated.stock, 10);
        assert_eq!(updated.name, "Milk");
        assert_eq!(updated.price_cents, 349);

        // Crossing the threshold shows up in the recomputed alerts.
        let alerts = store.stock_alerts().await;
        assert_eq!(alerts.len(), 1);
    }

    #[tokio::test]
    async fn test_update_products_bulk_refreshes_mirrors() {
        let store = test_store().await;
        let a = store
            .add_product(&draft_product("Milk", 349, 100, 25))
            .await
            .unwrap();
        let b = store
            .add_product(&draft_product("Blender", 5999, 20, 7))
            .await
            .unwrap();

        let mut rows = vec![a, b];
        rows[0].stock = 60;
        rows[1].stock = 5;
        store.update_products(&rows).await.unwrap();

        let products = store.products().await;
        assert_eq!(products[0].stock, 60);
        assert_eq!(products[1].stock, 5);
        // Blender at 5 of threshold 7 now alerts.
        assert_eq!(store.stock_alerts().await.len(), 1);
    }

    #[tokio::test]
    async fn test_add_sale_decrements_stock_and_refreshes() {
        let store = test_store().await;
        let product = store
            .add_product(&draft_product("Coffee Maker", 7999, 30, 8))
            .await
            .unwrap();

        let sale = store.add_sale(&draft_sale(&product, 3)).await.unwrap();

        assert_eq!(sale.total_amount_cents, 23997);
        assert_eq!(store.find_product(&product.id).await.unwrap().stock, 27);
        assert_eq!(store.sales().await.len(), 1);
    }

    #[tokio::test]
    async fn test_add_sale_rejects_empty_before_any_write() {
        let store = test_store().await;

        let draft = NewSale {
            items: vec![],
            total_amount_cents: 0,
            cashier_id: "c1".to_string(),
            cashier_name: "John".to_string(),
            timestamp: Utc::now(),
        };
        let err = store.add_sale(&draft).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(store.database().sales().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_sales_refuses_empty_replacement() {
        let store = test_store().await;
        let product = store
            .add_product(&draft_product("Milk", 349, 100, 25))
            .await
            .unwrap();
        store.add_sale(&draft_sale(&product, 1)).await.unwrap();

        let err = store.update_sales(&[]).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessLogic);

        // History untouched.
        assert_eq!(store.sales().await.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_product_keeps_sale_snapshots() {
        let store = test_store().await;
        let product = store
            .add_product(&draft_product("Smartphone X", 89999, 25, 10))
            .await
            .unwrap();
        store.add_sale(&draft_sale(&product, 1)).await.unwrap();

        store.delete_product(&product.id).await.unwrap();

        assert!(store.products().await.is_empty());
        assert!(store.stock_alerts().await.is_empty());

        let sales = store.sales().await;
        assert_eq!(sales.len(), 1);
        assert_eq!(sales[0].items[0].product_name, "Smartphone X");
    }

    #[tokio::test]
    async fn test_fetch_failure_leaves_mirrors_intact() {
        let store = test_store().await;
        store
            .add_product(&draft_product("Milk", 349, 100, 25))
            .await
            .unwrap();

        store.database().close().await;

        assert!(store.fetch_all_data().await.is_err());
        // Last-known-good snapshot still readable.
        assert_eq!(store.products().await.len(), 1);
    }

    #[tokio::test]
    async fn test_subscribe_sees_revision_bumps() {
        let store = test_store().await;
        let mut rx = store.subscribe();
        let before = store.revision();

        store
            .add_product(&draft_product("Milk", 349, 100, 25))
            .await
            .unwrap();

        rx.changed().await.unwrap();
        assert!(*rx.borrow() > before);
    }

    #[tokio::test]
    async fn test_add_user_stores_hash_not_plaintext() {
        let store = test_store().await;

        let user = store
            .add_user(&NewUser {
                name: "Sarah Cashier".to_string(),
                email: "sarah@hypermart.com".to_string(),
                role: Role::Cashier,
                password: "cashier123".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(store.users().await.len(), 1);

        let stored = store
            .database()
            .users()
            .find_by_email("sarah@hypermart.com")
            .await
            .unwrap()
            .unwrap();
        assert_ne!(stored.password_hash, "cashier123");
        assert!(auth::verify_password("cashier123", &stored.password_hash));
        assert_eq!(user.id, stored.id);
    }

    #[tokio::test]
    async fn test_add_user_requires_password() {
        let store = test_store().await;

        let err = store
            .add_user(&NewUser {
                name: "Ghost".to_string(),
                email: "ghost@hypermart.com".to_string(),
                role: Role::Cashier,
                password: String::new(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(store.users().await.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_email_surfaces_as_validation() {
        let store = test_store().await;
        let draft = NewUser {
            name: "John Cashier".to_string(),
            email: "john@hypermart.com".to_string(),
            role: Role::Cashier,
            password: "cashier123".to_string(),
        };

        store.add_user(&draft).await.unwrap();
        let err = store.add_user(&draft).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(err.message.contains("email"));
    }

    #[tokio::test]
    async fn test_settings_round_trip() {
        let store = test_store().await;

        store
            .update_setting("store_name", "HyperMart Downtown")
            .await
            .unwrap();
        store.update_setting("currency_symbol", "$").await.unwrap();
        store
            .update_setting("store_name", "HyperMart Uptown")
            .await
            .unwrap();

        let settings = store.settings().await.unwrap();
        assert_eq!(settings.len(), 2);
        assert_eq!(
            settings.get("store_name").map(String::as_str),
            Some("HyperMart Uptown")
        );
    }
}
