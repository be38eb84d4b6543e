//! # Domain Types
//!
//! Core domain types used throughout HyperMart POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌────────────────────────────────────────────────────────────────────┐
//! │                          Domain Types                              │
//! │                                                                    │
//! │  ┌────────────────┐   ┌────────────────┐   ┌────────────────┐     │
//! │  │    Product     │   │      Sale      │   │   StockAlert   │     │
//! │  │  ────────────  │   │  ────────────  │   │  ────────────  │     │
//! │  │  id (UUID)     │   │  id (UUID)     │   │  id (derived)  │     │
//! │  │  price_cents   │   │  items[]       │   │  current_stock │     │
//! │  │  stock         │   │  total_amount  │   │  threshold     │     │
//! │  │  threshold     │   │  cashier_id    │   │  status        │     │
//! │  └────────────────┘   └────────────────┘   └────────────────┘     │
//! │                                                                    │
//! │  ┌────────────────┐   ┌────────────────┐   ┌────────────────┐     │
//! │  │      User      │   │      Role      │   │  AlertStatus   │     │
//! │  │  ────────────  │   │  ────────────  │   │  ────────────  │     │
//! │  │  email         │   │  Admin         │   │  Warning       │     │
//! │  │  role          │   │  Cashier       │   │  Critical      │     │
//! │  │  password_hash │   └────────────────┘   └────────────────┘     │
//! │  └────────────────┘                                                │
//! └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! JSON uses camelCase field names (the web UI's convention); database
//! columns stay snake_case, and the mapping is the storage layer's job.
//! Sale items freeze `product_name` and `price_cents` at sale time, so
//! history survives later product edits and deletions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;

// =============================================================================
// Role
// =============================================================================

/// Authorization role of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access: inventory, reports, settings, user management.
    Admin,
    /// Point-of-sale and own sales history only.
    Cashier,
}

// =============================================================================
// Product
// =============================================================================

/// A product in the store catalog.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown to cashier and on receipt.
    pub name: String,

    /// Free-form description; empty string when unset.
    pub description: String,

    /// Catalog category (e.g. "Groceries", "Electronics").
    pub category: String,

    /// List price in cents (smallest currency unit).
    pub price_cents: i64,

    /// Current stock level. Never negative.
    pub stock: i64,

    /// Admin-configured low-stock threshold.
    pub threshold: i64,

    /// Image URL; empty string when unset.
    pub image: String,

    /// When the product was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the list price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// True when stock has fallen to or below the threshold.
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.threshold
    }

    /// True when nothing is left to sell.
    #[inline]
    pub fn is_out_of_stock(&self) -> bool {
        self.stock == 0
    }
}

/// Input for creating a product. Id and timestamps are generated by the
/// storage layer.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub category: String,
    pub price_cents: i64,
    pub stock: i64,
    pub threshold: i64,
    pub image: String,
}

/// Partial product update. `None` fields are left untouched; `updated_at`
/// is always refreshed by the storage layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price_cents: Option<i64>,
    pub stock: Option<i64>,
    pub threshold: Option<i64>,
    pub image: Option<String>,
}

impl ProductPatch {
    /// Patch that only changes the stock level. The common case during
    /// admin stock corrections.
    pub fn stock(stock: i64) -> Self {
        ProductPatch {
            stock: Some(stock),
            ..ProductPatch::default()
        }
    }
}

// =============================================================================
// Sale + Sale Item
// =============================================================================

/// A line item in a recorded sale.
/// Uses snapshot pattern to freeze product data at time of sale.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    pub id: String,
    pub sale_id: String,
    pub product_id: String,
    /// Product name at time of sale (frozen).
    pub product_name: String,
    /// Quantity sold. Always > 0.
    pub quantity: i64,
    /// Unit price in cents at time of sale (frozen).
    pub price_cents: i64,
    /// Line total (price × quantity).
    pub total_cents: i64,
}

impl SaleItem {
    /// Returns the frozen unit price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Returns the line total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

/// A completed sale transaction. Immutable once recorded; the only write
/// path that touches existing sales is the administrative replace-all.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: String,
    /// Line items, in the order they were rung up. Loaded by the storage
    /// layer from the sale_items table.
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    pub items: Vec<SaleItem>,
    /// Sum of item totals, in cents.
    pub total_amount_cents: i64,
    pub cashier_id: String,
    pub cashier_name: String,
    #[ts(as = "String")]
    pub timestamp: DateTime<Utc>,
}

impl Sale {
    /// Returns the sale total as Money.
    #[inline]
    pub fn total_amount(&self) -> Money {
        Money::from_cents(self.total_amount_cents)
    }
}

/// Draft line item for a sale being recorded.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewSaleItem {
    pub product_id: String,
    pub product_name: String,
    pub quantity: i64,
    pub price_cents: i64,
    pub total_cents: i64,
}

/// Draft sale handed to the aggregator at checkout completion.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewSale {
    pub items: Vec<NewSaleItem>,
    pub total_amount_cents: i64,
    pub cashier_id: String,
    pub cashier_name: String,
    #[ts(as = "String")]
    pub timestamp: DateTime<Utc>,
}

impl NewSale {
    /// Checks the sale invariants before anything is written:
    /// at least one item, positive quantities, line totals equal to
    /// quantity × price, and the sale total equal to the sum of lines.
    pub fn validate(&self) -> CoreResult<()> {
        if self.items.is_empty() {
            return Err(CoreError::EmptySale);
        }
        let mut sum = 0i64;
        for item in &self.items {
            if item.quantity <= 0 {
                return Err(CoreError::InvalidQuantity {
                    product: item.product_name.clone(),
                    quantity: item.quantity,
                });
            }
            if item.total_cents != item.price_cents * item.quantity {
                return Err(CoreError::LineTotalMismatch {
                    product: item.product_name.clone(),
                    expected_cents: item.price_cents * item.quantity,
                    actual_cents: item.total_cents,
                });
            }
            sum += item.total_cents;
        }
        if sum != self.total_amount_cents {
            return Err(CoreError::SaleTotalMismatch {
                expected_cents: sum,
                actual_cents: self.total_amount_cents,
            });
        }
        Ok(())
    }
}

// =============================================================================
// Stock Alert
// =============================================================================

/// Severity of a stock alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    /// Stock at or below threshold.
    Warning,
    /// Stock at or below half the threshold.
    Critical,
}

/// A derived low-stock flag for one product. Ephemeral: regenerated from
/// the product list on every recomputation, with a deterministic id so
/// replace-all persistence stays idempotent.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StockAlert {
    /// `"alert-{product_id}"`, stable across recomputations.
    pub id: String,
    pub product_id: String,
    pub product_name: String,
    pub current_stock: i64,
    pub threshold: i64,
    pub status: AlertStatus,
}

// =============================================================================
// User
// =============================================================================

/// A user account (admin or cashier).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    /// Argon2id hash of the account password. Never serialized; the hash
    /// stays inside the process boundary.
    #[serde(skip_serializing, default)]
    #[ts(skip)]
    pub password_hash: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// Input for creating a user. The plaintext password exists only long
/// enough to be hashed; it is never persisted or logged.
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub password: String,
}

// =============================================================================
// Setting
// =============================================================================

/// A free-form store configuration row (store name, currency symbol,
/// receipt footer, ...).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Setting {
    pub key: String,
    pub value: String,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn draft_item(qty: i64, price: i64) -> NewSaleItem {
        NewSaleItem {
            product_id: "p1".into(),
            product_name: "Milk".into(),
            quantity: qty,
            price_cents: price,
            total_cents: qty * price,
        }
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        assert_eq!(
            serde_json::to_string(&Role::Cashier).unwrap(),
            "\"cashier\""
        );
    }

    #[test]
    fn test_alert_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&AlertStatus::Critical).unwrap(),
            "\"critical\""
        );
    }

    #[test]
    fn test_product_json_is_camel_case() {
        let product = Product {
            id: "p1".into(),
            name: "Milk".into(),
            description: String::new(),
            category: "Groceries".into(),
            price_cents: 349,
            stock: 100,
            threshold: 25,
            image: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&product).unwrap();
        assert!(json.get("priceCents").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("price_cents").is_none());
    }

    #[test]
    fn test_product_stock_helpers() {
        let mut product = Product {
            id: "p1".into(),
            name: "Milk".into(),
            description: String::new(),
            category: "Groceries".into(),
            price_cents: 349,
            stock: 10,
            threshold: 25,
            image: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(product.is_low_stock());
        assert!(!product.is_out_of_stock());

        product.stock = 0;
        assert!(product.is_out_of_stock());

        product.stock = 26;
        product.threshold = 25;
        assert!(!product.is_low_stock());
    }

    #[test]
    fn test_new_sale_validate_ok() {
        let sale = NewSale {
            items: vec![draft_item(3, 500)],
            total_amount_cents: 1500,
            cashier_id: "c1".into(),
            cashier_name: "John".into(),
            timestamp: Utc::now(),
        };
        assert!(sale.validate().is_ok());
    }

    #[test]
    fn test_new_sale_rejects_empty_items() {
        let sale = NewSale {
            items: vec![],
            total_amount_cents: 0,
            cashier_id: "c1".into(),
            cashier_name: "John".into(),
            timestamp: Utc::now(),
        };
        assert!(matches!(sale.validate(), Err(CoreError::EmptySale)));
    }

    #[test]
    fn test_new_sale_rejects_total_mismatch() {
        let sale = NewSale {
            items: vec![draft_item(3, 500)],
            total_amount_cents: 1400,
            cashier_id: "c1".into(),
            cashier_name: "John".into(),
            timestamp: Utc::now(),
        };
        assert!(matches!(
            sale.validate(),
            Err(CoreError::SaleTotalMismatch { .. })
        ));
    }

    #[test]
    fn test_new_sale_rejects_bad_line_total() {
        let mut item = draft_item(2, 500);
        item.total_cents = 999;
        let sale = NewSale {
            items: vec![item],
            total_amount_cents: 999,
            cashier_id: "c1".into(),
            cashier_name: "John".into(),
            timestamp: Utc::now(),
        };
        assert!(matches!(
            sale.validate(),
            Err(CoreError::LineTotalMismatch { .. })
        ));
    }

    #[test]
    fn test_user_password_hash_never_serialized() {
        let user = User {
            id: "u1".into(),
            name: "Admin".into(),
            email: "admin@hypermart.com".into(),
            role: Role::Admin,
            password_hash: "$argon2id$v=19$...".into(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2"));
        assert!(!json.contains("passwordHash"));
    }
}
