//! # Stock Alert Derivation
//!
//! Pure derivation of low-stock alerts from a product snapshot.
//!
//! Alerts carry no independent identity: every recomputation clears the
//! previous set and regenerates it, and the alert id is derived from the
//! product id so the replace-all persistence stays idempotent.
//!
//! ## Derivation Rule
//! ```text
//! for each product:
//!     stock > threshold            → no alert
//!     stock ≤ threshold            → alert
//!         2·stock ≤ threshold      → Critical   (stock ≤ threshold × 0.5)
//!         otherwise                → Warning
//! ```
//!
//! The critical comparison is kept in integers (`2·stock ≤ threshold`), so
//! an odd threshold behaves exactly like the half-value rule: stock=4,
//! threshold=15 is Critical because 4 ≤ 7.5.

use crate::types::{AlertStatus, Product, StockAlert};

/// Prefix for derived alert ids: `"alert-{product_id}"`.
pub const ALERT_ID_PREFIX: &str = "alert-";

/// Classifies one product's stock level.
///
/// Returns `None` when stock is comfortably above the threshold.
#[inline]
pub fn classify(stock: i64, threshold: i64) -> Option<AlertStatus> {
    if stock > threshold {
        return None;
    }
    // Integer-exact form of stock <= threshold * 0.5
    if 2 * stock <= threshold {
        Some(AlertStatus::Critical)
    } else {
        Some(AlertStatus::Warning)
    }
}

/// Computes the full alert set for a product list.
///
/// Output order follows the input product order. Ids are stable across
/// recomputations for the same product.
pub fn compute_stock_alerts(products: &[Product]) -> Vec<StockAlert> {
    products
        .iter()
        .filter_map(|product| {
            classify(product.stock, product.threshold).map(|status| StockAlert {
                id: format!("{}{}", ALERT_ID_PREFIX, product.id),
                product_id: product.id.clone(),
                product_name: product.name.clone(),
                current_stock: product.stock,
                threshold: product.threshold,
                status,
            })
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn product(id: &str, stock: i64, threshold: i64) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {id}"),
            description: String::new(),
            category: "Groceries".into(),
            price_cents: 500,
            stock,
            threshold,
            image: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_no_alert_above_threshold() {
        assert_eq!(classify(26, 25), None);
        assert!(compute_stock_alerts(&[product("p1", 100, 25)]).is_empty());
    }

    #[test]
    fn test_alert_at_threshold_boundary() {
        // stock == threshold is included
        let alerts = compute_stock_alerts(&[product("p1", 10, 10)]);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].status, AlertStatus::Warning);
    }

    #[test]
    fn test_critical_at_half_threshold() {
        // stock=4, threshold=15: 4 <= 7.5 → critical
        assert_eq!(classify(4, 15), Some(AlertStatus::Critical));
        // stock=9, threshold=10: 9 > 5 → warning
        assert_eq!(classify(9, 10), Some(AlertStatus::Warning));
        // exact half is critical: 5 <= 10/2
        assert_eq!(classify(5, 10), Some(AlertStatus::Critical));
        // just above half: 6 > 10/2
        assert_eq!(classify(6, 10), Some(AlertStatus::Warning));
    }

    #[test]
    fn test_zero_stock_zero_threshold() {
        // Sold out with threshold 0 still alerts, and it is critical
        assert_eq!(classify(0, 0), Some(AlertStatus::Critical));
    }

    #[test]
    fn test_alert_id_is_stable_and_prefixed() {
        let alerts = compute_stock_alerts(&[product("abc-123", 1, 10)]);
        assert_eq!(alerts[0].id, "alert-abc-123");

        // Recomputation yields the same id
        let again = compute_stock_alerts(&[product("abc-123", 0, 10)]);
        assert_eq!(again[0].id, "alert-abc-123");
    }

    #[test]
    fn test_alert_snapshot_fields() {
        let alerts = compute_stock_alerts(&[product("p1", 3, 8)]);
        let alert = &alerts[0];
        assert_eq!(alert.product_id, "p1");
        assert_eq!(alert.product_name, "Product p1");
        assert_eq!(alert.current_stock, 3);
        assert_eq!(alert.threshold, 8);
    }

    #[test]
    fn test_order_follows_product_order() {
        let products = vec![
            product("p1", 2, 10),  // critical
            product("p2", 50, 10), // none
            product("p3", 9, 10),  // warning
        ];
        let alerts = compute_stock_alerts(&products);
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].product_id, "p1");
        assert_eq!(alerts[0].status, AlertStatus::Critical);
        assert_eq!(alerts[1].product_id, "p3");
        assert_eq!(alerts[1].status, AlertStatus::Warning);
    }

    #[test]
    fn test_empty_product_list() {
        assert!(compute_stock_alerts(&[]).is_empty());
    }
}
