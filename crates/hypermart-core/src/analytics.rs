//! # Sales & Inventory Analytics
//!
//! Chart-ready aggregates derived on demand from the authoritative
//! snapshots. Nothing here is persisted; every report is a pure fold
//! over `&[Sale]` / `&[Product]` and recomputes cheaply at store scale.
//!
//! ## Report Families
//! - **Sales**: revenue by category, units by product, daily buckets
//! - **Profitability**: assumed-cost profit and margin per product
//! - **Inventory**: low/out-of-stock listings, category breakdown
//! - **Cashiers**: per-cashier sale history and totals
//!
//! ## Joining Rule
//! Sale items carry name and price snapshots from the time of sale, so
//! reports keep working after a product is deleted. Where a report needs
//! the *live* category or price it joins against the current catalog and
//! falls back to [`UNKNOWN_CATEGORY`] / zero when the product is gone.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Product, Role, Sale, StockAlert, User};

/// Category label used when a sold product no longer exists in the catalog.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// Default row cap for ranked reports (top sellers, most profitable, ...).
pub const DEFAULT_REPORT_LIMIT: usize = 10;

/// Assumed cost of goods as a fraction of the sell price, in basis
/// points. 6000 bps = 60% cost, leaving a 40% margin.
pub const ASSUMED_COST_RATIO_BPS: u32 = 6000;

// =============================================================================
// Report Row Types
// =============================================================================

/// Units sold for one product, joined with its live catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductSales {
    pub product_id: String,
    /// Name snapshot from the sale items.
    pub product_name: String,
    pub units_sold: i64,
    /// Live category; [`UNKNOWN_CATEGORY`] when the product was deleted.
    pub category: String,
    /// Live price in cents; zero when the product was deleted.
    pub price_cents: i64,
}

impl ProductSales {
    /// Revenue at the current catalog price.
    pub fn revenue_cents(&self) -> i64 {
        self.price_cents * self.units_sold
    }
}

/// Revenue attributed to one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRevenue {
    pub category: String,
    pub revenue_cents: i64,
}

/// Profit estimate for one product under the assumed cost ratio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductProfit {
    pub product_id: String,
    pub product_name: String,
    pub category: String,
    pub price_cents: i64,
    pub units_sold: i64,
    /// Assumed cost per unit (price × [`ASSUMED_COST_RATIO_BPS`]).
    pub cost_cents: i64,
    /// (price − cost) × units sold.
    pub profit_cents: i64,
    /// Margin in basis points of the sell price; zero for free items.
    pub margin_bps: i64,
}

/// One day's revenue. Dates are UTC calendar days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DailyRevenue {
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub revenue_cents: i64,
}

/// Inventory rollup for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInventory {
    pub category: String,
    pub product_count: i64,
    /// Σ price × stock across the category.
    pub stock_value_cents: i64,
    /// Mean catalog price (integer cents, truncated).
    pub average_price_cents: i64,
}

/// Headline figures for the dashboard cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StoreSummary {
    pub total_revenue_cents: i64,
    pub sale_count: i64,
    pub product_count: i64,
    pub low_stock_count: i64,
    /// Revenue ÷ sale count (integer cents, truncated); zero with no sales.
    pub average_sale_cents: i64,
}

/// Lifetime sales rollup for one cashier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CashierTotals {
    pub cashier_id: String,
    pub cashier_name: String,
    pub total_cents: i64,
    pub sale_count: i64,
}

// =============================================================================
// Sales Reports
// =============================================================================

/// Sums units sold per product across all sale items, in first-sold
/// order, joined with the live catalog for category and price.
pub fn units_sold_by_product(sales: &[Sale], products: &[Product]) -> Vec<ProductSales> {
    let mut rows: Vec<ProductSales> = Vec::new();

    for sale in sales {
        for item in &sale.items {
            match rows.iter_mut().find(|r| r.product_id == item.product_id) {
                Some(row) => row.units_sold += item.quantity,
                None => rows.push(ProductSales {
                    product_id: item.product_id.clone(),
                    product_name: item.product_name.clone(),
                    units_sold: item.quantity,
                    category: String::new(),
                    price_cents: 0,
                }),
            }
        }
    }

    for row in &mut rows {
        if let Some(product) = products.iter().find(|p| p.id == row.product_id) {
            row.category = product.category.clone();
            row.price_cents = product.price_cents;
        } else {
            row.category = UNKNOWN_CATEGORY.to_string();
        }
    }

    rows
}

/// Sums line-total revenue per live category, in first-sold order.
/// Items whose product was deleted land under [`UNKNOWN_CATEGORY`].
pub fn sales_by_category(sales: &[Sale], products: &[Product]) -> Vec<CategoryRevenue> {
    let mut rows: Vec<CategoryRevenue> = Vec::new();

    for sale in sales {
        for item in &sale.items {
            let category = products
                .iter()
                .find(|p| p.id == item.product_id)
                .map(|p| p.category.as_str())
                .unwrap_or(UNKNOWN_CATEGORY);

            match rows.iter_mut().find(|r| r.category == category) {
                Some(row) => row.revenue_cents += item.total_cents,
                None => rows.push(CategoryRevenue {
                    category: category.to_string(),
                    revenue_cents: item.total_cents,
                }),
            }
        }
    }

    rows
}

/// Highest-volume products first, capped at `limit`.
pub fn top_sellers(sales: &[Sale], products: &[Product], limit: usize) -> Vec<ProductSales> {
    let mut rows = units_sold_by_product(sales, products);
    rows.sort_by(|a, b| b.units_sold.cmp(&a.units_sold));
    rows.truncate(limit);
    rows
}

/// Lowest-volume products first, capped at `limit`. Only products with
/// at least one sale appear; never-sold products show up in inventory
/// reports instead.
pub fn slow_sellers(sales: &[Sale], products: &[Product], limit: usize) -> Vec<ProductSales> {
    let mut rows = units_sold_by_product(sales, products);
    rows.sort_by(|a, b| a.units_sold.cmp(&b.units_sold));
    rows.truncate(limit);
    rows
}

/// Buckets revenue by UTC calendar day, oldest first.
pub fn revenue_by_day(sales: &[Sale]) -> Vec<DailyRevenue> {
    let mut buckets: BTreeMap<NaiveDate, i64> = BTreeMap::new();

    for sale in sales {
        *buckets.entry(sale.timestamp.date_naive()).or_insert(0) += sale.total_amount_cents;
    }

    buckets
        .into_iter()
        .map(|(date, revenue_cents)| DailyRevenue {
            date,
            revenue_cents,
        })
        .collect()
}

// =============================================================================
// Profitability Reports
// =============================================================================

/// Profit estimate for every catalog product (sold or not) under the
/// assumed cost ratio, in catalog order.
pub fn profit_by_product(sales: &[Sale], products: &[Product]) -> Vec<ProductProfit> {
    let sold = units_sold_by_product(sales, products);

    products
        .iter()
        .map(|product| {
            let units_sold = sold
                .iter()
                .find(|r| r.product_id == product.id)
                .map(|r| r.units_sold)
                .unwrap_or(0);

            let price = Money::from_cents(product.price_cents);
            let cost = price.apply_ratio_bps(ASSUMED_COST_RATIO_BPS);
            let unit_profit = price - cost;
            let margin_bps = if product.price_cents > 0 {
                unit_profit.cents() * 10_000 / product.price_cents
            } else {
                0
            };

            ProductProfit {
                product_id: product.id.clone(),
                product_name: product.name.clone(),
                category: product.category.clone(),
                price_cents: product.price_cents,
                units_sold,
                cost_cents: cost.cents(),
                profit_cents: unit_profit.cents() * units_sold,
                margin_bps,
            }
        })
        .collect()
}

/// Highest total profit first, capped at `limit`.
pub fn most_profitable(sales: &[Sale], products: &[Product], limit: usize) -> Vec<ProductProfit> {
    let mut rows = profit_by_product(sales, products);
    rows.sort_by(|a, b| b.profit_cents.cmp(&a.profit_cents));
    rows.truncate(limit);
    rows
}

// =============================================================================
// Inventory Reports
// =============================================================================

/// Products at or below their restock threshold, most depleted first
/// (ordered by the stock ÷ threshold ratio).
pub fn low_stock(products: &[Product]) -> Vec<Product> {
    let mut rows: Vec<Product> = products
        .iter()
        .filter(|p| p.is_low_stock())
        .cloned()
        .collect();

    // threshold 0 only passes the filter when stock is also 0: sold out,
    // so it sorts as fully depleted rather than dividing by zero
    fn depletion(p: &Product) -> f64 {
        if p.threshold == 0 {
            0.0
        } else {
            p.stock as f64 / p.threshold as f64
        }
    }

    rows.sort_by(|a, b| depletion(a).total_cmp(&depletion(b)));

    rows
}

/// Products with nothing left on the shelf.
pub fn out_of_stock(products: &[Product]) -> Vec<Product> {
    products
        .iter()
        .filter(|p| p.is_out_of_stock())
        .cloned()
        .collect()
}

/// Per-category product count, stock value, and mean price, in
/// alphabetical category order.
pub fn inventory_by_category(products: &[Product]) -> Vec<CategoryInventory> {
    let mut buckets: BTreeMap<&str, (i64, i64, i64)> = BTreeMap::new();

    for product in products {
        let entry = buckets.entry(product.category.as_str()).or_insert((0, 0, 0));
        entry.0 += 1;
        entry.1 += product.price_cents * product.stock;
        entry.2 += product.price_cents;
    }

    buckets
        .into_iter()
        .map(|(category, (count, stock_value, price_sum))| CategoryInventory {
            category: category.to_string(),
            product_count: count,
            stock_value_cents: stock_value,
            average_price_cents: price_sum / count,
        })
        .collect()
}

// =============================================================================
// Dashboard Summary
// =============================================================================

/// Headline figures across all snapshots.
pub fn summary(sales: &[Sale], products: &[Product], alerts: &[StockAlert]) -> StoreSummary {
    let total_revenue_cents: i64 = sales.iter().map(|s| s.total_amount_cents).sum();
    let sale_count = sales.len() as i64;

    StoreSummary {
        total_revenue_cents,
        sale_count,
        product_count: products.len() as i64,
        low_stock_count: alerts.len() as i64,
        average_sale_cents: if sale_count > 0 {
            total_revenue_cents / sale_count
        } else {
            0
        },
    }
}

// =============================================================================
// Cashier Reports
// =============================================================================

/// Sales rung up by one cashier, preserving the input order.
pub fn sales_for_cashier(sales: &[Sale], cashier_id: &str) -> Vec<Sale> {
    sales
        .iter()
        .filter(|s| s.cashier_id == cashier_id)
        .cloned()
        .collect()
}

/// Lifetime totals per cashier account. Only users with the cashier
/// role get a row; a cashier with no sales shows zeros.
pub fn cashier_totals(sales: &[Sale], users: &[User]) -> Vec<CashierTotals> {
    users
        .iter()
        .filter(|u| u.role == Role::Cashier)
        .map(|cashier| {
            let theirs: Vec<&Sale> = sales
                .iter()
                .filter(|s| s.cashier_id == cashier.id)
                .collect();

            CashierTotals {
                cashier_id: cashier.id.clone(),
                cashier_name: cashier.name.clone(),
                total_cents: theirs.iter().map(|s| s.total_amount_cents).sum(),
                sale_count: theirs.len() as i64,
            }
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SaleItem;
    use chrono::{TimeZone, Utc};

    fn test_product(id: &str, category: &str, price_cents: i64, stock: i64, threshold: i64) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {id}"),
            description: String::new(),
            category: category.to_string(),
            price_cents,
            stock,
            threshold,
            image: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn test_sale(id: &str, cashier_id: &str, day: u32, items: Vec<(&str, i64, i64)>) -> Sale {
        let items: Vec<SaleItem> = items
            .into_iter()
            .enumerate()
            .map(|(i, (product_id, quantity, price_cents))| SaleItem {
                id: format!("{id}-item-{i}"),
                sale_id: id.to_string(),
                product_id: product_id.to_string(),
                product_name: format!("Product {product_id}"),
                quantity,
                price_cents,
                total_cents: quantity * price_cents,
            })
            .collect();
        let total_amount_cents = items.iter().map(|i| i.total_cents).sum();

        Sale {
            id: id.to_string(),
            items,
            total_amount_cents,
            cashier_id: cashier_id.to_string(),
            cashier_name: "Cashier".into(),
            timestamp: Utc.with_ymd_and_hms(2025, 6, day, 12, 0, 0).unwrap(),
        }
    }

    fn test_cashier(id: &str, name: &str) -> User {
        User {
            id: id.to_string(),
            name: name.to_string(),
            email: format!("{id}@hypermart.test"),
            role: Role::Cashier,
            password_hash: String::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_units_sold_merges_across_sales() {
        let products = vec![test_product("p1", "Electronics", 1000, 5, 2)];
        let sales = vec![
            test_sale("s1", "c1", 1, vec![("p1", 2, 1000)]),
            test_sale("s2", "c1", 2, vec![("p1", 3, 1000)]),
        ];

        let rows = units_sold_by_product(&sales, &products);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].units_sold, 5);
        assert_eq!(rows[0].category, "Electronics");
        assert_eq!(rows[0].revenue_cents(), 5000);
    }

    #[test]
    fn test_units_sold_for_deleted_product() {
        let sales = vec![test_sale("s1", "c1", 1, vec![("ghost", 2, 500)])];

        let rows = units_sold_by_product(&sales, &[]);
        assert_eq!(rows[0].category, UNKNOWN_CATEGORY);
        assert_eq!(rows[0].price_cents, 0);
        // Name survives via the sale item snapshot
        assert_eq!(rows[0].product_name, "Product ghost");
    }

    #[test]
    fn test_sales_by_category_sums_line_totals() {
        let products = vec![
            test_product("p1", "Electronics", 1000, 5, 2),
            test_product("p2", "Groceries", 300, 5, 2),
        ];
        let sales = vec![
            test_sale("s1", "c1", 1, vec![("p1", 1, 1000), ("p2", 2, 300)]),
            test_sale("s2", "c1", 2, vec![("p2", 1, 300)]),
        ];

        let rows = sales_by_category(&sales, &products);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].category, "Electronics");
        assert_eq!(rows[0].revenue_cents, 1000);
        assert_eq!(rows[1].category, "Groceries");
        assert_eq!(rows[1].revenue_cents, 900);
    }

    #[test]
    fn test_sales_by_category_deleted_product_is_unknown() {
        let sales = vec![test_sale("s1", "c1", 1, vec![("ghost", 1, 500)])];
        let rows = sales_by_category(&sales, &[]);
        assert_eq!(rows[0].category, UNKNOWN_CATEGORY);
        assert_eq!(rows[0].revenue_cents, 500);
    }

    #[test]
    fn test_top_and_slow_sellers() {
        let products = vec![
            test_product("p1", "A", 100, 5, 2),
            test_product("p2", "A", 100, 5, 2),
            test_product("p3", "A", 100, 5, 2),
        ];
        let sales = vec![test_sale(
            "s1",
            "c1",
            1,
            vec![("p1", 5, 100), ("p2", 1, 100), ("p3", 3, 100)],
        )];

        let top = top_sellers(&sales, &products, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].product_id, "p1");
        assert_eq!(top[1].product_id, "p3");

        let slow = slow_sellers(&sales, &products, 2);
        assert_eq!(slow[0].product_id, "p2");
        assert_eq!(slow[1].product_id, "p3");
    }

    #[test]
    fn test_profit_assumes_sixty_percent_cost() {
        let products = vec![test_product("p1", "A", 1000, 5, 2)];
        let sales = vec![test_sale("s1", "c1", 1, vec![("p1", 3, 1000)])];

        let rows = profit_by_product(&sales, &products);
        assert_eq!(rows[0].cost_cents, 600);
        assert_eq!(rows[0].profit_cents, 1200); // (1000 - 600) × 3
        assert_eq!(rows[0].margin_bps, 4000); // 40%
    }

    #[test]
    fn test_profit_includes_never_sold_products() {
        let products = vec![test_product("p1", "A", 1000, 5, 2)];

        let rows = profit_by_product(&[], &products);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].units_sold, 0);
        assert_eq!(rows[0].profit_cents, 0);
    }

    #[test]
    fn test_profit_zero_price_has_zero_margin() {
        let products = vec![test_product("p1", "A", 0, 5, 2)];
        let rows = profit_by_product(&[], &products);
        assert_eq!(rows[0].margin_bps, 0);
    }

    #[test]
    fn test_most_profitable_ranks_by_total_profit() {
        let products = vec![
            test_product("cheap", "A", 100, 5, 2),
            test_product("dear", "A", 10_000, 5, 2),
        ];
        // cheap sells a lot, dear sells once; dear still wins on profit
        let sales = vec![test_sale(
            "s1",
            "c1",
            1,
            vec![("cheap", 10, 100), ("dear", 1, 10_000)],
        )];

        let rows = most_profitable(&sales, &products, 10);
        assert_eq!(rows[0].product_id, "dear");
        assert_eq!(rows[0].profit_cents, 4000);
        assert_eq!(rows[1].profit_cents, 400);
    }

    #[test]
    fn test_revenue_by_day_buckets_and_sorts() {
        let sales = vec![
            test_sale("s1", "c1", 3, vec![("p1", 1, 500)]),
            test_sale("s2", "c1", 1, vec![("p1", 1, 300)]),
            test_sale("s3", "c1", 3, vec![("p1", 1, 200)]),
        ];

        let rows = revenue_by_day(&sales);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date.to_string(), "2025-06-01");
        assert_eq!(rows[0].revenue_cents, 300);
        assert_eq!(rows[1].date.to_string(), "2025-06-03");
        assert_eq!(rows[1].revenue_cents, 700);
    }

    #[test]
    fn test_low_stock_sorted_by_depletion() {
        let products = vec![
            test_product("half", "A", 100, 5, 10),
            test_product("fine", "A", 100, 50, 10),
            test_product("nearly", "A", 100, 1, 10),
        ];

        let rows = low_stock(&products);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, "nearly");
        assert_eq!(rows[1].id, "half");
    }

    #[test]
    fn test_out_of_stock_only_zero() {
        let products = vec![
            test_product("empty", "A", 100, 0, 10),
            test_product("low", "A", 100, 1, 10),
        ];

        let rows = out_of_stock(&products);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "empty");
    }

    #[test]
    fn test_inventory_by_category() {
        let products = vec![
            test_product("p1", "Groceries", 200, 10, 2),
            test_product("p2", "Groceries", 400, 5, 2),
            test_product("p3", "Electronics", 9000, 2, 2),
        ];

        let rows = inventory_by_category(&products);
        assert_eq!(rows.len(), 2);
        // Alphabetical order
        assert_eq!(rows[0].category, "Electronics");
        assert_eq!(rows[0].product_count, 1);
        assert_eq!(rows[0].stock_value_cents, 18_000);
        assert_eq!(rows[1].category, "Groceries");
        assert_eq!(rows[1].product_count, 2);
        assert_eq!(rows[1].stock_value_cents, 4000);
        assert_eq!(rows[1].average_price_cents, 300);
    }

    #[test]
    fn test_summary() {
        let products = vec![test_product("p1", "A", 100, 5, 2)];
        let sales = vec![
            test_sale("s1", "c1", 1, vec![("p1", 2, 100)]),
            test_sale("s2", "c1", 2, vec![("p1", 4, 100)]),
        ];

        let s = summary(&sales, &products, &[]);
        assert_eq!(s.total_revenue_cents, 600);
        assert_eq!(s.sale_count, 2);
        assert_eq!(s.product_count, 1);
        assert_eq!(s.average_sale_cents, 300);
    }

    #[test]
    fn test_summary_empty_store() {
        let s = summary(&[], &[], &[]);
        assert_eq!(s.average_sale_cents, 0);
        assert_eq!(s.total_revenue_cents, 0);
    }

    #[test]
    fn test_sales_for_cashier_filters() {
        let sales = vec![
            test_sale("s1", "alice", 1, vec![("p1", 1, 100)]),
            test_sale("s2", "bob", 1, vec![("p1", 1, 100)]),
            test_sale("s3", "alice", 2, vec![("p1", 1, 100)]),
        ];

        let mine = sales_for_cashier(&sales, "alice");
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|s| s.cashier_id == "alice"));
    }

    #[test]
    fn test_cashier_totals() {
        let users = vec![test_cashier("alice", "Alice"), test_cashier("bob", "Bob")];
        let sales = vec![
            test_sale("s1", "alice", 1, vec![("p1", 2, 100)]),
            test_sale("s2", "alice", 2, vec![("p1", 1, 100)]),
        ];

        let rows = cashier_totals(&sales, &users);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].cashier_name, "Alice");
        assert_eq!(rows[0].total_cents, 300);
        assert_eq!(rows[0].sale_count, 2);
        assert_eq!(rows[1].total_cents, 0);
        assert_eq!(rows[1].sale_count, 0);
    }
}
