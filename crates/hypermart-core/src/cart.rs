//! # Cart State Machine
//!
//! The in-progress sale: transient lines that only become durable at
//! checkout, when the cart is handed to the aggregator as a sale draft.
//!
//! ## Line Lifecycle
//! ```text
//! absent ──add──► present(quantity=1) ──add/update──► present(quantity=n)
//!    ▲                                                        │
//!    └──────── remove / quantity≤0 / clamp-to-zero ◄──────────┘
//! ```
//!
//! ## Invariants
//! - Lines are unique by `product_id` (adding the same product merges)
//! - `total_cents == quantity × price_cents` on every line, always
//! - `quantity` never exceeds the live product stock at mutation time
//! - Unit price is frozen when the line is created; later product price
//!   changes do not touch open carts

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{NewSale, NewSaleItem, Product};

// =============================================================================
// Cart Line
// =============================================================================

/// One product in the cart. Shares the sale item shape so checkout is a
/// straight hand-off.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Line id (UUID v4), distinct from the product id.
    pub id: String,

    /// Product this line references (for stock checks and validity).
    pub product_id: String,

    /// Product name at time of adding (frozen).
    pub product_name: String,

    /// Quantity in cart. Always > 0.
    pub quantity: i64,

    /// Price in cents at time of adding (frozen).
    pub price_cents: i64,

    /// Line total (price × quantity), kept in lockstep with quantity.
    pub total_cents: i64,
}

impl CartLine {
    fn from_product(product: &Product) -> Self {
        CartLine {
            id: Uuid::new_v4().to_string(),
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            quantity: 1,
            price_cents: product.price_cents,
            total_cents: product.price_cents,
        }
    }

    /// Returns the line total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    fn set_quantity(&mut self, quantity: i64) {
        self.quantity = quantity;
        self.total_cents = self.price_cents * quantity;
    }

    fn to_sale_item(&self) -> NewSaleItem {
        NewSaleItem {
            product_id: self.product_id.clone(),
            product_name: self.product_name.clone(),
            quantity: self.quantity,
            price_cents: self.price_cents,
            total_cents: self.total_cents,
        }
    }
}

// =============================================================================
// Quantity Update Outcome
// =============================================================================

/// Result of a quantity update. `Clamped` is a success with a warning:
/// the quantity was capped at the available stock instead of rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityUpdate {
    /// Quantity set as requested.
    Updated { quantity: i64 },
    /// Requested more than the shelf holds; capped at `available`.
    Clamped { available: i64 },
    /// Quantity fell to zero; the line is gone.
    Removed,
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart. Pure state machine; the session layer owns one per
/// signed-in cashier and the aggregator never sees it until checkout.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { lines: Vec::new() }
    }

    /// Adds one unit of a product, merging with an existing line.
    ///
    /// ## Behavior
    /// - Product out of stock: rejected, cart unchanged
    /// - Line exists at the stock cap: rejected, cart unchanged
    /// - Line exists below the cap: quantity +1
    /// - No line yet: new line with quantity 1, price frozen
    pub fn add_product(&mut self, product: &Product) -> CoreResult<()> {
        if product.stock <= 0 {
            return Err(CoreError::OutOfStock {
                name: product.name.clone(),
            });
        }

        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.product_id == product.id)
        {
            if line.quantity >= product.stock {
                return Err(CoreError::InsufficientStock {
                    name: product.name.clone(),
                    available: product.stock,
                    requested: line.quantity + 1,
                });
            }
            let quantity = line.quantity + 1;
            line.set_quantity(quantity);
            return Ok(());
        }

        self.lines.push(CartLine::from_product(product));
        Ok(())
    }

    /// Sets a line's quantity, clamping to the product's live stock.
    ///
    /// ## Behavior
    /// - `quantity <= 0`: the line is removed
    /// - `quantity > product.stock`: clamped to stock (or removed when the
    ///   shelf is empty, since a zero-quantity line cannot exist)
    /// - otherwise: set as requested
    ///
    /// The caller resolves `product` from the line's `product_id`; a line
    /// whose product vanished is handled by the validity check instead.
    pub fn update_quantity(
        &mut self,
        line_id: &str,
        quantity: i64,
        product: &Product,
    ) -> CoreResult<QuantityUpdate> {
        let index = self
            .lines
            .iter()
            .position(|line| line.id == line_id)
            .ok_or_else(|| CoreError::LineNotFound(line_id.to_string()))?;

        if quantity <= 0 {
            self.lines.remove(index);
            return Ok(QuantityUpdate::Removed);
        }

        if quantity > product.stock {
            if product.stock <= 0 {
                self.lines.remove(index);
                return Ok(QuantityUpdate::Removed);
            }
            self.lines[index].set_quantity(product.stock);
            return Ok(QuantityUpdate::Clamped {
                available: product.stock,
            });
        }

        self.lines[index].set_quantity(quantity);
        Ok(QuantityUpdate::Updated { quantity })
    }

    /// Removes a line unconditionally.
    pub fn remove_line(&mut self, line_id: &str) -> CoreResult<()> {
        let initial_len = self.lines.len();
        self.lines.retain(|line| line.id != line_id);

        if self.lines.len() == initial_len {
            Err(CoreError::LineNotFound(line_id.to_string()))
        } else {
            Ok(())
        }
    }

    /// Empties the cart. Confirmation prompts live in the UI layer.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Lines in ring-up order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Total quantity across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// Cart total in cents (sum of line totals; this system has no tax).
    pub fn total_cents(&self) -> i64 {
        self.lines.iter().map(|line| line.total_cents).sum()
    }

    /// Cart total as Money.
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents())
    }

    /// Lines whose product no longer exists in the catalog. A non-empty
    /// result blocks checkout until the lines are removed.
    pub fn invalid_lines<'a>(&'a self, products: &[Product]) -> Vec<&'a CartLine> {
        self.lines
            .iter()
            .filter(|line| !products.iter().any(|p| p.id == line.product_id))
            .collect()
    }

    /// True when any line's product has vanished from the catalog.
    pub fn has_invalid_lines(&self, products: &[Product]) -> bool {
        !self.invalid_lines(products).is_empty()
    }

    /// Builds the sale draft handed to the aggregator at checkout. The
    /// cart itself is left untouched; it is cleared only after the sale
    /// commits.
    pub fn draft_sale(
        &self,
        cashier_id: &str,
        cashier_name: &str,
        timestamp: chrono::DateTime<chrono::Utc>,
    ) -> NewSale {
        NewSale {
            items: self.lines.iter().map(CartLine::to_sale_item).collect(),
            total_amount_cents: self.total_cents(),
            cashier_id: cashier_id.to_string(),
            cashier_name: cashier_name.to_string(),
            timestamp,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
