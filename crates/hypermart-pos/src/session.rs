//! # Checkout Session
//!
//! One signed-in cashier's terminal session: the cart, the checkout
//! workflow, and the last printed receipt.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        PosSession                                   │
//! │                                                                     │
//! │  add_to_cart ──► update_quantity ──► begin_checkout ──► complete_   │
//! │       │               │                   │             payment     │
//! │       ▼               ▼                   ▼                │        │
//! │  resolve product  clamp to stock    block if empty         ▼        │
//! │  from store       (warning, not     or a line's       validate      │
//! │  mirror           rejection)        product vanished  tendered ≥    │
//! │                                                       total, then   │
//! │                                                       add_sale +    │
//! │                                                       Receipt       │
//! │                                                                     │
//! │  The cart is cleared only after the sale has committed. Any         │
//! │  failure leaves the cart exactly as it was.                         │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The cart itself is a pure state machine in `hypermart_core::cart`;
//! this layer resolves live products from the store mirror and drives
//! the payment step.

use chrono::{DateTime, Utc};
use hypermart_core::{
    analytics, validation, Cart, CartLine, CoreError, Money, QuantityUpdate, Role, Sale, SaleItem,
    User,
};
use serde::Serialize;
use tracing::{info, warn};
use ts_rs::TS;

use crate::error::PosResult;
use crate::store::StoreData;

// =============================================================================
// Receipt
// =============================================================================

/// What the customer takes home. Emitted by `complete_payment` and
/// retained as `last_receipt` for re-display or re-print.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub sale_id: String,
    pub items: Vec<SaleItem>,
    pub total_cents: i64,
    pub tendered_cents: i64,
    pub change_cents: i64,
    pub cashier_name: String,
    #[ts(as = "String")]
    pub timestamp: DateTime<Utc>,
}

// =============================================================================
// PosSession
// =============================================================================

/// A cashier's point-of-sale session.
pub struct PosSession {
    store: StoreData,
    cashier: User,
    cart: Cart,
    last_receipt: Option<Receipt>,
}

impl PosSession {
    /// Opens a session for a signed-in user.
    pub fn new(store: StoreData, cashier: User) -> Self {
        PosSession {
            store,
            cashier,
            cart: Cart::new(),
            last_receipt: None,
        }
    }

    /// The signed-in user.
    pub fn cashier(&self) -> &User {
        &self.cashier
    }

    /// The current cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// The receipt of the most recent completed sale, if any.
    pub fn last_receipt(&self) -> Option<&Receipt> {
        self.last_receipt.as_ref()
    }

    // =========================================================================
    // Cart Operations
    // =========================================================================

    /// Adds one unit of a product to the cart, merging with an existing
    /// line. Rejected when the product is unknown, out of stock, or the
    /// line already sits at the stock cap.
    pub async fn add_to_cart(&mut self, product_id: &str) -> PosResult<()> {
        let product = self
            .store
            .find_product(product_id)
            .await
            .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;

        self.cart.add_product(&product)?;
        Ok(())
    }

    /// Sets a line's quantity against the product's live stock.
    /// Quantities above stock clamp (a warning outcome); zero or below
    /// removes the line.
    pub async fn update_quantity(
        &mut self,
        line_id: &str,
        quantity: i64,
    ) -> PosResult<QuantityUpdate> {
        let (product_id, product_name) = {
            let line = self
                .cart
                .lines()
                .iter()
                .find(|l| l.id == line_id)
                .ok_or_else(|| CoreError::LineNotFound(line_id.to_string()))?;
            (line.product_id.clone(), line.product_name.clone())
        };

        let product = self
            .store
            .find_product(&product_id)
            .await
            .ok_or_else(|| CoreError::UnavailableProducts {
                names: vec![product_name],
            })?;

        let outcome = self.cart.update_quantity(line_id, quantity, &product)?;
        if let QuantityUpdate::Clamped { available } = outcome {
            warn!(line_id, available, "Requested quantity clamped to stock");
        }
        Ok(outcome)
    }

    /// Removes a line unconditionally.
    pub fn remove_from_cart(&mut self, line_id: &str) -> PosResult<()> {
        self.cart.remove_line(line_id)?;
        Ok(())
    }

    /// Empties the cart. The confirmation prompt is the UI's concern.
    pub fn clear_cart(&mut self) {
        self.cart.clear();
    }

    /// Lines whose product has vanished from the catalog since they were
    /// added. These block checkout until removed.
    pub async fn invalid_lines(&self) -> Vec<CartLine> {
        let products = self.store.products().await;
        self.cart
            .invalid_lines(&products)
            .into_iter()
            .cloned()
            .collect()
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Starts checkout: blocked for an empty cart or one holding lines
    /// whose product no longer exists. Returns the amount to collect.
    pub async fn begin_checkout(&self) -> PosResult<Money> {
        if self.cart.is_empty() {
            return Err(CoreError::EmptyCart.into());
        }

        let products = self.store.products().await;
        let invalid = self.cart.invalid_lines(&products);
        if !invalid.is_empty() {
            return Err(CoreError::UnavailableProducts {
                names: invalid.iter().map(|l| l.product_name.clone()).collect(),
            }
            .into());
        }

        Ok(self.cart.total())
    }

    /// Completes the sale: validates the payment and the cashier
    /// identity, records the sale (stock decrements included) through the
    /// aggregator, and emits the receipt.
    ///
    /// The cart is cleared only after the sale commits; any failure
    /// leaves it untouched for retry.
    pub async fn complete_payment(&mut self, tendered_cents: i64) -> PosResult<Receipt> {
        validation::validate_payment_amount(tendered_cents)?;
        validation::validate_uuid(&self.cashier.id)?;

        let total_cents = self.begin_checkout().await?.cents();
        if tendered_cents < total_cents {
            return Err(CoreError::InsufficientPayment {
                total_cents,
                tendered_cents,
            }
            .into());
        }

        let draft = self
            .cart
            .draft_sale(&self.cashier.id, &self.cashier.name, Utc::now());
        let sale = self.store.add_sale(&draft).await?;

        let receipt = Receipt {
            sale_id: sale.id.clone(),
            items: sale.items.clone(),
            total_cents: sale.total_amount_cents,
            tendered_cents,
            change_cents: tendered_cents - sale.total_amount_cents,
            cashier_name: sale.cashier_name.clone(),
            timestamp: sale.timestamp,
        };
        info!(
            sale_id = %receipt.sale_id,
            total_cents = receipt.total_cents,
            change_cents = receipt.change_cents,
            "Payment completed"
        );

        self.cart.clear();
        self.last_receipt = Some(receipt.clone());
        Ok(receipt)
    }

    // =========================================================================
    // History
    // =========================================================================

    /// Sales visible to this session: admins see everything, cashiers
    /// see their own history.
    pub async fn visible_sales(&self) -> Vec<Sale> {
        let sales = self.store.sales().await;
        match self.cashier.role {
            Role::Admin => sales,
            Role::Cashier => analytics::sales_for_cashier(&sales, &self.cashier.id),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
