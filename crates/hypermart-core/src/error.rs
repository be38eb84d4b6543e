//! Error taxonomy for the domain layer.
//!
//! Two enums cover this crate. [`ValidationError`] reports a single field
//! that failed an input check and is raised by [`crate::validation`] before
//! any state changes. [`CoreError`] reports a business rule that blocked an
//! operation: stocking and payment rules, plus the integrity checks applied
//! to imported sale history.
//!
//! A `ValidationError` converts into `CoreError` through `#[from]`, so
//! functions deep in a workflow can return [`CoreResult`] while the
//! application crate decides how each failure is presented.
//!
//! Messages address the operator at the till. They name the product or
//! field involved and are safe to show verbatim.

use thiserror::Error;

/// Rule violations raised by carts, checkout and sale-history imports.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No product with this id in the live catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// No cart line with this id.
    #[error("Cart line not found: {0}")]
    LineNotFound(String),

    /// Stock is zero, so the product cannot go into a cart at all.
    #[error("{name} is out of stock")]
    OutOfStock { name: String },

    /// The requested quantity would take the line past what the shelf
    /// holds. Carries both numbers so the caller can offer the remainder.
    #[error("Insufficient stock for {name}: available {available}, requested {requested}")]
    InsufficientStock {
        name: String,
        available: i64,
        requested: i64,
    },

    /// Checkout was started with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Cart lines reference products deleted since they were added. Lists
    /// the names so the operator knows which lines to remove.
    #[error("Cart contains unavailable products: {names:?}")]
    UnavailableProducts { names: Vec<String> },

    /// The tendered amount falls short of the cart total.
    #[error("Insufficient payment: total {total_cents} cents, tendered {tendered_cents} cents")]
    InsufficientPayment {
        total_cents: i64,
        tendered_cents: i64,
    },

    /// An imported sale carries no items.
    #[error("Sale must contain at least one item")]
    EmptySale,

    /// An imported sale item has a zero or negative quantity.
    #[error("Invalid quantity {quantity} for {product}")]
    InvalidQuantity { product: String, quantity: i64 },

    /// An imported line total disagrees with quantity times unit price.
    #[error("Line total mismatch for {product}: expected {expected_cents}, got {actual_cents}")]
    LineTotalMismatch {
        product: String,
        expected_cents: i64,
        actual_cents: i64,
    },

    /// An imported sale total disagrees with the sum of its line totals.
    #[error("Sale total mismatch: expected {expected_cents}, got {actual_cents}")]
    SaleTotalMismatch {
        expected_cents: i64,
        actual_cents: i64,
    },

    /// A bulk history replacement arrived with an empty list. Nothing is
    /// deleted in that case.
    #[error("Refusing to replace sales with an empty list")]
    EmptyReplacement,

    /// An input check failed before the operation ran.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// A single field that failed an input check. The field name rides along
/// so the message can point at the offending form control.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: String },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    #[error("{field} must not be negative")]
    Negative { field: String },

    #[error("{field} must be positive")]
    MustBePositive { field: String },

    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

/// Result carrying a [`CoreError`].
pub type CoreResult<T> = Result<T, CoreError>;

/// Result carrying a [`ValidationError`].
pub type ValidationResult<T> = Result<T, ValidationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_shortage_names_both_counts() {
        let err = CoreError::InsufficientStock {
            name: "Almond Milk 1L".to_string(),
            available: 2,
            requested: 6,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for Almond Milk 1L: available 2, requested 6"
        );
    }

    #[test]
    fn test_payment_shortfall_message() {
        let err = CoreError::InsufficientPayment {
            total_cents: 4250,
            tendered_cents: 4000,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient payment: total 4250 cents, tendered 4000 cents"
        );
    }

    #[test]
    fn test_guard_messages_are_stable() {
        assert_eq!(CoreError::EmptyCart.to_string(), "Cart is empty");
        assert_eq!(
            CoreError::EmptyReplacement.to_string(),
            "Refusing to replace sales with an empty list"
        );
    }

    #[test]
    fn test_unavailable_products_lists_names() {
        let err = CoreError::UnavailableProducts {
            names: vec!["Oat Bars".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Cart contains unavailable products: [\"Oat Bars\"]"
        );
    }

    #[test]
    fn test_import_mismatch_messages() {
        let err = CoreError::LineTotalMismatch {
            product: "Rice 5kg".to_string(),
            expected_cents: 2400,
            actual_cents: 2300,
        };
        assert_eq!(
            err.to_string(),
            "Line total mismatch for Rice 5kg: expected 2400, got 2300"
        );

        let err = CoreError::SaleTotalMismatch {
            expected_cents: 9100,
            actual_cents: 8900,
        };
        assert_eq!(
            err.to_string(),
            "Sale total mismatch: expected 9100, got 8900"
        );
    }

    #[test]
    fn test_field_error_wraps_into_core() {
        let field_err = ValidationError::TooLong {
            field: "category".to_string(),
            max: 100,
        };
        let core_err: CoreError = field_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert_eq!(
            core_err.to_string(),
            "Validation error: category must be at most 100 characters"
        );
    }
}
