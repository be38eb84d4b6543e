//! Field-level input checks shared by the store facade and the checkout
//! session.
//!
//! Every function here answers one narrow question about a single value and
//! reports failures as [`ValidationError`] variants that carry the field
//! name. Callers run these before touching business state, so a bad request
//! is rejected with a precise message instead of surfacing later as a
//! constraint violation from SQLite.
//!
//! ```rust
//! use hypermart_core::validation::{validate_price_cents, validate_quantity};
//!
//! validate_quantity(3).unwrap();
//! validate_price_cents(1249).unwrap();
//! ```

use crate::error::{ValidationError, ValidationResult};
use crate::types::{NewProduct, ProductPatch};

/// Longest accepted product name, in bytes.
const MAX_NAME_LEN: usize = 200;
/// Longest accepted category label, in bytes.
const MAX_CATEGORY_LEN: usize = 100;
/// RFC 5321 ceiling for a full email address.
const MAX_EMAIL_LEN: usize = 254;

/// Trims `value` and rejects blank input, handing back the trimmed slice.
fn non_blank<'a>(field: &str, value: &'a str) -> ValidationResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(trimmed)
}

/// Shared check for bounded free-text fields: non-blank after trimming and
/// at most `max` bytes.
fn bounded_text<'a>(field: &str, value: &'a str, max: usize) -> ValidationResult<&'a str> {
    let trimmed = non_blank(field, value)?;
    if trimmed.len() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }
    Ok(trimmed)
}

fn non_negative(field: &str, value: i64) -> ValidationResult<()> {
    if value < 0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }
    Ok(())
}

fn positive(field: &str, value: i64) -> ValidationResult<()> {
    if value <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Checks a product name: non-blank after trimming, at most 200 bytes.
///
/// ```rust
/// use hypermart_core::validation::validate_product_name;
///
/// assert!(validate_product_name("Greek Yogurt 500g").is_ok());
/// assert!(validate_product_name("   ").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    bounded_text("name", name, MAX_NAME_LEN)?;
    Ok(())
}

/// Checks a category label: non-blank, at most 100 bytes.
pub fn validate_category(category: &str) -> ValidationResult<()> {
    bounded_text("category", category, MAX_CATEGORY_LEN)?;
    Ok(())
}

/// Checks the shape of an account email.
///
/// The test is deliberately loose: one `@`, a non-empty local part and a
/// dotted domain. Anything stricter belongs to the mail system that
/// actually delivers to the address.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = bounded_text("email", email, MAX_EMAIL_LEN)?;

    let well_formed = email.split_once('@').is_some_and(|(local, domain)| {
        !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
    });
    if !well_formed {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must look like name@example.com".to_string(),
        });
    }

    Ok(())
}

/// A cart or sale quantity must be at least one. The stock-aware cap is
/// applied by the cart itself, which knows the live product.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    positive("quantity", qty)
}

/// A unit price may be zero (giveaways, deposit returns) but never
/// negative.
///
/// ```rust
/// use hypermart_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(599).is_ok());
/// assert!(validate_price_cents(0).is_ok());
/// assert!(validate_price_cents(-599).is_err());
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    non_negative("price", cents)
}

/// Stock on hand is a count, so zero is legal and negatives are not.
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    non_negative("stock", stock)
}

/// A low-stock threshold of zero turns the percentage alerts off and
/// leaves only the sold-out alert.
pub fn validate_threshold(threshold: i64) -> ValidationResult<()> {
    non_negative("threshold", threshold)
}

/// Tendered cash must be a positive amount. Whether it covers the cart
/// total is decided at checkout, where the total is known.
pub fn validate_payment_amount(cents: i64) -> ValidationResult<()> {
    positive("payment amount", cents)
}

/// Runs every field check on a product draft before it is inserted.
pub fn validate_new_product(product: &NewProduct) -> ValidationResult<()> {
    validate_product_name(&product.name)?;
    validate_category(&product.category)?;
    validate_price_cents(product.price_cents)?;
    validate_stock(product.stock)?;
    validate_threshold(product.threshold)?;
    Ok(())
}

/// Checks only the fields a partial update actually carries. An absent
/// field keeps its stored value and needs no inspection.
pub fn validate_product_patch(patch: &ProductPatch) -> ValidationResult<()> {
    if let Some(name) = &patch.name {
        validate_product_name(name)?;
    }
    if let Some(category) = &patch.category {
        validate_category(category)?;
    }
    if let Some(price_cents) = patch.price_cents {
        validate_price_cents(price_cents)?;
    }
    if let Some(stock) = patch.stock {
        validate_stock(stock)?;
    }
    if let Some(threshold) = patch.threshold {
        validate_threshold(threshold)?;
    }
    Ok(())
}

/// Confirms `id` parses as a UUID.
///
/// Checkout records the cashier id on every sale, so a malformed id is
/// rejected before any rows are written. The raw string is parsed, which
/// means surrounding whitespace is not forgiven.
///
/// ```rust
/// use hypermart_core::validation::validate_uuid;
///
/// assert!(validate_uuid("2f1e9c4a-5b6d-4e7f-8a9b-0c1d2e3f4a5b").is_ok());
/// assert!(validate_uuid("checkout-1").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    non_blank("id", id)?;

    if uuid::Uuid::parse_str(id).is_err() {
        return Err(ValidationError::InvalidFormat {
            field: "id".to_string(),
            reason: "must be a valid UUID".to_string(),
        });
    }

    Ok(())
}
