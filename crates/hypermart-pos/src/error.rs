//! # Application Error Boundary
//!
//! Converts internal errors into the serializable shape the frontend
//! consumes. Internal details (SQL text, pool state, invariant dumps)
//! stay in the logs; the UI gets a stable machine code plus a message
//! it can show verbatim.
//!
//! ## Error Flow
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      Error Conversion                        │
//! │                                                              │
//! │  CoreError ────┐                                             │
//! │                ├──▶ PosError { code, message } ──▶ JSON ──▶ UI│
//! │  DbError ──────┘         │                                   │
//! │                          └──▶ tracing::error! (internals)    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Rules
//! 1. Business errors keep their context (product names, amounts) so
//!    the cashier sees something actionable.
//! 2. Infrastructure errors are logged with full detail but surface
//!    as a generic message. Nobody at a till needs a SQLite backtrace.

use hypermart_core::{CoreError, ValidationError};
use hypermart_db::DbError;
use serde::Serialize;

// =============================================================================
// Error Codes
// =============================================================================

/// Machine-readable error codes for the frontend.
///
/// The UI switches on these to decide presentation: toast, inline
/// field error, or modal. Serialized as SCREAMING_SNAKE_CASE strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Requested entity does not exist
    NotFound,

    /// Input failed validation (show inline near the field)
    ValidationError,

    /// Database operation failed (generic message shown)
    DatabaseError,

    /// A business rule blocked the operation
    BusinessLogic,

    /// Cart operation failed (empty cart, stale line, out of stock)
    CartError,

    /// Not enough stock to cover the requested quantity
    InsufficientStock,

    /// Payment was rejected (e.g., tendered below total)
    PaymentError,

    /// Sign-in failed or session is not authorized
    AuthError,

    /// Unexpected internal error (generic message shown)
    Internal,
}

// =============================================================================
// PosError
// =============================================================================

/// Error type crossing the application boundary.
///
/// ## Serialized Shape
/// ```json
/// { "code": "INSUFFICIENT_STOCK", "message": "Only 3 Milk in stock" }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PosError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable message, safe to display
    pub message: String,
}

impl PosError {
    /// Creates a new error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        PosError {
            code,
            message: message.into(),
        }
    }

    /// Creates a NOT_FOUND error.
    pub fn not_found(entity: &str, id: &str) -> Self {
        PosError::new(ErrorCode::NotFound, format!("{entity} not found: {id}"))
    }

    /// Creates a VALIDATION_ERROR.
    pub fn validation(message: impl Into<String>) -> Self {
        PosError::new(ErrorCode::ValidationError, message)
    }

    /// Creates a CART_ERROR.
    pub fn cart(message: impl Into<String>) -> Self {
        PosError::new(ErrorCode::CartError, message)
    }

    /// Creates an AUTH_ERROR.
    ///
    /// Sign-in failures deliberately use one message for both unknown
    /// email and wrong password, so the response does not reveal which
    /// accounts exist.
    pub fn auth() -> Self {
        PosError::new(ErrorCode::AuthError, "Invalid email or password")
    }

    /// Creates an INTERNAL error with a generic user-facing message.
    pub fn internal() -> Self {
        PosError::new(
            ErrorCode::Internal,
            "An internal error occurred. Please try again.",
        )
    }
}

impl std::fmt::Display for PosError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for PosError {}

/// Convenience type alias for Results at the application boundary.
pub type PosResult<T> = Result<T, PosError>;

// =============================================================================
// Conversions from Internal Errors
// =============================================================================

impl From<DbError> for PosError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => PosError::not_found(&entity, &id),

            DbError::UniqueViolation { field } => {
                PosError::validation(format!("{field} already exists"))
            }

            DbError::InsufficientStock {
                product,
                available,
                requested,
            } => PosError::new(
                ErrorCode::InsufficientStock,
                format!("Insufficient stock for {product}: available {available}, requested {requested}"),
            ),

            DbError::ForeignKeyViolation { message } => {
                tracing::error!(error = %message, "foreign key violation");
                PosError::new(
                    ErrorCode::DatabaseError,
                    "Operation conflicts with existing records",
                )
            }

            // Infrastructure failures: log the detail, show a generic message.
            DbError::ConnectionFailed(detail)
            | DbError::MigrationFailed(detail)
            | DbError::QueryFailed(detail)
            | DbError::Internal(detail) => {
                tracing::error!(error = %detail, "database error");
                PosError::new(
                    ErrorCode::DatabaseError,
                    "A database error occurred. Please try again.",
                )
            }

            DbError::PoolExhausted => {
                tracing::error!("connection pool exhausted");
                PosError::new(
                    ErrorCode::DatabaseError,
                    "The system is busy. Please try again.",
                )
            }
        }
    }
}

impl From<CoreError> for PosError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(id) => PosError::not_found("Product", &id),

            CoreError::LineNotFound(_)
            | CoreError::OutOfStock { .. }
            | CoreError::EmptyCart
            | CoreError::UnavailableProducts { .. } => PosError::cart(err.to_string()),

            CoreError::InsufficientStock { .. } => {
                PosError::new(ErrorCode::InsufficientStock, err.to_string())
            }

            CoreError::InsufficientPayment { .. } => {
                PosError::new(ErrorCode::PaymentError, err.to_string())
            }

            CoreError::EmptySale | CoreError::InvalidQuantity { .. } => {
                PosError::validation(err.to_string())
            }

            // Total mismatches mean we built a broken sale. Log loudly;
            // the cashier just needs to know the checkout did not go through.
            CoreError::LineTotalMismatch { .. } | CoreError::SaleTotalMismatch { .. } => {
                tracing::error!(error = %err, "sale failed integrity check");
                PosError::new(
                    ErrorCode::BusinessLogic,
                    "Sale failed an integrity check and was not recorded",
                )
            }

            CoreError::EmptyReplacement => {
                PosError::new(ErrorCode::BusinessLogic, err.to_string())
            }

            CoreError::Validation(v) => PosError::validation(v.to_string()),
        }
    }
}

impl From<ValidationError> for PosError {
    fn from(err: ValidationError) -> Self {
        PosError::validation(err.to_string())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_serialize_screaming_snake() {
        let err = PosError::new(ErrorCode::InsufficientStock, "Only 3 Milk in stock");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "INSUFFICIENT_STOCK");
        assert_eq!(json["message"], "Only 3 Milk in stock");
    }

    #[test]
    fn test_db_not_found_maps_to_not_found() {
        let err: PosError = DbError::NotFound {
            entity: "Product".to_string(),
            id: "p1".to_string(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Product not found: p1");
    }

    #[test]
    fn test_db_unique_violation_maps_to_validation() {
        let err: PosError = DbError::UniqueViolation {
            field: "email".to_string(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "email already exists");
    }

    #[test]
    fn test_db_internal_hides_detail() {
        let err: PosError = DbError::QueryFailed("syntax error near SELECT".to_string()).into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(!err.message.contains("SELECT"));
    }

    #[test]
    fn test_core_payment_maps_to_payment_error() {
        let err: PosError = CoreError::InsufficientPayment {
            total_cents: 1500,
            tendered_cents: 1000,
        }
        .into();
        assert_eq!(err.code, ErrorCode::PaymentError);
    }

    #[test]
    fn test_core_empty_cart_maps_to_cart_error() {
        let err: PosError = CoreError::EmptyCart.into();
        assert_eq!(err.code, ErrorCode::CartError);
        assert_eq!(err.message, "Cart is empty");
    }

    #[test]
    fn test_core_insufficient_stock_keeps_context() {
        let err: PosError = CoreError::InsufficientStock {
            name: "Milk".to_string(),
            available: 3,
            requested: 5,
        }
        .into();
        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert!(err.message.contains("Milk"));
        assert!(err.message.contains('3'));
    }

    #[test]
    fn test_auth_error_is_uniform() {
        let err = PosError::auth();
        assert_eq!(err.code, ErrorCode::AuthError);
        assert_eq!(err.message, "Invalid email or password");
    }

    #[test]
    fn test_display_includes_code() {
        let err = PosError::not_found("User", "u9");
        assert_eq!(err.to_string(), "[NotFound] User not found: u9");
    }
}
