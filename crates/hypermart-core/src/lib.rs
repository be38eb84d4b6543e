//! Business rules for the HyperMart point of sale, kept free of I/O.
//!
//! Everything here is synchronous and deterministic: money arithmetic,
//! cart rules, stock alerts and sales analytics work entirely on values
//! the caller passes in. Persistence lives in `hypermart-db` and
//! orchestration in `hypermart-pos`; neither concern leaks into this
//! crate, which keeps every rule testable with literal fixtures.
//!
//! Module map:
//!
//! - [`types`]: catalog, sale and user records shared across crates
//! - [`money`]: integer-cent arithmetic and display formatting
//! - [`cart`]: in-memory cart with stock-aware quantity rules
//! - [`alerts`]: low-stock alert derivation over a product snapshot
//! - [`analytics`]: chart-ready aggregates over sales and products
//! - [`validation`]: field checks run before any state changes
//! - [`error`]: [`CoreError`], [`ValidationError`] and their aliases

pub mod alerts;
pub mod analytics;
pub mod cart;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// The flat paths below are the crate's public vocabulary; the submodule
// paths stay valid but callers should not need them.
pub use alerts::compute_stock_alerts;
pub use cart::{Cart, CartLine, QuantityUpdate};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;
