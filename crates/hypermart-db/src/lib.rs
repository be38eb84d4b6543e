//! # hypermart-db
//!
//! SQLite persistence for HyperMart POS: one [`Database`] handle over a
//! pooled connection, per-entity repositories, embedded migrations, and
//! a typed error taxonomy. The aggregator in `hypermart-pos` is the
//! main consumer; nothing here knows about carts, sessions, or the UI.
//!
//! ```text
//! StoreData ──► Database ──► {Product,Sale,User,StockAlert,Setting}Repository
//!                  │
//!                  └──► migrations/sqlite (embedded, applied on open)
//! ```
//!
//! Entities and their invariants live in `hypermart-core`; this crate
//! maps them onto rows and keeps multi-row writes transactional
//! (`record_sale`, `update_all`, the `replace_all` pair).
//!
//! ## Usage
//!
//! ```rust,ignore
//! use hypermart_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./hypermart.db")).await?;
//! let products = db.products().list().await?;
//! let sale = db.sales().record_sale(&draft).await?;
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::alert::StockAlertRepository;
pub use repository::product::ProductRepository;
pub use repository::sale::SaleRepository;
pub use repository::setting::SettingRepository;
pub use repository::user::UserRepository;
