//! # Repositories
//!
//! One repository per entity, each a thin struct over a cloned pool
//! handle. SQL lives here and nowhere else; callers get domain types
//! from `hypermart-core` back, never rows.
//!
//! | Repository | Covers |
//! |---|---|
//! | [`product::ProductRepository`] | catalog list/insert/partial update/bulk update/delete |
//! | [`sale::SaleRepository`] | transactional checkout, nested history, admin replace-all |
//! | [`user::UserRepository`] | admin and cashier accounts (hashed credentials) |
//! | [`alert::StockAlertRepository`] | derived alert snapshots, replace-all persistence |
//! | [`setting::SettingRepository`] | store-wide key/value configuration |
//!
//! Every repository is exercised against `DbConfig::in_memory()` in its
//! own test module, which gets a real schema from the embedded
//! migrations rather than mocks.

pub mod alert;
pub mod product;
pub mod sale;
pub mod setting;
pub mod user;
