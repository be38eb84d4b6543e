//! # HyperMart POS Application Layer
//!
//! The orchestration crate the UI talks to: the store-data aggregator,
//! the checkout session, credential handling, and runtime configuration.
//!
//! ## Module Organization
//! ```text
//! hypermart_pos/
//! ├── lib.rs          ◄─── You are here (wiring & re-exports)
//! ├── store.rs        ◄─── StoreData: in-memory mirrors + revision channel
//! ├── session.rs      ◄─── PosSession: cart, checkout, receipts
//! ├── auth.rs         ◄─── Password hashing and sign-in
//! ├── config.rs       ◄─── PosConfig (HYPERMART_* environment)
//! ├── error.rs        ◄─── PosError: the serialized boundary error
//! └── bin/seed.rs     ◄─── Demo fixture loader
//! ```
//!
//! ## Typical Wiring
//! ```rust,ignore
//! let config = PosConfig::from_env();
//! let store = hypermart_pos::open_store(&config).await?;
//!
//! let auth = AuthService::new(store.database());
//! let cashier = auth.sign_in("john@hypermart.com", "...").await?;
//!
//! let mut session = PosSession::new(store.clone(), cashier);
//! session.add_to_cart(&product_id).await?;
//! let receipt = session.complete_payment(2000).await?;
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod session;
pub mod store;

pub use auth::AuthService;
pub use config::PosConfig;
pub use error::{ErrorCode, PosError, PosResult};
pub use session::{PosSession, Receipt};
pub use store::StoreData;

use hypermart_db::Database;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Opens the database named by `config` and builds the aggregator on
/// top, including the initial full fetch.
pub async fn open_store(config: &PosConfig) -> PosResult<StoreData> {
    let db = Database::new(config.db_config()).await?;
    let store = StoreData::new(db).await?;
    info!(store_name = %config.store_name, "Store opened");
    Ok(store)
}

/// Initializes the tracing subscriber for binaries.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages everywhere
/// - `RUST_LOG=hypermart_pos=trace` - Trace this crate only
/// - Default: INFO, with debug for the workspace crates and warn for sqlx
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("info,hypermart_pos=debug,hypermart_db=debug,sqlx=warn")
    });

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
