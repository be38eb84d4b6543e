//! # Runtime Configuration
//!
//! What the process needs to know before it has a database: where the
//! SQLite file lives, plus display defaults for receipts. Loaded once
//! at startup from `HYPERMART_*` environment variables with development
//! fallbacks, then treated as read-only.
//!
//! Durable per-store values (receipt footer, the display name shown in
//! the UI) live in the `settings` table and are managed through
//! `StoreData::update_setting`; this struct only seeds their defaults.

use hypermart_db::DbConfig;
use serde::{Deserialize, Serialize};

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Process-level configuration.
///
/// Overridable via `HYPERMART_DB`, `HYPERMART_STORE_NAME`, and
/// `HYPERMART_CURRENCY_SYMBOL`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PosConfig {
    /// SQLite file path. Relative paths resolve against the working
    /// directory.
    pub database_path: String,

    /// Store name printed on receipts.
    pub store_name: String,

    /// Currency symbol for formatted amounts.
    pub currency_symbol: String,

    /// Decimal places the currency uses (2 for dollars, 0 for yen).
    pub currency_decimals: u8,
}

impl Default for PosConfig {
    fn default() -> Self {
        PosConfig {
            database_path: "hypermart.db".to_string(),
            store_name: "HyperMart".to_string(),
            currency_symbol: "$".to_string(),
            currency_decimals: 2,
        }
    }
}

impl PosConfig {
    /// Reads configuration from the environment, falling back to
    /// development defaults per field.
    pub fn from_env() -> Self {
        let defaults = PosConfig::default();

        PosConfig {
            database_path: env_or("HYPERMART_DB", &defaults.database_path),
            store_name: env_or("HYPERMART_STORE_NAME", &defaults.store_name),
            currency_symbol: env_or("HYPERMART_CURRENCY_SYMBOL", &defaults.currency_symbol),
            currency_decimals: defaults.currency_decimals,
        }
    }

    /// Pool configuration pointing at this config's database file.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database_path)
    }

    /// Renders a cent amount with this config's symbol and precision,
    /// e.g. `format_currency(1234)` is `"$12.34"`.
    pub fn format_currency(&self, cents: i64) -> String {
        let sign = if cents < 0 { "-" } else { "" };
        let magnitude = cents.abs();

        if self.currency_decimals == 0 {
            return format!("{sign}{}{magnitude}", self.currency_symbol);
        }

        let divisor = 10_i64.pow(self.currency_decimals as u32);
        format!(
            "{sign}{}{}.{:0width$}",
            self.currency_symbol,
            magnitude / divisor,
            magnitude % divisor,
            width = self.currency_decimals as usize
        )
    }
}
