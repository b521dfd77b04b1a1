//! # Application Configuration
//!
//! Settings loaded once at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`FLOW_*`)
//! 2. Defaults (this file)
//!
//! Read-only after initialization, so no locking.

use std::path::PathBuf;

use flow_core::{CurrencyFormat, EXPIRING_WINDOW_DAYS};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::pool::DbConfig;
use crate::store::StoreOptions;

/// Storage key the dashboard has always used for the sales collection.
pub const DEFAULT_STORAGE_KEY: &str = "iptv_sales";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// SQLite database file.
    pub database_path: PathBuf,

    /// Key under which the sales collection is stored.
    pub storage_key: String,

    /// Days-remaining threshold for "expiring" (inclusive).
    pub expiring_window_days: i64,

    /// Currency display rules.
    pub currency: CurrencyFormat,
}

impl Default for AppConfig {
    /// Development defaults: `./iptv_flow.db`, key `iptv_sales`, 5-day
    /// window, pt-BR BRL.
    fn default() -> Self {
        AppConfig {
            database_path: PathBuf::from("./iptv_flow.db"),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            expiring_window_days: EXPIRING_WINDOW_DAYS,
            currency: CurrencyFormat::default(),
        }
    }
}

impl AppConfig {
    /// Creates a config from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `FLOW_DB_PATH`: database file
    /// - `FLOW_STORAGE_KEY`: storage key
    /// - `FLOW_EXPIRING_DAYS`: expiring window (non-negative integer)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`AppConfig::from_env`] with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = AppConfig::default();

        if let Some(path) = lookup("FLOW_DB_PATH").filter(|p| !p.trim().is_empty()) {
            config.database_path = PathBuf::from(path);
        }

        if let Some(key) = lookup("FLOW_STORAGE_KEY").filter(|k| !k.trim().is_empty()) {
            config.storage_key = key;
        }

        if let Some(raw) = lookup("FLOW_EXPIRING_DAYS") {
            match raw.trim().parse::<i64>() {
                Ok(days) if days >= 0 => config.expiring_window_days = days,
                _ => warn!(
                    value = %raw,
                    default = config.expiring_window_days,
                    "Ignoring invalid FLOW_EXPIRING_DAYS"
                ),
            }
        }

        config
    }

    /// Pool configuration for the configured database file.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database_path)
    }

    /// Store settings derived from this config.
    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            storage_key: self.storage_key.clone(),
            expiring_window_days: self.expiring_window_days,
            currency: self.currency.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[]));
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.storage_key, "iptv_sales");
        assert_eq!(config.expiring_window_days, 5);
    }

    #[test]
    fn test_env_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("FLOW_DB_PATH", "/var/lib/flow/sales.db"),
            ("FLOW_STORAGE_KEY", "sales_v2"),
            ("FLOW_EXPIRING_DAYS", "7"),
        ]));

        assert_eq!(config.database_path, PathBuf::from("/var/lib/flow/sales.db"));
        assert_eq!(config.storage_key, "sales_v2");
        assert_eq!(config.expiring_window_days, 7);
        assert_eq!(config.store_options().storage_key, "sales_v2");
    }

    #[test]
    fn test_invalid_window_keeps_default() {
        let config = AppConfig::from_lookup(lookup(&[("FLOW_EXPIRING_DAYS", "-2")]));
        assert_eq!(config.expiring_window_days, 5);

        let config = AppConfig::from_lookup(lookup(&[("FLOW_EXPIRING_DAYS", "soon")]));
        assert_eq!(config.expiring_window_days, 5);
    }
}
