//! # flow-db: Storage Layer for IPTV Flow
//!
//! This crate persists the sales collection and applies the flow-core rules
//! to it. It uses SQLite via sqlx for async access.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        IPTV Flow Data Flow                              │
//! │                                                                         │
//! │  Dashboard action (renew, delete, search)                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     flow-db (THIS CRATE)                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │  SalesStore   │    │  KeyValueRepo │    │  Migrations  │  │   │
//! │  │   │  (store.rs)   │───►│   (kv.rs)     │    │  (embedded)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ create/renew  │    │ get / set     │    │ 001_key_     │  │   │
//! │  │   │ list/stats    │    │ whole JSON    │    │ value_store  │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   key_value_store['iptv_sales'] = [ {...}, {...} ]             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`repository`] - Key/value slot access
//! - [`store`] - The sales collection and its lifecycle operations
//! - [`sync`] - Per-sale sync capability
//! - [`config`] - Environment-driven settings
//! - [`error`] - Storage and store error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use flow_db::{AppConfig, Database, SalesStore};
//!
//! let config = AppConfig::from_env();
//! let db = Database::new(config.db_config()).await?;
//! let mut store = SalesStore::open(&db, config.store_options()).await;
//!
//! let sale = store.create(input).await?;
//! store.renew(&sale.id).await?;
//! let stats = store.stats();
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod store;
pub mod sync;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{AppConfig, DEFAULT_STORAGE_KEY};
pub use error::{DbError, DbResult, StoreError, StoreResult};
pub use pool::{Database, DbConfig};
pub use repository::kv::KeyValueRepository;
pub use store::{SalesStore, StoreOptions};
pub use sync::{DisabledSyncClient, LocalSyncClient, SyncClient, SyncOutcome};
