//! # Client Sync
//!
//! The dashboard has a per-row "sync client" button. There is no panel API
//! behind it yet, so the capability is a trait with a local implementation
//! that succeeds immediately.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SalesStore::sync_one(id, &client)                                      │
//! │       │                                                                 │
//! │       ├── id unknown?  → StoreError::NotFound                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  client.sync_one(&sale) → SyncOutcome                                  │
//! │       │                                                                 │
//! │       ├── LocalSyncClient: Synced { at: now }  (no I/O)                │
//! │       └── future panel client: real push                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDateTime;
use flow_core::{time, Sale};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Result of pushing one sale's credentials to an external panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SyncOutcome {
    /// The panel accepted the sale.
    Synced { at: NaiveDateTime },
    /// The client declined to push (e.g. sync disabled).
    Skipped { reason: String },
}

impl SyncOutcome {
    pub fn is_synced(&self) -> bool {
        matches!(self, SyncOutcome::Synced { .. })
    }
}

/// Capability to push one sale to an external system.
pub trait SyncClient {
    fn sync_one(&self, sale: &Sale) -> SyncOutcome;
}

/// Sync client that performs no I/O and reports success.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalSyncClient;

impl SyncClient for LocalSyncClient {
    fn sync_one(&self, sale: &Sale) -> SyncOutcome {
        debug!(id = %sale.id, username = %sale.username, "Local sync (no-op)");
        SyncOutcome::Synced { at: time::now() }
    }
}

/// Sync client for offline mode: never pushes.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledSyncClient;

impl SyncClient for DisabledSyncClient {
    fn sync_one(&self, _sale: &Sale) -> SyncOutcome {
        SyncOutcome::Skipped {
            reason: "sync disabled".to_string(),
        }
    }
}
