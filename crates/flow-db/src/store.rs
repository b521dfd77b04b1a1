//! # Sales Store
//!
//! Owns the sales collection: loads it at startup, applies lifecycle rules
//! from flow-core, and writes the whole collection back after every change.
//!
//! ## Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Sales Store Operations                               │
//! │                                                                         │
//! │  Dashboard Action        Store Method            Collection Change      │
//! │  ────────────────        ────────────            ─────────────────      │
//! │                                                                         │
//! │  Save new sale ─────────► create(input) ───────► push(sale)            │
//! │  Save edited sale ──────► edit(id, input) ─────► sales[i] = edited     │
//! │  Click Renew ───────────► renew(id) ───────────► sales[i] = renewed    │
//! │  Confirm Delete ────────► delete(id) ──────────► remove(i)             │
//! │                                                                         │
//! │  Search box ────────────► list(filter) ────────► (read only)           │
//! │  Stats cards ───────────► stats() ─────────────► (read only)           │
//! │                                                                         │
//! │  Every write: build next collection → save whole JSON → commit.        │
//! │  A failed save leaves memory untouched, so memory never runs ahead     │
//! │  of storage.                                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Startup
//! - Key missing → empty collection
//! - Key unreadable or JSON corrupt → `open` logs and starts empty;
//!   `open_strict` returns the error instead

use chrono::NaiveDateTime;
use flow_core::lifecycle::{create_sale, edit_sale, renew_sale_at};
use flow_core::{time, CurrencyFormat, DashboardStats, Sale, SaleInput, SaleRow};
use tracing::{debug, error, info, warn};

use crate::config::DEFAULT_STORAGE_KEY;
use crate::error::{StoreError, StoreResult};
use crate::pool::Database;
use crate::repository::kv::KeyValueRepository;
use crate::sync::{SyncClient, SyncOutcome};

/// Settings the store needs from the app config.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreOptions {
    pub storage_key: String,
    pub expiring_window_days: i64,
    pub currency: CurrencyFormat,
}

impl Default for StoreOptions {
    fn default() -> Self {
        StoreOptions {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            expiring_window_days: flow_core::EXPIRING_WINDOW_DAYS,
            currency: CurrencyFormat::default(),
        }
    }
}

/// The in-memory sales collection and its persistence.
///
/// ## Invariants
/// - Sales keep insertion order (new sales are appended)
/// - Ids are unique
/// - After every successful mutation, storage holds exactly `sales()`
#[derive(Debug)]
pub struct SalesStore {
    storage: KeyValueRepository,
    options: StoreOptions,
    sales: Vec<Sale>,
}

impl SalesStore {
    /// Opens the store, failing open on unreadable or corrupt data.
    ///
    /// Data loss is preferred over refusing to start: the next successful
    /// save overwrites whatever was stored.
    pub async fn open(db: &Database, options: StoreOptions) -> Self {
        let mut store = SalesStore::empty(db, options);

        if let Err(e) = store.load().await {
            warn!(
                key = %store.options.storage_key,
                error = %e,
                "Could not load sales; starting with an empty collection"
            );
        }

        store
    }

    /// Opens the store, returning any load error to the caller.
    pub async fn open_strict(db: &Database, options: StoreOptions) -> StoreResult<Self> {
        let mut store = SalesStore::empty(db, options);
        store.load().await?;
        Ok(store)
    }

    fn empty(db: &Database, options: StoreOptions) -> Self {
        SalesStore {
            storage: db.key_values(),
            options,
            sales: Vec::new(),
        }
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Replaces the in-memory collection with what storage holds.
    ///
    /// On error the in-memory collection is left as it was.
    pub async fn load(&mut self) -> StoreResult<()> {
        let raw = self.storage.get(&self.options.storage_key).await?;

        let sales = match raw {
            Some(json) => serde_json::from_str::<Vec<Sale>>(&json).map_err(StoreError::Corrupt)?,
            None => Vec::new(),
        };

        info!(
            key = %self.options.storage_key,
            count = sales.len(),
            "Sales loaded"
        );
        self.sales = sales;
        Ok(())
    }

    /// Writes the current collection to storage.
    pub async fn save(&self) -> StoreResult<()> {
        self.persist(&self.sales).await
    }

    async fn persist(&self, sales: &[Sale]) -> StoreResult<()> {
        let json = serde_json::to_string(sales).map_err(StoreError::Encode)?;

        if let Err(e) = self.storage.set(&self.options.storage_key, &json).await {
            error!(
                key = %self.options.storage_key,
                error = %e,
                "Failed to persist sales"
            );
            return Err(e.into());
        }

        debug!(count = sales.len(), "Sales persisted");
        Ok(())
    }

    /// Persists `next` and, only if that worked, makes it the collection.
    async fn commit(&mut self, next: Vec<Sale>) -> StoreResult<()> {
        self.persist(&next).await?;
        self.sales = next;
        Ok(())
    }

    fn position(&self, id: &str) -> StoreResult<usize> {
        self.sales
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| StoreError::not_found(id))
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Creates a sale from the form and appends it.
    pub async fn create(&mut self, input: SaleInput) -> StoreResult<Sale> {
        let sale = create_sale(input)?;

        let mut next = self.sales.clone();
        next.push(sale.clone());
        self.commit(next).await?;

        info!(id = %sale.id, client = %sale.client_name, "Sale created");
        Ok(sale)
    }

    /// Replaces the editable fields of sale `id`.
    pub async fn edit(&mut self, id: &str, input: SaleInput) -> StoreResult<Sale> {
        let index = self.position(id)?;
        let edited = edit_sale(&self.sales[index], input)?;

        let mut next = self.sales.clone();
        next[index] = edited.clone();
        self.commit(next).await?;

        info!(id = %edited.id, "Sale updated");
        Ok(edited)
    }

    /// Renews sale `id` relative to the wall clock.
    pub async fn renew(&mut self, id: &str) -> StoreResult<Sale> {
        self.renew_at(id, time::now()).await
    }

    /// Renews sale `id` at `now`.
    pub async fn renew_at(&mut self, id: &str, now: NaiveDateTime) -> StoreResult<Sale> {
        let index = self.position(id)?;
        let renewed = renew_sale_at(&self.sales[index], now);

        let mut next = self.sales.clone();
        next[index] = renewed.clone();
        self.commit(next).await?;

        info!(
            id = %renewed.id,
            renewal_count = renewed.renewal_count,
            expiry = %time::format_iso(renewed.expiry_date),
            "Sale renewed"
        );
        Ok(renewed)
    }

    /// Removes sale `id` and returns it.
    pub async fn delete(&mut self, id: &str) -> StoreResult<Sale> {
        let index = self.position(id)?;

        let mut next = self.sales.clone();
        let removed = next.remove(index);
        self.commit(next).await?;

        info!(id = %removed.id, "Sale deleted");
        Ok(removed)
    }

    /// Pushes sale `id` through `client`. Does not modify the collection.
    pub fn sync_one(&self, id: &str, client: &impl SyncClient) -> StoreResult<SyncOutcome> {
        let index = self.position(id)?;
        let outcome = client.sync_one(&self.sales[index]);

        info!(id = %id, synced = outcome.is_synced(), "Sale sync finished");
        Ok(outcome)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// All sales in insertion order.
    pub fn sales(&self) -> &[Sale] {
        &self.sales
    }

    pub fn get(&self, id: &str) -> Option<&Sale> {
        self.sales.iter().find(|s| s.id == id)
    }

    pub fn len(&self) -> usize {
        self.sales.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sales.is_empty()
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    /// Sales whose client name or username contains `filter`
    /// (case-insensitive), soonest expiry first.
    ///
    /// Equal expiry dates keep insertion order.
    pub fn list(&self, filter: &str) -> Vec<Sale> {
        let mut matching: Vec<Sale> = self
            .sales
            .iter()
            .filter(|s| s.matches(filter))
            .cloned()
            .collect();

        // sort_by_key is stable
        matching.sort_by_key(|s| s.expiry_date);
        matching
    }

    /// [`SalesStore::list`] with per-row display values at `now`.
    pub fn rows_at(&self, filter: &str, now: NaiveDateTime) -> Vec<SaleRow> {
        self.list(filter)
            .iter()
            .map(|s| {
                SaleRow::build(
                    s,
                    now,
                    self.options.expiring_window_days,
                    &self.options.currency,
                )
            })
            .collect()
    }

    pub fn rows(&self, filter: &str) -> Vec<SaleRow> {
        self.rows_at(filter, time::now())
    }

    /// Dashboard aggregates at `now`.
    pub fn stats_at(&self, now: NaiveDateTime) -> DashboardStats {
        DashboardStats::compute(&self.sales, now, self.options.expiring_window_days)
    }

    /// Dashboard aggregates relative to the wall clock.
    pub fn stats(&self) -> DashboardStats {
        self.stats_at(time::now())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::{DisabledSyncClient, LocalSyncClient};
    use crate::DbConfig;
    use flow_core::time::{format_iso, parse_iso};
    use flow_core::{CoreError, Money, SubscriptionStatus, ValidationError};

    fn input(client: &str, username: &str, purchase: &str, value: i64, cost: i64) -> SaleInput {
        SaleInput {
            client_name: client.to_string(),
            username: username.to_string(),
            password: Some("123456".to_string()),
            purchase_date: purchase.to_string(),
            value: Money::from_units(value),
            cost: Money::from_units(cost),
        }
    }

    fn at(s: &str) -> NaiveDateTime {
        parse_iso(s).unwrap()
    }

    async fn setup() -> (Database, SalesStore) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let store = SalesStore::open_strict(&db, StoreOptions::default())
            .await
            .unwrap();
        (db, store)
    }

    async fn stored(db: &Database) -> Vec<Sale> {
        let raw = db.key_values().get(DEFAULT_STORAGE_KEY).await.unwrap().unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    #[tokio::test]
    async fn test_open_empty() {
        let (_db, store) = setup().await;
        assert!(store.is_empty());
        assert_eq!(store.stats_at(at("2024-01-01")), DashboardStats::default());
    }

    #[tokio::test]
    async fn test_create_persists_whole_collection() {
        let (db, mut store) = setup().await;

        let a = store.create(input("Ana", "ana_tv", "2024-01-01", 30, 10)).await.unwrap();
        let b = store.create(input("Bruno", "bruno_hd", "2024-01-05", 50, 20)).await.unwrap();

        assert_eq!(format_iso(a.expiry_date), "2024-01-31T00:00:00");
        assert_eq!(store.len(), 2);
        assert_eq!(stored(&db).await, vec![a, b]);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_input() {
        let (db, mut store) = setup().await;

        let err = store
            .create(input("Ana", "", "2024-01-01", 30, 10))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Core(CoreError::Validation(ValidationError::Required { .. }))
        ));
        assert!(store.is_empty());
        assert_eq!(db.key_values().get(DEFAULT_STORAGE_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_reopen_sees_saved_sales() {
        let (db, mut store) = setup().await;
        let sale = store.create(input("Ana", "ana_tv", "2024-01-01", 30, 10)).await.unwrap();
        let renewed = store.renew_at(&sale.id, at("2024-01-15")).await.unwrap();

        let reopened = SalesStore::open_strict(&db, StoreOptions::default())
            .await
            .unwrap();
        assert_eq!(reopened.sales(), &[renewed]);
    }

    #[tokio::test]
    async fn test_renew_scenarios() {
        let (db, mut store) = setup().await;
        let sale = store.create(input("Ana", "ana_tv", "2024-01-01", 30, 10)).await.unwrap();

        let renewed = store.renew_at(&sale.id, at("2024-01-15")).await.unwrap();
        assert_eq!(format_iso(renewed.purchase_date), "2024-01-31T00:00:00");
        assert_eq!(renewed.value, Money::from_units(60));
        assert_eq!(renewed.cost, Money::from_units(20));
        assert_eq!(renewed.base_value, Some(Money::from_units(30)));
        assert_eq!(renewed.base_cost, Some(Money::from_units(10)));
        assert_eq!(renewed.renewal_count, 1);

        let lapsed = store.renew_at(&sale.id, at("2024-03-10")).await.unwrap();
        assert_eq!(format_iso(lapsed.purchase_date), "2024-03-10T00:00:00");
        assert_eq!(format_iso(lapsed.expiry_date), "2024-04-09T00:00:00");
        assert_eq!(lapsed.value, Money::from_units(90));
        assert_eq!(lapsed.renewal_count, 2);

        let json = db.key_values().get(DEFAULT_STORAGE_KEY).await.unwrap().unwrap();
        assert!(json.contains(r#""baseValue":30.0"#));
        assert!(json.contains(r#""renewalCount":2"#));
    }

    #[tokio::test]
    async fn test_edit_keeps_id_and_renewal_state() {
        let (db, mut store) = setup().await;
        let sale = store.create(input("Ana", "ana_tv", "2024-01-01", 30, 10)).await.unwrap();
        store.renew_at(&sale.id, at("2024-01-15")).await.unwrap();

        let edited = store
            .edit(&sale.id, input("Ana Paula", "ana_tv", "2024-02-01", 60, 20))
            .await
            .unwrap();

        assert_eq!(edited.id, sale.id);
        assert_eq!(edited.client_name, "Ana Paula");
        assert_eq!(format_iso(edited.expiry_date), "2024-03-02T00:00:00");
        assert_eq!(edited.renewal_count, 1);
        assert_eq!(stored(&db).await, vec![edited]);
    }

    #[tokio::test]
    async fn test_delete() {
        let (db, mut store) = setup().await;
        let a = store.create(input("Ana", "ana_tv", "2024-01-01", 30, 10)).await.unwrap();
        let b = store.create(input("Bruno", "bruno_hd", "2024-01-05", 50, 20)).await.unwrap();

        let removed = store.delete(&a.id).await.unwrap();
        assert_eq!(removed, a);
        assert_eq!(store.sales(), &[b.clone()]);
        assert_eq!(stored(&db).await, vec![b]);
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found_and_changes_nothing() {
        let (db, mut store) = setup().await;
        let sale = store.create(input("Ana", "ana_tv", "2024-01-01", 30, 10)).await.unwrap();

        assert!(matches!(
            store.delete("missing").await,
            Err(StoreError::NotFound { ref id }) if id == "missing"
        ));
        assert!(matches!(
            store.renew("missing").await,
            Err(StoreError::NotFound { .. })
        ));
        assert!(matches!(
            store.edit("missing", input("X", "y", "2024-01-01", 1, 1)).await,
            Err(StoreError::NotFound { .. })
        ));
        assert!(matches!(
            store.sync_one("missing", &LocalSyncClient),
            Err(StoreError::NotFound { .. })
        ));

        assert_eq!(store.sales(), &[sale.clone()]);
        assert_eq!(stored(&db).await, vec![sale]);
    }

    #[tokio::test]
    async fn test_list_filters_and_sorts_by_expiry() {
        let (_db, mut store) = setup().await;
        let late = store.create(input("Carlos Oliveira", "premium_01", "2024-02-01", 30, 10)).await.unwrap();
        let early = store.create(input("Ana", "ana_tv", "2024-01-01", 30, 10)).await.unwrap();
        let tie = store.create(input("Bruno", "PREMIUM_02", "2024-02-01", 30, 10)).await.unwrap();

        let all: Vec<String> = store.list("").into_iter().map(|s| s.id).collect();
        assert_eq!(all, vec![early.id.clone(), late.id.clone(), tie.id.clone()]);

        let premium: Vec<String> = store.list("Premium").into_iter().map(|s| s.id).collect();
        assert_eq!(premium, vec![late.id.clone(), tie.id.clone()]);

        let by_client: Vec<String> = store.list("oliv").into_iter().map(|s| s.id).collect();
        assert_eq!(by_client, vec![late.id]);

        assert!(store.list("nobody").is_empty());
    }

    #[tokio::test]
    async fn test_stats() {
        let (_db, mut store) = setup().await;
        store.create(input("Ana", "ana_tv", "2024-01-01", 30, 10)).await.unwrap();
        store.create(input("Bruno", "bruno_hd", "2024-01-20", 50, 20)).await.unwrap();

        // Ana expires 01-31 (3 days), Bruno 02-19 (22 days)
        let stats = store.stats_at(at("2024-01-28"));
        assert_eq!(stats.total_sales_value, Money::from_units(80));
        assert_eq!(stats.total_profit, Money::from_units(50));
        assert_eq!(stats.sales_count, 2);
        assert_eq!(stats.expiring_count, 1);

        // Ana expired, Bruno in 5 days
        let stats = store.stats_at(at("2024-02-14"));
        assert_eq!(stats.expiring_count, 1);
    }

    #[tokio::test]
    async fn test_rows() {
        let (_db, mut store) = setup().await;
        store.create(input("Ana", "ana_tv", "2024-01-01", 30, 10)).await.unwrap();

        let rows = store.rows_at("ana", at("2024-02-10"));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, SubscriptionStatus::Expired);
        assert_eq!(rows[0].days_remaining, -10);
        assert_eq!(rows[0].progress, 100.0);
        assert_eq!(rows[0].profit_display, "R$\u{a0}20,00");
    }

    #[tokio::test]
    async fn test_corrupt_storage_fails_open() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.key_values().set(DEFAULT_STORAGE_KEY, "{not json").await.unwrap();

        assert!(matches!(
            SalesStore::open_strict(&db, StoreOptions::default()).await,
            Err(StoreError::Corrupt(_))
        ));

        let mut store = SalesStore::open(&db, StoreOptions::default()).await;
        assert!(store.is_empty());

        // First save replaces the corrupt document.
        store.create(input("Ana", "ana_tv", "2024-01-01", 30, 10)).await.unwrap();
        assert_eq!(stored(&db).await.len(), 1);
    }

    #[tokio::test]
    async fn test_bad_date_in_storage_is_corrupt() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let raw = r#"[{"id":"x","clientName":"Ana","username":"ana","purchaseDate":"yesterday","expiryDate":"2024-01-31T00:00:00","value":30,"cost":10}]"#;
        db.key_values().set(DEFAULT_STORAGE_KEY, raw).await.unwrap();

        assert!(matches!(
            SalesStore::open_strict(&db, StoreOptions::default()).await,
            Err(StoreError::Corrupt(_))
        ));
    }

    #[tokio::test]
    async fn test_out_of_range_amount_in_storage_is_corrupt() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let raw = r#"[{"id":"x","clientName":"Ana","username":"ana","purchaseDate":"2024-01-01T00:00:00","expiryDate":"2024-01-31T00:00:00","value":1e300,"cost":10}]"#;
        db.key_values().set(DEFAULT_STORAGE_KEY, raw).await.unwrap();

        assert!(matches!(
            SalesStore::open_strict(&db, StoreOptions::default()).await,
            Err(StoreError::Corrupt(_))
        ));
        assert!(SalesStore::open(&db, StoreOptions::default()).await.is_empty());
    }

    #[tokio::test]
    async fn test_failed_write_keeps_memory_consistent() {
        let (db, mut store) = setup().await;
        let sale = store.create(input("Ana", "ana_tv", "2024-01-01", 30, 10)).await.unwrap();

        db.close().await;

        let err = store.renew_at(&sale.id, at("2024-01-15")).await.unwrap_err();
        assert!(matches!(err, StoreError::Storage(_)));
        assert_eq!(store.get(&sale.id), Some(&sale));

        let err = store
            .create(input("Bruno", "bruno_hd", "2024-01-05", 50, 20))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Storage(_)));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_unreadable_storage_fails_open() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.close().await;

        let store = SalesStore::open(&db, StoreOptions::default()).await;
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_custom_storage_key() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let options = StoreOptions {
            storage_key: "sales_v2".to_string(),
            ..StoreOptions::default()
        };
        let mut store = SalesStore::open_strict(&db, options).await.unwrap();
        store.create(input("Ana", "ana_tv", "2024-01-01", 30, 10)).await.unwrap();

        assert!(db.key_values().get("sales_v2").await.unwrap().is_some());
        assert_eq!(db.key_values().get(DEFAULT_STORAGE_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_sync_one() {
        let (_db, mut store) = setup().await;
        let sale = store.create(input("Ana", "ana_tv", "2024-01-01", 30, 10)).await.unwrap();

        assert!(store.sync_one(&sale.id, &LocalSyncClient).unwrap().is_synced());
        assert!(!store.sync_one(&sale.id, &DisabledSyncClient).unwrap().is_synced());
        assert_eq!(store.sales(), &[sale]);
    }

    #[tokio::test]
    async fn test_load_picks_up_external_changes() {
        let (db, mut store) = setup().await;
        store.create(input("Ana", "ana_tv", "2024-01-01", 30, 10)).await.unwrap();

        db.key_values().set(DEFAULT_STORAGE_KEY, "[]").await.unwrap();
        store.load().await.unwrap();
        assert!(store.is_empty());
    }
}
