//! # Domain Types
//!
//! Core domain types used throughout IPTV Flow.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌──────────────────────┐  │
//! │  │    SaleInput    │   │      Sale       │   │   DashboardStats     │  │
//! │  │  ─────────────  │   │  ─────────────  │   │  ──────────────────  │  │
//! │  │  form payload   │──►│  id (UUID)      │──►│  derived, never      │  │
//! │  │  (create/edit)  │   │  cycle dates    │   │  persisted           │  │
//! │  │                 │   │  value / cost   │   │                      │  │
//! │  └─────────────────┘   │  base_* / count │   └──────────────────────┘  │
//! │                        └─────────────────┘                              │
//! │                                                                         │
//! │  SubscriptionStatus: Expired | ExpiringSoon | Active                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Persisted Shape
//! `Sale` serializes to the camelCase JSON record the dashboard has always
//! stored. `baseValue` / `baseCost` are omitted until the first renewal and
//! `renewalCount` is omitted while zero.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::{self, Money};
use crate::time;
use crate::EXPIRING_WINDOW_DAYS;

// =============================================================================
// Sale
// =============================================================================

/// One client's subscription sale, including every renewal since.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    /// Unique identifier (UUID v4). Never changes.
    pub id: String,

    pub client_name: String,

    /// Access username handed to the client.
    pub username: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Start of the current billing cycle.
    #[serde(with = "time::iso")]
    #[ts(as = "String")]
    pub purchase_date: NaiveDateTime,

    /// End of the current billing cycle; always `purchase_date + 30 days`.
    #[serde(with = "time::iso")]
    #[ts(as = "String")]
    pub expiry_date: NaiveDateTime,

    /// Cumulative revenue across all cycles.
    #[serde(with = "money::units")]
    #[ts(as = "f64")]
    pub value: Money,

    /// Cumulative cost across all cycles.
    #[serde(with = "money::units")]
    #[ts(as = "f64")]
    pub cost: Money,

    /// Per-cycle revenue increment, fixed by the first renewal.
    #[serde(
        default,
        with = "money::units::option",
        skip_serializing_if = "is_unset"
    )]
    #[ts(as = "Option<f64>")]
    pub base_value: Option<Money>,

    /// Per-cycle cost increment, fixed by the first renewal.
    #[serde(
        default,
        with = "money::units::option",
        skip_serializing_if = "is_unset"
    )]
    #[ts(as = "Option<f64>")]
    pub base_cost: Option<Money>,

    #[serde(default, skip_serializing_if = "is_zero")]
    pub renewal_count: u32,
}

fn is_zero(n: &u32) -> bool {
    *n == 0
}

fn is_unset(amount: &Option<Money>) -> bool {
    amount.is_none()
}

impl Sale {
    /// Revenue minus cost. May be negative.
    #[inline]
    pub fn profit(&self) -> Money {
        self.value - self.cost
    }

    /// Whole days until expiry at `now`.
    #[inline]
    pub fn days_remaining_at(&self, now: NaiveDateTime) -> i64 {
        time::days_between(self.expiry_date, now)
    }

    #[inline]
    pub fn status_at(&self, now: NaiveDateTime) -> SubscriptionStatus {
        SubscriptionStatus::from_days(self.days_remaining_at(now))
    }

    /// Percentage of the current cycle elapsed at `now`.
    #[inline]
    pub fn progress_at(&self, now: NaiveDateTime) -> f64 {
        time::cycle_progress(self.purchase_date, self.expiry_date, now)
    }

    /// Case-insensitive substring match on client name or username.
    ///
    /// An empty needle matches everything.
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        needle.is_empty()
            || self.client_name.to_lowercase().contains(&needle)
            || self.username.to_lowercase().contains(&needle)
    }
}

// =============================================================================
// Sale Input
// =============================================================================

/// The sale form payload used by create and edit.
///
/// `purchase_date` is kept as the raw string the form submitted; it is
/// validated and parsed by the lifecycle functions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleInput {
    pub client_name: String,
    pub username: String,
    #[serde(default)]
    pub password: Option<String>,
    pub purchase_date: String,
    #[serde(with = "money::units")]
    #[ts(as = "f64")]
    pub value: Money,
    #[serde(with = "money::units")]
    #[ts(as = "f64")]
    pub cost: Money,
}

impl SaleInput {
    /// Blank form for a new sale: purchase date `today`, value R$ 30, cost R$ 10.
    pub fn with_defaults(today: NaiveDate) -> Self {
        SaleInput {
            client_name: String::new(),
            username: String::new(),
            password: None,
            purchase_date: today.format("%Y-%m-%d").to_string(),
            value: Money::from_units(30),
            cost: Money::from_units(10),
        }
    }
}

/// Pre-fills the edit form from an existing sale.
impl From<&Sale> for SaleInput {
    fn from(sale: &Sale) -> Self {
        SaleInput {
            client_name: sale.client_name.clone(),
            username: sale.username.clone(),
            password: sale.password.clone(),
            purchase_date: time::format_iso(sale.purchase_date),
            value: sale.value,
            cost: sale.cost,
        }
    }
}

// =============================================================================
// Subscription Status
// =============================================================================

/// Badge state of a subscription, derived from days remaining.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    /// Expiry is in the past (`days < 0`).
    Expired,
    /// Expires within the window (`0 <= days <= 5` by default).
    ExpiringSoon,
    Active,
}

impl SubscriptionStatus {
    /// Classifies with the default 5-day window.
    ///
    /// ```rust
    /// use flow_core::SubscriptionStatus;
    ///
    /// assert_eq!(SubscriptionStatus::from_days(-1), SubscriptionStatus::Expired);
    /// assert_eq!(SubscriptionStatus::from_days(0), SubscriptionStatus::ExpiringSoon);
    /// assert_eq!(SubscriptionStatus::from_days(5), SubscriptionStatus::ExpiringSoon);
    /// assert_eq!(SubscriptionStatus::from_days(6), SubscriptionStatus::Active);
    /// ```
    pub fn from_days(days: i64) -> Self {
        Self::classify(days, EXPIRING_WINDOW_DAYS)
    }

    /// Classifies with a custom expiring window (in days).
    pub fn classify(days: i64, window: i64) -> Self {
        if days < 0 {
            SubscriptionStatus::Expired
        } else if days <= window {
            SubscriptionStatus::ExpiringSoon
        } else {
            SubscriptionStatus::Active
        }
    }

    #[inline]
    pub fn is_expiring(&self) -> bool {
        matches!(self, SubscriptionStatus::ExpiringSoon)
    }
}

// =============================================================================
// Dashboard Stats
// =============================================================================

/// Aggregates shown on the dashboard cards.
///
/// Always recomputed from the current collection; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Sum of `value`.
    #[serde(with = "money::units")]
    #[ts(as = "f64")]
    pub total_sales_value: Money,

    /// Sum of `value - cost`.
    #[serde(with = "money::units")]
    #[ts(as = "f64")]
    pub total_profit: Money,

    pub sales_count: u32,

    /// Sales with `0 <= days remaining <= window`.
    pub expiring_count: u32,
}

impl DashboardStats {
    /// Folds `sales` into stats at `now` with the given expiring window.
    pub fn compute<'a>(
        sales: impl IntoIterator<Item = &'a Sale>,
        now: NaiveDateTime,
        window: i64,
    ) -> Self {
        sales
            .into_iter()
            .fold(DashboardStats::default(), |acc, sale| {
                let status = SubscriptionStatus::classify(sale.days_remaining_at(now), window);
                DashboardStats {
                    total_sales_value: acc.total_sales_value + sale.value,
                    total_profit: acc.total_profit + sale.profit(),
                    sales_count: acc.sales_count + 1,
                    expiring_count: acc.expiring_count + u32::from(status.is_expiring()),
                }
            })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
