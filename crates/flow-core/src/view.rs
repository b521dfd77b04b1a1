//! # Row View
//!
//! Display values derived for one table row. Nothing here is stored.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::{self, CurrencyFormat, Money};
use crate::time;
use crate::types::{Sale, SubscriptionStatus};

/// A sale plus everything the sales table shows about it at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleRow {
    pub sale: Sale,
    pub days_remaining: i64,
    pub status: SubscriptionStatus,
    /// Cycle elapsed, 0 to 100.
    pub progress: f64,
    #[serde(with = "money::units")]
    #[ts(as = "f64")]
    pub profit: Money,
    pub value_display: String,
    pub profit_display: String,
    pub purchase_date_display: String,
    pub expiry_date_display: String,
    /// `"2ª Renovação"` once renewed, otherwise `None`.
    pub renewal_label: Option<String>,
}

impl SaleRow {
    pub fn build(sale: &Sale, now: NaiveDateTime, window: i64, format: &CurrencyFormat) -> Self {
        let days_remaining = sale.days_remaining_at(now);
        let profit = sale.profit();

        SaleRow {
            days_remaining,
            status: SubscriptionStatus::classify(days_remaining, window),
            progress: sale.progress_at(now),
            profit,
            value_display: format.format(sale.value),
            profit_display: format.format(profit),
            purchase_date_display: time::display_date(sale.purchase_date),
            expiry_date_display: time::display_date(sale.expiry_date),
            renewal_label: renewal_label(sale.renewal_count),
            sale: sale.clone(),
        }
    }
}

/// Ordinal renewal badge text, e.g. `"1ª Renovação"`.
pub fn renewal_label(renewal_count: u32) -> Option<String> {
    (renewal_count > 0).then(|| format!("{renewal_count}ª Renovação"))
}
