//! # Sale Lifecycle
//!
//! Create, edit and renew rules for a [`Sale`]. Deletion has no rule of its
//! own; the store simply drops the record.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sale Lifecycle                                    │
//! │                                                                         │
//! │  1. CREATE                                                             │
//! │     └── create_sale(input) → Sale { renewal_count: 0, base_*: None }   │
//! │                                                                         │
//! │  2. EDIT (any number of times)                                         │
//! │     └── edit_sale(&sale, input) → same id, expiry recomputed           │
//! │                                                                         │
//! │  3. RENEW (any number of times)                                        │
//! │     └── renew_sale(&sale) → next cycle, totals += base increment       │
//! │                                                                         │
//! │  4. DELETE                                                             │
//! │     └── SalesStore::delete(id) → gone (no soft delete)                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Renewal Accumulation
//! ```text
//!   cycle         value   base_value   renewal_count
//!   ─────         ─────   ──────────   ─────────────
//!   created         30      None            0
//!   renew #1        60       30             1      ← base fixed from value
//!   renew #2        90       30             2      ← NOT 60 + 60
//!   renew #3       120       30             3
//! ```

use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::error::CoreResult;
use crate::time;
use crate::types::{Sale, SaleInput};
use crate::validation::validate_sale_input;

/// Generates a fresh sale id.
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

/// Creates a new sale from the form.
///
/// ## Errors
/// - `CoreError::Validation` if client name, username or purchase date is blank
/// - `CoreError::Parse` if the purchase date is not ISO-8601
///
/// ```rust
/// use flow_core::lifecycle::create_sale;
/// use flow_core::{Money, SaleInput};
///
/// let sale = create_sale(SaleInput {
///     client_name: "Carlos".into(),
///     username: "premium_01".into(),
///     password: None,
///     purchase_date: "2024-01-01".into(),
///     value: Money::from_units(30),
///     cost: Money::from_units(10),
/// })
/// .unwrap();
///
/// assert_eq!(flow_core::time::format_iso(sale.expiry_date), "2024-01-31T00:00:00");
/// assert_eq!(sale.renewal_count, 0);
/// ```
pub fn create_sale(input: SaleInput) -> CoreResult<Sale> {
    let valid = validate_sale_input(&input)?;

    Ok(Sale {
        id: generate_id(),
        client_name: valid.client_name,
        username: valid.username,
        password: valid.password,
        purchase_date: valid.purchase_date,
        expiry_date: time::expiry_for(valid.purchase_date),
        value: input.value,
        cost: input.cost,
        base_value: None,
        base_cost: None,
        renewal_count: 0,
    })
}

/// Replaces the editable fields of `existing` with `input`.
///
/// The id, renewal count and base increments are carried over untouched;
/// expiry is recomputed from the (possibly new) purchase date.
pub fn edit_sale(existing: &Sale, input: SaleInput) -> CoreResult<Sale> {
    let valid = validate_sale_input(&input)?;

    Ok(Sale {
        id: existing.id.clone(),
        client_name: valid.client_name,
        username: valid.username,
        password: valid.password,
        purchase_date: valid.purchase_date,
        expiry_date: time::expiry_for(valid.purchase_date),
        value: input.value,
        cost: input.cost,
        base_value: existing.base_value,
        base_cost: existing.base_cost,
        renewal_count: existing.renewal_count,
    })
}

/// Renews `existing` for one more cycle at `now`.
///
/// ## Rules
/// 1. Still active (`expiry > now`): the new cycle starts at the old expiry.
///    Lapsed: the new cycle starts at `now`.
/// 2. The increment is `base_value` if set, else the current `value`
///    (first renewal). Cost follows the same rule independently.
/// 3. Totals grow by the increment; the increments are stored as
///    `base_value` / `base_cost` so later renewals never compound.
pub fn renew_sale_at(existing: &Sale, now: NaiveDateTime) -> Sale {
    let base_date = if existing.expiry_date > now {
        existing.expiry_date
    } else {
        time::truncate_to_seconds(now)
    };

    let value_increment = existing.base_value.unwrap_or(existing.value);
    let cost_increment = existing.base_cost.unwrap_or(existing.cost);

    Sale {
        purchase_date: base_date,
        expiry_date: time::expiry_for(base_date),
        value: existing.value + value_increment,
        cost: existing.cost + cost_increment,
        base_value: Some(value_increment),
        base_cost: Some(cost_increment),
        renewal_count: existing.renewal_count.saturating_add(1),
        ..existing.clone()
    }
}

/// Renews `existing` relative to the wall clock.
pub fn renew_sale(existing: &Sale) -> Sale {
    renew_sale_at(existing, time::now())
}

// =============================================================================
// Unit Tests
// =============================================================================
