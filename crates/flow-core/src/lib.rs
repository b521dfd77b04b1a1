//! # flow-core: Pure Subscription Logic for IPTV Flow
//!
//! This crate holds every rule of the sales tracker as pure functions with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        IPTV Flow Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Dashboard (frontend)                         │   │
//! │  │    Stats cards ──► Search ──► Sales table ──► Sale modal        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    flow-db::SalesStore                          │   │
//! │  │    create, edit, renew, delete, list, stats                     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ flow-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   time    │  │ lifecycle │  │   │
//! │  │   │   Sale    │  │   Money   │  │  expiry   │  │  create   │  │   │
//! │  │   │   Stats   │  │  BRL fmt  │  │  progress │  │  renew    │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO LOGGING • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Sale, SaleInput, SubscriptionStatus, DashboardStats
//! - [`money`] - Integer-cent Money and the pt-BR currency format
//! - [`time`] - ISO parsing, expiry, days remaining, cycle progress
//! - [`lifecycle`] - create / edit / renew rules
//! - [`validation`] - Sale form validation
//! - [`view`] - Per-row display values
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use flow_core::lifecycle::{create_sale, renew_sale_at};
//! use flow_core::time::{format_iso, parse_iso};
//! use flow_core::{Money, SaleInput};
//!
//! let sale = create_sale(SaleInput {
//!     client_name: "Carlos".into(),
//!     username: "premium_01".into(),
//!     password: None,
//!     purchase_date: "2024-01-01".into(),
//!     value: Money::from_units(30),
//!     cost: Money::from_units(10),
//! })
//! .unwrap();
//!
//! // Still active on the 15th: the next cycle starts at the old expiry.
//! let renewed = renew_sale_at(&sale, parse_iso("2024-01-15").unwrap());
//! assert_eq!(format_iso(renewed.purchase_date), "2024-01-31T00:00:00");
//! assert_eq!(renewed.value, Money::from_units(60));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod lifecycle;
pub mod money;
pub mod time;
pub mod types;
pub mod validation;
pub mod view;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ParseError, ValidationError};
pub use money::{format_currency, CurrencyFormat, Money};
pub use types::*;
pub use view::SaleRow;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Length of one billing cycle in days.
pub const CYCLE_DAYS: i64 = 30;

/// A sale is "expiring" when `0 <= days remaining <= EXPIRING_WINDOW_DAYS`.
///
/// The same window drives the row badge and the dashboard's expiring count.
pub const EXPIRING_WINDOW_DAYS: i64 = 5;
