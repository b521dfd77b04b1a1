//! # Money Module
//!
//! Provides the `Money` type for sale value, cost and profit, plus the
//! pt-BR currency formatter used by the dashboard.
//!
//! ## Integer Cents In Memory, Currency Units On Disk
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Persisted JSON            In memory               Display              │
//! │  ───────────────           ─────────               ───────              │
//! │  "value": 30.5     ──►     Money(3050)     ──►     "R$ 30,50"           │
//! │                                                                         │
//! │  Renewals add the base increment over and over. Doing that in f64      │
//! │  drifts (0.1 + 0.2); doing it in cents does not.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use flow_core::money::{format_currency, Money};
//!
//! let value = Money::from_cents(3000);
//! let renewed = value + value;
//! assert_eq!(renewed.cents(), 6000);
//! assert_eq!(format_currency(renewed), "R$\u{a0}60,00");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in cents (centavos for BRL).
///
/// - **i64 (signed)**: profit can be negative when cost exceeds value
/// - **Saturating**: `+` and `-` clamp at the i64 bounds instead of
///   overflowing
/// - **Serde**: the bare type serializes as cents; `Sale` and
///   `DashboardStats` fields go through [`units`] to keep the persisted
///   currency-unit shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Largest magnitude accepted from a decimal amount: 10 trillion units.
    pub const MAX_DECIMAL_CENTS: i64 = 1_000_000_000_000_000;

    /// Creates a Money value from cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole currency units.
    ///
    /// ```rust
    /// use flow_core::money::Money;
    ///
    /// assert_eq!(Money::from_units(30).cents(), 3000);
    /// ```
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Money(units * 100)
    }

    /// Converts a decimal currency amount (as stored in JSON) to cents,
    /// rounding half away from zero.
    ///
    /// This is the only float entry point and exists for reading the
    /// persisted collection and form input.
    ///
    /// ```rust
    /// use flow_core::money::Money;
    ///
    /// assert_eq!(Money::from_decimal(10.99).cents(), 1099);
    /// assert_eq!(Money::from_decimal(-5.5).cents(), -550);
    /// ```
    pub fn from_decimal(amount: f64) -> Self {
        Money((amount * 100.0).round() as i64)
    }

    /// Like [`Money::from_decimal`], but `None` for non-finite amounts and
    /// magnitudes above [`Money::MAX_DECIMAL_CENTS`].
    ///
    /// ```rust
    /// use flow_core::money::Money;
    ///
    /// assert_eq!(Money::try_from_decimal(30.5), Some(Money::from_cents(3050)));
    /// assert_eq!(Money::try_from_decimal(1e300), None);
    /// assert_eq!(Money::try_from_decimal(f64::NAN), None);
    /// ```
    pub fn try_from_decimal(amount: f64) -> Option<Self> {
        let cents = (amount * 100.0).round();
        if !cents.is_finite() || cents.abs() > Self::MAX_DECIMAL_CENTS as f64 {
            return None;
        }
        Some(Money(cents as i64))
    }

    /// Addition that reports overflow instead of clamping.
    #[inline]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the value as decimal currency units (for serialization only).
    #[inline]
    pub fn to_decimal(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Formats with the given currency format.
    pub fn format(&self, format: &CurrencyFormat) -> String {
        format.format(*self)
    }
}

/// Display uses the default pt-BR BRL format.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&CurrencyFormat::default().format(*self))
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        *self = *self - other;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Currency Format
// =============================================================================

/// Locale rules for rendering a `Money` value.
///
/// Only one locale is supported at a time; the default is pt-BR / BRL,
/// matching `Intl.NumberFormat('pt-BR', { style: 'currency', currency: 'BRL' })`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyFormat {
    /// Currency symbol, e.g. "R$".
    pub symbol: String,

    /// Separator between symbol and digits (pt-BR uses a no-break space).
    pub symbol_separator: String,

    /// Digit-group separator.
    pub thousands_separator: char,

    /// Separator before the two cent digits.
    pub decimal_separator: char,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        CurrencyFormat {
            symbol: "R$".to_string(),
            symbol_separator: "\u{a0}".to_string(),
            thousands_separator: '.',
            decimal_separator: ',',
        }
    }
}

impl CurrencyFormat {
    /// Renders `amount`, e.g. `-R$ 1.234,56`.
    pub fn format(&self, amount: Money) -> String {
        let cents = amount.cents();
        let abs = cents.unsigned_abs();
        let whole = (abs / 100).to_string();
        let frac = abs % 100;

        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (i, ch) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push(self.thousands_separator);
            }
            grouped.push(ch);
        }

        format!(
            "{}{}{}{}{}{:02}",
            if cents < 0 { "-" } else { "" },
            self.symbol,
            self.symbol_separator,
            grouped,
            self.decimal_separator,
            frac
        )
    }
}

/// Formats `amount` in the default pt-BR BRL format. Total for any value.
pub fn format_currency(amount: Money) -> String {
    CurrencyFormat::default().format(amount)
}

// =============================================================================
// Serde Adapters
// =============================================================================

/// `#[serde(with = "money::units")]`: (de)serialize `Money` as a decimal
/// currency amount (`30.5`) instead of cents.
///
/// Amounts outside [`Money::MAX_DECIMAL_CENTS`] fail to deserialize.
pub mod units {
    use super::Money;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(money: &Money, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(money.to_decimal())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
        let amount = f64::deserialize(deserializer)?;
        checked(amount)
    }

    pub(super) fn checked<E: de::Error>(amount: f64) -> Result<Money, E> {
        Money::try_from_decimal(amount)
            .ok_or_else(|| E::custom(format!("amount out of range: {amount}")))
    }

    /// Same as the parent module for `Option<Money>`.
    pub mod option {
        use super::super::Money;
        use super::checked;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            money: &Option<Money>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match money {
                Some(m) => serializer.serialize_some(&m.to_decimal()),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Money>, D::Error> {
            Option::<f64>::deserialize(deserializer)?
                .map(checked)
                .transpose()
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
