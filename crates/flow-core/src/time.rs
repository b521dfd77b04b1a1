//! # Time Module
//!
//! Cycle arithmetic for subscriptions: parsing the stored ISO strings,
//! expiry dates, days remaining and cycle progress.
//!
//! ## Clock Handling
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  days_remaining(expiry)          ──► days_remaining_at(expiry, now())   │
//! │  subscription_progress(p, e)     ──► subscription_progress_at(p, e, now)│
//! │                                                                         │
//! │  The `_at` variants are pure. The plain variants read the wall clock   │
//! │  once and delegate.                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All instants are naive UTC. Date-only input (`2024-01-01`) means midnight.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};

use crate::error::ParseError;
use crate::CYCLE_DAYS;

/// Serialized shape of every stored date: seconds precision, no offset.
pub const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Display shape used by the dashboard (pt-BR).
pub const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

// =============================================================================
// Parsing / Formatting
// =============================================================================

/// Parses an ISO-8601 date or date-time string.
///
/// ## Accepted Shapes
/// - `2024-01-01` (midnight)
/// - `2024-01-01T10:30`, `2024-01-01T10:30:00`, `2024-01-01T10:30:00.123`
/// - `2024-01-01T10:30:00Z`, `2024-01-01T10:30:00-03:00` (normalized to UTC)
///
/// ```rust
/// use flow_core::time::parse_iso;
///
/// let dt = parse_iso("2024-01-01").unwrap();
/// assert_eq!(dt.to_string(), "2024-01-01 00:00:00");
/// assert!(parse_iso("01/01/2024").is_err());
/// ```
pub fn parse_iso(input: &str) -> Result<NaiveDateTime, ParseError> {
    let s = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.naive_utc());
    }

    for format in DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(dt);
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(|d| d.and_time(NaiveTime::MIN))
        .map_err(|_| ParseError::new(input))
}

/// Formats an instant as `YYYY-MM-DDTHH:MM:SS`.
pub fn format_iso(dt: NaiveDateTime) -> String {
    dt.format(ISO_FORMAT).to_string()
}

/// Formats the date part of an ISO string as `dd/MM/yyyy`.
///
/// ```rust
/// use flow_core::time::format_date;
///
/// assert_eq!(format_date("2024-01-31T00:00:00").unwrap(), "31/01/2024");
/// ```
pub fn format_date(iso: &str) -> Result<String, ParseError> {
    Ok(display_date(parse_iso(iso)?))
}

/// Formats an already-parsed instant as `dd/MM/yyyy`.
pub fn display_date(dt: NaiveDateTime) -> String {
    dt.format(DISPLAY_DATE_FORMAT).to_string()
}

// =============================================================================
// Clock
// =============================================================================

/// Current instant, naive UTC, truncated to whole seconds so it survives a
/// round trip through [`ISO_FORMAT`] unchanged.
pub fn now() -> NaiveDateTime {
    truncate_to_seconds(Utc::now().naive_utc())
}

/// Today's date (UTC).
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub fn truncate_to_seconds(dt: NaiveDateTime) -> NaiveDateTime {
    dt.with_nanosecond(0).unwrap_or(dt)
}

// =============================================================================
// Expiry
// =============================================================================

/// `purchase + 30 days`, time of day preserved.
pub fn expiry_for(purchase: NaiveDateTime) -> NaiveDateTime {
    purchase + Duration::days(CYCLE_DAYS)
}

/// String form of [`expiry_for`].
///
/// ```rust
/// use flow_core::time::calculate_expiry;
///
/// assert_eq!(calculate_expiry("2024-01-01").unwrap(), "2024-01-31T00:00:00");
/// assert_eq!(
///     calculate_expiry("2024-02-10T14:05:09Z").unwrap(),
///     "2024-03-11T14:05:09"
/// );
/// ```
pub fn calculate_expiry(purchase_iso: &str) -> Result<String, ParseError> {
    Ok(format_iso(expiry_for(parse_iso(purchase_iso)?)))
}

// =============================================================================
// Days Remaining
// =============================================================================

/// Whole days from `now` until `expiry`, truncated toward zero.
///
/// 23 hours left is still `0`; a full day past expiry is `-1`.
pub fn days_between(expiry: NaiveDateTime, now: NaiveDateTime) -> i64 {
    (expiry - now).num_days()
}

pub fn days_remaining_at(expiry_iso: &str, now: NaiveDateTime) -> Result<i64, ParseError> {
    Ok(days_between(parse_iso(expiry_iso)?, now))
}

/// Days until `expiry_iso` relative to the wall clock. Negative means
/// already expired.
pub fn days_remaining(expiry_iso: &str) -> Result<i64, ParseError> {
    days_remaining_at(expiry_iso, now())
}

// =============================================================================
// Progress
// =============================================================================

/// Percentage of the cycle elapsed at `now`, in `[0, 100]`.
///
/// A zero-length cycle counts as fully elapsed.
pub fn cycle_progress(purchase: NaiveDateTime, expiry: NaiveDateTime, now: NaiveDateTime) -> f64 {
    if now >= expiry {
        return 100.0;
    }
    if now < purchase {
        return 0.0;
    }

    let total = (expiry - purchase).num_milliseconds();
    if total <= 0 {
        return 100.0;
    }
    let elapsed = (now - purchase).num_milliseconds();

    (elapsed as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
}

pub fn subscription_progress_at(
    purchase_iso: &str,
    expiry_iso: &str,
    now: NaiveDateTime,
) -> Result<f64, ParseError> {
    Ok(cycle_progress(
        parse_iso(purchase_iso)?,
        parse_iso(expiry_iso)?,
        now,
    ))
}

pub fn subscription_progress(purchase_iso: &str, expiry_iso: &str) -> Result<f64, ParseError> {
    subscription_progress_at(purchase_iso, expiry_iso, now())
}

// =============================================================================
// Serde Adapter
// =============================================================================

/// `#[serde(with = "time::iso")]`: store a `NaiveDateTime` as
/// `YYYY-MM-DDTHH:MM:SS`, read any shape [`parse_iso`] accepts.
pub mod iso {
    use chrono::NaiveDateTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(dt: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_iso(*dt))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<NaiveDateTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        super::parse_iso(&s).map_err(de::Error::custom)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> NaiveDateTime {
        parse_iso(s).unwrap()
    }

    #[test]
    fn test_parse_shapes() {
        let midnight = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();

        assert_eq!(at("2024-01-01"), midnight);
        assert_eq!(at("2024-01-01T00:00:00"), midnight);
        assert_eq!(at("2024-01-01T00:00"), midnight);
        assert_eq!(at("2024-01-01T00:00:00.000"), midnight);
        assert_eq!(at("2024-01-01T00:00:00.000Z"), midnight);
        assert_eq!(at("2023-12-31T21:00:00-03:00"), midnight);
        assert_eq!(at("  2024-01-01 "), midnight);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_iso("").is_err());
        assert!(parse_iso("31/01/2024").is_err());
        assert!(parse_iso("2024-02-30").is_err());
        assert!(parse_iso("tomorrow").is_err());
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2024-03-11T08:00:00").unwrap(), "11/03/2024");
        assert!(format_date("not a date").is_err());
    }

    #[test]
    fn test_calculate_expiry() {
        assert_eq!(calculate_expiry("2024-01-01").unwrap(), "2024-01-31T00:00:00");
        // Leap year February
        assert_eq!(calculate_expiry("2024-02-10").unwrap(), "2024-03-11T00:00:00");
        assert_eq!(
            calculate_expiry("2024-12-15T23:59:59").unwrap(),
            "2025-01-14T23:59:59"
        );
    }

    #[test]
    fn test_days_remaining_boundaries() {
        let expiry = at("2024-01-31T00:00:00");

        assert_eq!(days_between(expiry, expiry), 0);
        assert_eq!(days_between(expiry, at("2024-01-30T01:00:00")), 0);
        assert_eq!(days_between(expiry, at("2024-01-26T00:00:00")), 5);
        assert_eq!(days_between(expiry, at("2024-01-31T12:00:00")), 0);
        assert_eq!(days_between(expiry, at("2024-02-01T00:00:00")), -1);
        assert_eq!(days_between(expiry, at("2024-02-10T00:00:00")), -10);

        assert_eq!(
            days_remaining_at("2024-01-31", at("2024-01-15")).unwrap(),
            16
        );
    }

    #[test]
    fn test_progress_bounds() {
        let p = at("2024-01-01");
        let e = at("2024-01-31");

        assert_eq!(cycle_progress(p, e, at("2023-12-25")), 0.0);
        assert_eq!(cycle_progress(p, e, p), 0.0);
        assert!((cycle_progress(p, e, at("2024-01-16")) - 50.0).abs() < 1e-9);
        assert_eq!(cycle_progress(p, e, e), 100.0);
        assert_eq!(cycle_progress(p, e, at("2024-06-01")), 100.0);
    }

    #[test]
    fn test_progress_zero_length_cycle() {
        let p = at("2024-01-01");
        assert_eq!(cycle_progress(p, p, at("2023-01-01")), 0.0);
        assert_eq!(cycle_progress(p, p, p), 100.0);
        assert_eq!(cycle_progress(p, p, at("2024-02-01")), 100.0);
    }

    #[test]
    fn test_progress_is_monotonic() {
        let p = at("2024-01-01");
        let e = at("2024-01-31");

        let mut last = -1.0;
        let mut now = at("2023-12-20");
        while now < at("2024-02-10") {
            let current = cycle_progress(p, e, now);
            assert!((0.0..=100.0).contains(&current));
            assert!(current >= last);
            last = current;
            now += Duration::hours(7);
        }
    }

    #[test]
    fn test_string_progress() {
        let progress =
            subscription_progress_at("2024-01-01", "2024-01-31", at("2024-01-07")).unwrap();
        assert!((progress - 20.0).abs() < 1e-9);
        assert!(subscription_progress_at("bad", "2024-01-31", at("2024-01-07")).is_err());
    }

    #[test]
    fn test_now_has_no_subseconds() {
        let n = now();
        assert_eq!(n.nanosecond(), 0);
        assert_eq!(parse_iso(&format_iso(n)).unwrap(), n);
    }
}
