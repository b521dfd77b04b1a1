//! # Validation Module
//!
//! Input validation for the sale form.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend form                                                │
//! │  └── `required` attributes, immediate feedback                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (called by create / edit)                        │
//! │  ├── client name, username, purchase date present                      │
//! │  └── purchase date parses as ISO-8601                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDateTime;

use crate::error::{CoreResult, ValidationError};
use crate::time;
use crate::types::SaleInput;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates a required free-text field and returns it trimmed.
///
/// ```rust
/// use flow_core::validation::validate_required;
///
/// assert_eq!(validate_required("clientName", "  Ana ").unwrap(), "Ana");
/// assert!(validate_required("clientName", "   ").is_err());
/// ```
pub fn validate_required(field: &str, value: &str) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::required(field));
    }

    Ok(value.to_string())
}

/// Checked form fields ready to be written into a `Sale`.
///
/// The password is optional and carried exactly as submitted, including an
/// empty string.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidSaleInput {
    pub client_name: String,
    pub username: String,
    pub password: Option<String>,
    pub purchase_date: NaiveDateTime,
}

/// Validates the whole sale form.
///
/// ## Rules
/// - `clientName`, `username`, `purchaseDate` must be non-blank
/// - `purchaseDate` must parse as ISO-8601 (date-only allowed)
/// - Value and cost are not checked: a loss-making sale is allowed
pub fn validate_sale_input(input: &SaleInput) -> CoreResult<ValidSaleInput> {
    let client_name = validate_required("clientName", &input.client_name)?;
    let username = validate_required("username", &input.username)?;

    if input.purchase_date.trim().is_empty() {
        return Err(ValidationError::required("purchaseDate").into());
    }
    let purchase_date = time::truncate_to_seconds(time::parse_iso(&input.purchase_date)?);

    Ok(ValidSaleInput {
        client_name,
        username,
        password: input.password.clone(),
        purchase_date,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
