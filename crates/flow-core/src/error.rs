//! # Error Types
//!
//! Domain-specific error types for flow-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  flow-core errors (this file)                                          │
//! │  ├── CoreError        - Umbrella for domain failures                   │
//! │  ├── ValidationError  - Missing form input                             │
//! │  └── ParseError       - Date string that is not ISO-8601               │
//! │                                                                         │
//! │  flow-db errors (separate crate)                                       │
//! │  ├── DbError          - SQLite failures                                │
//! │  └── StoreError       - What SalesStore callers see                    │
//! │                                                                         │
//! │  Flow: ValidationError / ParseError → CoreError → StoreError           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Form input was rejected before the operation ran.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A stored or submitted date could not be parsed.
    ///
    /// ## When This Occurs
    /// Dates produced by this crate always parse, so in practice this means
    /// the persisted collection was edited or corrupted from outside.
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised by create/edit when the sale form is incomplete. The operation does
/// not proceed; the UI shows the message next to the form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or blank.
    #[error("{field} is required")]
    Required { field: String },
}

impl ValidationError {
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }
}

// =============================================================================
// Parse Error
// =============================================================================

/// A date/time string that is not in any accepted ISO-8601 shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid ISO-8601 date/time: '{input}'")]
pub struct ParseError {
    pub input: String,
}

impl ParseError {
    pub fn new(input: impl Into<String>) -> Self {
        ParseError {
            input: input.into(),
        }
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
