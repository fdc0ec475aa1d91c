//! # Error Types
//!
//! Domain-specific error types for picofi-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  picofi-core errors (this file)                                        │
//! │  ├── CalcError        - Calculator and money arithmetic failures       │
//! │  └── ValidationError  - Malformed form input                           │
//! │                                                                         │
//! │  picofi-session errors (separate crate)                                │
//! │  └── SessionError     - Expired sessions, encoding, backing store      │
//! │                                                                         │
//! │  picofi-render errors (separate crate)                                 │
//! │  └── RenderError      - Template source, compile and render failures   │
//! │                                                                         │
//! │  web app errors                                                        │
//! │  └── ApiError         - What the browser sees (status + message)       │
//! │                                                                         │
//! │  Flow: ValidationError/CalcError → ApiError (400) → Browser            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Errors are returned, never logged, by this crate
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

use crate::money::Currency;

// =============================================================================
// Calculation Error
// =============================================================================

/// Failures of the savings calculations.
///
/// All of these describe input the person typed, so callers surface them as
/// a rejection rather than a server fault.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    /// Income below zero.
    ///
    /// ## When This Occurs
    /// Someone tried to express debt as negative income. Debt belongs in the
    /// expenses (which can exceed income), not in the income figure.
    #[error("income can't be negative, don't include debt here")]
    NegativeIncome,

    /// Computed savings exceed the income they were saved from.
    ///
    /// ## When This Occurs
    /// Only reachable with negative expenses:
    /// ```text
    /// income 100000, expenses -10000
    ///      │
    ///      ▼
    /// savings = 110000 > income  →  InvalidSavings
    /// ```
    #[error("savings cannot be higher than the income")]
    InvalidSavings,

    /// A savings rate was requested for zero income.
    #[error("savings rate is undefined for an income of zero")]
    UndefinedRate,

    /// Two amounts in different currencies met in one operation.
    #[error("cannot combine {left} with {right}")]
    CurrencyMismatch { left: Currency, right: Currency },

    /// Result does not fit in 64-bit minor units.
    #[error("amount is too large to calculate with")]
    Overflow,
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when form input cannot be turned into domain values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field is not a plain decimal number.
    #[error("{field} is not a valid number: '{value}'")]
    InvalidNumber { field: String, value: String },

    /// More fractional digits than the unit can hold.
    #[error("{field} allows at most {max} decimal places")]
    TooPrecise { field: String, max: u32 },

    /// Number does not fit the storage type.
    #[error("{field} is out of range")]
    OutOfRange { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value is not in allowed set.
    #[error("{field} must be one of {allowed:?}, got '{value}'")]
    NotAllowed {
        field: String,
        value: String,
        allowed: Vec<&'static str>,
    },
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for Results with CalcError.
pub type CalcResult<T> = Result<T, CalcError>;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================
