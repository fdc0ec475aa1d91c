//! # picofi-core: Pure Savings Logic for PicoFI
//!
//! This crate holds the money type, the per-visitor data model and the
//! savings calculations as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        PicoFI Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/web (axum)                              │   │
//! │  │    cookie ──► session ──► calculator ──► render cache          │   │
//! │  └──────────────┬──────────────────┬──────────────────┬───────────┘   │
//! │                 │                  │                  │                │
//! │  ┌──────────────▼─────┐  ┌─────────▼──────────┐  ┌────▼────────────┐  │
//! │  │  picofi-session    │  │ ★ picofi-core ★    │  │  picofi-render  │  │
//! │  │  TTL session store │  │  (THIS CRATE)      │  │  template cache │  │
//! │  └────────────────────┘  │                    │  └─────────────────┘  │
//! │                          │  money  calculator │                       │
//! │                          │  types  form       │                       │
//! │                          │  validation error  │                       │
//! │                          │                    │                       │
//! │                          │  NO I/O • NO LOGS  │                       │
//! │                          └────────────────────┘                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money and Currency with integer arithmetic (no floating point!)
//! - [`types`] - Session, SavingsRow, InterestRate
//! - [`calculator`] - Savings, savings rate and projection
//! - [`form`] - Form field contract for income, expenses and savings rows
//! - [`validation`] - Exact decimal parsing and label checks
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use picofi_core::{Calculator, Currency, Money};
//!
//! let calc = Calculator::new(Currency::Eur);
//! let income = Money::from_major(100_000, Currency::Eur);
//! let expenses = Money::from_major(150_000, Currency::Eur);
//!
//! // Spending more than you earn is debt, not an error
//! let rate = calc.annual_savings_rate_percent(income, expenses).unwrap();
//! assert_eq!(rate, -50.0);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod calculator;
pub mod error;
pub mod form;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use calculator::{Calculator, ProjectionYear};
pub use error::{CalcError, CalcResult, ValidationError, ValidationResult};
pub use money::{Currency, Money};
pub use types::{InterestRate, SavingsRow, Session};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Income a fresh session starts with, in major units.
pub const DEFAULT_ANNUAL_INCOME: i64 = 70_000;

/// Expenses a fresh session starts with, in major units.
pub const DEFAULT_ANNUAL_EXPENSES: i64 = 50_000;

/// Years shown in the projection table.
pub const DEFAULT_PROJECTION_YEARS: u32 = 10;
