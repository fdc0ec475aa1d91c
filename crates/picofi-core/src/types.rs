//! # Domain Types
//!
//! The data a visitor can personalise, held per session.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌──────────────────────┐        ┌─────────────────────────┐            │
//! │  │       Session        │        │      SavingsRow         │            │
//! │  │  ──────────────────  │  1..*  │  ─────────────────────  │            │
//! │  │  annual_income       │───────►│  name                   │            │
//! │  │  annual_expenses     │        │  amount (Money)         │            │
//! │  │  savings             │        │  interest_rate          │            │
//! │  └──────────────────────┘        └─────────────────────────┘            │
//! │                                                                         │
//! │  ┌──────────────────────┐                                               │
//! │  │    InterestRate      │                                               │
//! │  │  ──────────────────  │                                               │
//! │  │  bps (i64)           │                                               │
//! │  │  200 = 2.00%         │                                               │
//! │  └──────────────────────┘                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ownership
//! A `Session` is owned by the session store. Handlers get a copy, change it,
//! and hand the whole value back; the savings rows are never patched one by
//! one.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationResult;
use crate::money::{Currency, Money};
use crate::validation::parse_scaled;

// =============================================================================
// Interest Rate
// =============================================================================

/// Annual interest rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000, so `2.25%` is exactly `225` and
/// compounding works in integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct InterestRate(i64);

impl InterestRate {
    /// Creates a rate from basis points.
    #[inline]
    pub const fn from_bps(bps: i64) -> Self {
        InterestRate(bps)
    }

    /// Creates a rate from whole percent (`2` → 2.00%).
    #[inline]
    pub const fn from_percent(percent: i64) -> Self {
        InterestRate(percent * 100)
    }

    /// Parses a percent string such as `"2"` or `"1.75"` (two decimals max).
    pub fn parse_field(field: &str, text: &str) -> ValidationResult<Self> {
        parse_scaled(field, text, 2).map(InterestRate)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> i64 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percent(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Plain form value, e.g. `"2.25"`.
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        format!("{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl fmt::Display for InterestRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.to_decimal_string())
    }
}

// =============================================================================
// Savings Row
// =============================================================================

/// One savings position, e.g. a deposit account with its interest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SavingsRow {
    /// Label the visitor typed.
    pub name: String,

    /// Current balance.
    pub amount: Money,

    /// Annual interest earned on the balance.
    pub interest_rate: InterestRate,
}

impl SavingsRow {
    pub fn new(name: impl Into<String>, amount: Money, interest_rate: InterestRate) -> Self {
        SavingsRow {
            name: name.into(),
            amount,
            interest_rate,
        }
    }
}

// =============================================================================
// Session
// =============================================================================

/// The personalised figures behind the simulation page.
///
/// Serialized field names are kebab-case (`annual-income`), which is also how
/// templates address them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Session {
    pub annual_income: Money,
    pub annual_expenses: Money,
    pub savings: Vec<SavingsRow>,
}

impl Session {
    /// The values every new visitor starts with.
    ///
    /// Income 70000, expenses 50000 and a single savings account of 15000 at
    /// 2%, in the given currency.
    pub fn defaults(currency: Currency) -> Self {
        Session {
            annual_income: Money::from_major(crate::DEFAULT_ANNUAL_INCOME, currency),
            annual_expenses: Money::from_major(crate::DEFAULT_ANNUAL_EXPENSES, currency),
            savings: vec![SavingsRow::new(
                "Savings Account",
                Money::from_major(15_000, currency),
                InterestRate::from_percent(2),
            )],
        }
    }

    /// Returns a copy with new income and expenses, keeping the rows.
    pub fn with_figures(&self, annual_income: Money, annual_expenses: Money) -> Self {
        Session {
            annual_income,
            annual_expenses,
            savings: self.savings.clone(),
        }
    }

    /// Returns a copy whose savings rows are replaced wholesale.
    pub fn with_savings(&self, savings: Vec<SavingsRow>) -> Self {
        Session {
            annual_income: self.annual_income,
            annual_expenses: self.annual_expenses,
            savings,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
