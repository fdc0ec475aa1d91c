//! # Money Module
//!
//! Provides the `Money` and `Currency` types for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  With binary floating point:                                            │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Summing a year of expenses one row at a time drifts the same way.      │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Minor Units                                      │
//! │    €70,000.00 is stored as 7_000_000 cents + Currency::Eur              │
//! │    income - expenses is an exact i64 subtraction                        │
//! │                                                                         │
//! │  The ONLY lossy steps are parsing form input and formatting output.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use picofi_core::money::{Currency, Money};
//!
//! let income = Money::from_major(100_000, Currency::Eur);
//! let expenses = Money::parse("20000.50", Currency::Eur).unwrap();
//!
//! let savings = income.checked_sub(expenses).unwrap();
//! assert_eq!(savings.minor(), 7_999_950);
//! assert_eq!(savings.to_string(), "€79,999.50");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CalcError, CalcResult, ValidationError, ValidationResult};
use crate::validation::parse_scaled;

// =============================================================================
// Currency
// =============================================================================

/// Currencies the calculator knows how to format and parse.
///
/// Each currency carries its minor-unit exponent: EUR has 2 (cents), JPY has
/// 0 (the yen has no subdivision in practice).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Eur,
    Usd,
    Gbp,
    Jpy,
}

impl Currency {
    /// ISO 4217 code.
    pub const fn code(&self) -> &'static str {
        match self {
            Currency::Eur => "EUR",
            Currency::Usd => "USD",
            Currency::Gbp => "GBP",
            Currency::Jpy => "JPY",
        }
    }

    /// Display symbol, placed before the amount.
    pub const fn symbol(&self) -> &'static str {
        match self {
            Currency::Eur => "€",
            Currency::Usd => "$",
            Currency::Gbp => "£",
            Currency::Jpy => "¥",
        }
    }

    /// Number of decimal digits in the minor unit.
    pub const fn exponent(&self) -> u32 {
        match self {
            Currency::Jpy => 0,
            _ => 2,
        }
    }

    /// Minor units per major unit (100 for EUR, 1 for JPY).
    pub const fn minor_per_major(&self) -> i64 {
        10i64.pow(self.exponent())
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "EUR" => Ok(Currency::Eur),
            "USD" => Ok(Currency::Usd),
            "GBP" => Ok(Currency::Gbp),
            "JPY" => Ok(Currency::Jpy),
            other => Err(ValidationError::NotAllowed {
                field: "currency".to_string(),
                value: other.to_string(),
                allowed: vec!["EUR", "USD", "GBP", "JPY"],
            }),
        }
    }
}

// =============================================================================
// Money Type
// =============================================================================

/// An exact amount of a single currency, stored in minor units.
///
/// ## Design Decisions
/// - **i64 (signed)**: negative savings is how debt shows up, so the sign matters
/// - **Currency travels with the amount**: arithmetic across currencies fails
///   instead of silently mixing euros and dollars
/// - **No `Add`/`Sub` operator impls**: every combination of two values can
///   fail, so arithmetic goes through the `checked_*` methods
///
/// ## Where Money Flows
/// ```text
/// form "income" ──► Money::parse ──► Session.annual_income ──┐
///                                                            ├──► Calculator
/// form "expenses" ─► Money::parse ──► Session.annual_expenses┘       │
///                                                                    ▼
///                                        "€20,000.00" ◄── Display ◄── savings
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    minor: i64,
    currency: Currency,
}

impl Money {
    /// Creates a Money value from minor units (cents for EUR).
    ///
    /// ## Example
    /// ```rust
    /// use picofi_core::money::{Currency, Money};
    ///
    /// let m = Money::from_minor(1099, Currency::Eur); // €10.99
    /// assert_eq!(m.minor(), 1099);
    /// ```
    #[inline]
    pub const fn from_minor(minor: i64, currency: Currency) -> Self {
        Money { minor, currency }
    }

    /// Creates a Money value from whole major units (euros for EUR).
    ///
    /// ## Example
    /// ```rust
    /// use picofi_core::money::{Currency, Money};
    ///
    /// assert_eq!(Money::from_major(70_000, Currency::Eur).minor(), 7_000_000);
    /// assert_eq!(Money::from_major(70_000, Currency::Jpy).minor(), 70_000);
    /// ```
    #[inline]
    pub const fn from_major(major: i64, currency: Currency) -> Self {
        Money {
            minor: major * currency.minor_per_major(),
            currency,
        }
    }

    /// Parses a decimal string such as `"15000"`, `"-42.5"` or `"0.99"` exactly.
    ///
    /// More fractional digits than the currency allows are rejected unless
    /// the extra digits are zero. Scientific notation, separators and
    /// currency symbols are rejected.
    ///
    /// ## Example
    /// ```rust
    /// use picofi_core::money::{Currency, Money};
    ///
    /// assert_eq!(Money::parse("42.5", Currency::Eur).unwrap().minor(), 4250);
    /// assert!(Money::parse("4.255", Currency::Eur).is_err());
    /// assert!(Money::parse("abc", Currency::Eur).is_err());
    /// ```
    pub fn parse(text: &str, currency: Currency) -> ValidationResult<Self> {
        Money::parse_field("amount", text, currency)
    }

    /// Same as [`Money::parse`] but names the offending form field in errors.
    pub fn parse_field(field: &str, text: &str, currency: Currency) -> ValidationResult<Self> {
        let minor = parse_scaled(field, text, currency.exponent())?;
        Ok(Money::from_minor(minor, currency))
    }

    /// Zero in the given currency.
    #[inline]
    pub const fn zero(currency: Currency) -> Self {
        Money { minor: 0, currency }
    }

    /// The amount in minor units.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.minor
    }

    #[inline]
    pub const fn currency(&self) -> Currency {
        self.currency
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.minor == 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.minor < 0
    }

    /// Returns the amount as a floating point count of major units.
    ///
    /// ## Note
    /// This is a lossy conversion. Only call it as the last step of a
    /// computation (percentages, display), never feed the result back into
    /// further money arithmetic.
    pub fn major_units(&self) -> f64 {
        self.minor as f64 / self.currency.minor_per_major() as f64
    }

    /// Adds two amounts of the same currency.
    pub fn checked_add(self, other: Money) -> CalcResult<Money> {
        self.ensure_same_currency(other)?;
        self.minor
            .checked_add(other.minor)
            .map(|minor| Money::from_minor(minor, self.currency))
            .ok_or(CalcError::Overflow)
    }

    /// Subtracts `other` from `self`; both must share a currency.
    pub fn checked_sub(self, other: Money) -> CalcResult<Money> {
        self.ensure_same_currency(other)?;
        self.minor
            .checked_sub(other.minor)
            .map(|minor| Money::from_minor(minor, self.currency))
            .ok_or(CalcError::Overflow)
    }

    /// Applies a basis-point rate, rounding half away from zero to the minor unit.
    ///
    /// ## Example
    /// ```rust
    /// use picofi_core::money::{Currency, Money};
    ///
    /// let balance = Money::from_major(15_000, Currency::Eur);
    /// assert_eq!(balance.checked_apply_bps(200).unwrap().minor(), 30_000); // 2% of €15,000 = €300.00
    /// ```
    ///
    /// Returns [`CalcError::Overflow`] when the result does not fit in `i64`.
    pub fn checked_apply_bps(&self, bps: i64) -> CalcResult<Money> {
        // the i128 product itself can't overflow: |i64 * i64| < 2^126
        let product = self.minor as i128 * bps as i128;
        let half = if product < 0 { -5_000 } else { 5_000 };
        let minor = i64::try_from((product + half) / 10_000).map_err(|_| CalcError::Overflow)?;
        Ok(Money::from_minor(minor, self.currency))
    }

    /// Plain decimal rendering without symbol or grouping, e.g. `"-50000.00"`.
    ///
    /// This is the form used to pre-fill `<input>` values, and it parses back
    /// with [`Money::parse`] to the same amount.
    pub fn to_decimal_string(&self) -> String {
        let (sign, whole, frac) = self.split();
        match self.currency.exponent() {
            0 => format!("{sign}{whole}"),
            exp => format!("{sign}{whole}.{frac:0width$}", width = exp as usize),
        }
    }

    fn ensure_same_currency(&self, other: Money) -> CalcResult<()> {
        if self.currency != other.currency {
            return Err(CalcError::CurrencyMismatch {
                left: self.currency,
                right: other.currency,
            });
        }
        Ok(())
    }

    /// Splits into sign, absolute major part and absolute minor part.
    fn split(&self) -> (&'static str, u64, u64) {
        let sign = if self.minor < 0 { "-" } else { "" };
        let abs = self.minor.unsigned_abs();
        let per = self.currency.minor_per_major() as u64;
        (sign, abs / per, abs % per)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Human readable form: symbol, thousands separators, fixed decimals.
///
/// `€80,000.00`, `-€50,000.00`, `¥1,200`
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (sign, whole, frac) = self.split();
        let digits = whole.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        write!(f, "{}{}{}", sign, self.currency.symbol(), grouped)?;
        match self.currency.exponent() {
            0 => Ok(()),
            exp => write!(f, ".{:0width$}", frac, width = exp as usize),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_major_respects_exponent() {
        assert_eq!(Money::from_major(10, Currency::Eur).minor(), 1000);
        assert_eq!(Money::from_major(10, Currency::Jpy).minor(), 10);
        assert_eq!(Money::from_major(-5, Currency::Usd).minor(), -500);
    }

    #[test]
    fn test_parse() {
        let eur = Currency::Eur;
        assert_eq!(Money::parse("70000", eur).unwrap().minor(), 7_000_000);
        assert_eq!(Money::parse(" 0.99 ", eur).unwrap().minor(), 99);
        assert_eq!(Money::parse("-42.5", eur).unwrap().minor(), -4250);
        assert_eq!(Money::parse("+1.", eur).unwrap().minor(), 100);
        assert_eq!(Money::parse(".5", eur).unwrap().minor(), 50);
        assert_eq!(Money::parse("3.1400", eur).unwrap().minor(), 314);

        assert!(Money::parse("", eur).is_err());
        assert!(Money::parse("abc", eur).is_err());
        assert!(Money::parse("1e5", eur).is_err());
        assert!(Money::parse("1,000", eur).is_err());
        assert!(Money::parse("4.255", eur).is_err());
        assert!(Money::parse("12.5", Currency::Jpy).is_err());
        assert!(Money::parse("99999999999999999999", eur).is_err());
    }

    #[test]
    fn test_display() {
        let eur = Currency::Eur;
        assert_eq!(Money::from_minor(8_000_000, eur).to_string(), "€80,000.00");
        assert_eq!(Money::from_minor(-5_000_000, eur).to_string(), "-€50,000.00");
        assert_eq!(Money::from_minor(5, eur).to_string(), "€0.05");
        assert_eq!(Money::from_minor(100_000, eur).to_string(), "€1,000.00");
        assert_eq!(Money::from_minor(99_999, eur).to_string(), "€999.99");
        assert_eq!(Money::from_minor(1_234_567, Currency::Jpy).to_string(), "¥1,234,567");
        assert_eq!(Money::zero(Currency::Usd).to_string(), "$0.00");
    }

    #[test]
    fn test_decimal_string_parses_back() {
        for minor in [0, 5, -5, 1099, -5_000_000, 7_000_000] {
            let m = Money::from_minor(minor, Currency::Eur);
            assert_eq!(Money::parse(&m.to_decimal_string(), Currency::Eur).unwrap(), m);
        }
        assert_eq!(Money::from_minor(-5, Currency::Eur).to_decimal_string(), "-0.05");
        assert_eq!(Money::from_minor(42, Currency::Jpy).to_decimal_string(), "42");
    }

    #[test]
    fn test_checked_arithmetic() {
        let a = Money::from_minor(1000, Currency::Eur);
        let b = Money::from_minor(1500, Currency::Eur);

        assert_eq!(a.checked_add(b).unwrap().minor(), 2500);
        assert_eq!(a.checked_sub(b).unwrap().minor(), -500);

        let max = Money::from_minor(i64::MAX, Currency::Eur);
        assert!(matches!(max.checked_add(a), Err(CalcError::Overflow)));
    }

    #[test]
    fn test_currency_mismatch() {
        let eur = Money::from_major(5, Currency::Eur);
        let usd = Money::from_major(5, Currency::Usd);

        assert!(matches!(
            eur.checked_sub(usd),
            Err(CalcError::CurrencyMismatch { left: Currency::Eur, right: Currency::Usd })
        ));
        assert!(eur.checked_add(usd).is_err());
    }

    #[test]
    fn test_apply_bps_rounds_half_away_from_zero() {
        let eur = Currency::Eur;
        // 2.5% of €0.10 = 0.25 cents → 0; 2.5% of €0.20 = 0.5 cents → 1
        assert_eq!(Money::from_minor(10, eur).checked_apply_bps(250).unwrap().minor(), 0);
        assert_eq!(Money::from_minor(20, eur).checked_apply_bps(250).unwrap().minor(), 1);
        assert_eq!(Money::from_minor(-20, eur).checked_apply_bps(250).unwrap().minor(), -1);
    }

    #[test]
    fn test_apply_bps_overflow_is_an_error() {
        let eur = Currency::Eur;
        let balance = Money::from_minor(10_000_000_000_000, eur);
        assert_eq!(
            balance.checked_apply_bps(10_000_000_000_000),
            Err(CalcError::Overflow)
        );
        assert_eq!(
            Money::from_minor(i64::MAX, eur).checked_apply_bps(-20_000),
            Err(CalcError::Overflow)
        );
        assert_eq!(
            Money::from_minor(i64::MAX, eur).checked_apply_bps(10_000).unwrap().minor(),
            i64::MAX
        );
    }

    #[test]
    fn test_currency_from_str() {
        assert_eq!("eur".parse::<Currency>().unwrap(), Currency::Eur);
        assert_eq!(" JPY".parse::<Currency>().unwrap(), Currency::Jpy);
        assert!("XYZ".parse::<Currency>().is_err());
    }
}
