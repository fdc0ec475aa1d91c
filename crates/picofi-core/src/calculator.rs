//! # Calculator
//!
//! Savings arithmetic over [`Money`] values.
//!
//! ## Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      annual_savings(income, expenses)                   │
//! │                                                                         │
//! │  income < 0 ─────────────────────────────► NegativeIncome               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  savings = income - expenses  (exact, minor units)                      │
//! │       │                                                                 │
//! │       ├── savings > income ──────────────► InvalidSavings               │
//! │       │   (only with negative expenses)                                 │
//! │       ▼                                                                 │
//! │  savings (may be negative: that is debt, and valid)                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The calculator never logs. Failures are returned and the caller decides
//! how loudly to report them.

use crate::error::{CalcError, CalcResult};
use crate::money::{Currency, Money};
use crate::types::{SavingsRow, Session};

/// Stateless savings calculator bound to one currency.
///
/// `Copy` and free of interior state, so every request can hold its own
/// instance without coordination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calculator {
    currency: Currency,
}

/// One year of a savings projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectionYear {
    /// 1 for the first year from now.
    pub year: u32,
    /// Sum of all savings rows after this year's interest.
    pub savings_balance: Money,
    /// Accumulated annual savings added since today.
    pub contributions: Money,
    /// `savings_balance + contributions`.
    pub total: Money,
}

impl Calculator {
    pub const fn new(currency: Currency) -> Self {
        Calculator { currency }
    }

    pub const fn currency(&self) -> Currency {
        self.currency
    }

    /// Calculates the annual savings as `income - expenses`.
    ///
    /// A negative result denotes debt. Saving more than is earned returns
    /// [`CalcError::InvalidSavings`]; a negative income returns
    /// [`CalcError::NegativeIncome`] (don't combine debt with income).
    ///
    /// ## Example
    /// ```rust
    /// use picofi_core::{Calculator, Currency, Money};
    ///
    /// let calc = Calculator::new(Currency::Eur);
    /// let savings = calc
    ///     .annual_savings(
    ///         Money::from_major(100_000, Currency::Eur),
    ///         Money::from_major(20_000, Currency::Eur),
    ///     )
    ///     .unwrap();
    /// assert_eq!(savings, Money::from_major(80_000, Currency::Eur));
    /// ```
    pub fn annual_savings(&self, income: Money, expenses: Money) -> CalcResult<Money> {
        self.ensure_currency(income)?;
        self.ensure_currency(expenses)?;

        if income.is_negative() {
            return Err(CalcError::NegativeIncome);
        }

        // with income >= 0, savings exceed income exactly when expenses < 0
        if expenses.is_negative() {
            return Err(CalcError::InvalidSavings);
        }

        income.checked_sub(expenses)
    }

    /// Calculates the percentage of income saved annually.
    ///
    /// Uses [`Calculator::annual_savings`] and converts to major units only
    /// for the final division. Zero income returns
    /// [`CalcError::UndefinedRate`] whatever the expenses are.
    pub fn annual_savings_rate_percent(&self, income: Money, expenses: Money) -> CalcResult<f64> {
        self.ensure_currency(income)?;
        self.ensure_currency(expenses)?;

        if income.is_zero() {
            return Err(CalcError::UndefinedRate);
        }

        let savings = self.annual_savings(income, expenses)?;

        Ok(savings.major_units() / income.major_units() * 100.0)
    }

    /// Sums the balances of all savings rows.
    pub fn total_savings(&self, rows: &[SavingsRow]) -> CalcResult<Money> {
        rows.iter().try_fold(Money::zero(self.currency), |acc, row| {
            self.ensure_currency(row.amount)?;
            acc.checked_add(row.amount)
        })
    }

    /// Projects the savings trajectory for `years` years.
    ///
    /// ## Model
    /// - Every row compounds yearly at its own rate, interest rounded to the
    ///   minor unit.
    /// - Each year's `annual_savings` is added to a contributions pot that
    ///   earns no interest. Negative savings shrink the pot (debt).
    ///
    /// Fails with the same errors as [`Calculator::annual_savings`].
    pub fn project(&self, session: &Session, years: u32) -> CalcResult<Vec<ProjectionYear>> {
        let yearly = self.annual_savings(session.annual_income, session.annual_expenses)?;

        let mut balances: Vec<(Money, i64)> = session
            .savings
            .iter()
            .map(|row| {
                self.ensure_currency(row.amount)?;
                Ok((row.amount, row.interest_rate.bps()))
            })
            .collect::<CalcResult<_>>()?;

        let mut contributions = Money::zero(self.currency);
        let mut projection = Vec::with_capacity(years as usize);

        for year in 1..=years {
            for (balance, bps) in balances.iter_mut() {
                *balance = balance.checked_add(balance.checked_apply_bps(*bps)?)?;
            }
            contributions = contributions.checked_add(yearly)?;

            let savings_balance = balances
                .iter()
                .try_fold(Money::zero(self.currency), |acc, (b, _)| acc.checked_add(*b))?;

            projection.push(ProjectionYear {
                year,
                savings_balance,
                contributions,
                total: savings_balance.checked_add(contributions)?,
            });
        }

        Ok(projection)
    }

    fn ensure_currency(&self, money: Money) -> CalcResult<()> {
        if money.currency() != self.currency {
            return Err(CalcError::CurrencyMismatch {
                left: self.currency,
                right: money.currency(),
            });
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
