//! Form field contract for the simulation page.
//!
//! The HTTP layer decodes the urlencoded body; this module only sees a
//! key lookup. Savings rows arrive as positional fields:
//!
//! ```text
//! savings[0].name=Deposit  savings[0].amount=15000  savings[0].intrest=2
//! savings[1].name=Stocks   savings[1].amount=4000   savings[1].intrest=6.5
//! ```
//!
//! Rows are read from index 0 upwards until a name is missing or blank.
//! Anything after the first gap is ignored.

use crate::error::ValidationResult;
use crate::money::{Currency, Money};
use crate::types::{InterestRate, SavingsRow};
use crate::validation::validate_row_name;

/// Reads a required decimal money field such as `income`.
pub fn parse_money_field<'a, F>(lookup: F, field: &str, currency: Currency) -> ValidationResult<Money>
where
    F: Fn(&str) -> Option<&'a str>,
{
    Money::parse_field(field, lookup(field).unwrap_or_default(), currency)
}

/// Reads `savings[<i>].*` rows until the first missing name.
///
/// The field for the rate is spelled `intrest`; existing pages post that key.
pub fn parse_savings_rows<'a, F>(lookup: F, currency: Currency) -> ValidationResult<Vec<SavingsRow>>
where
    F: Fn(&str) -> Option<&'a str>,
{
    let mut rows = Vec::new();

    for i in 0.. {
        let key = format!("savings[{i}].");

        let name = match lookup(&format!("{key}name")).map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => break,
        };
        validate_row_name(name)?;

        let amount_field = format!("{key}amount");
        let amount = Money::parse_field(
            &amount_field,
            lookup(&amount_field).unwrap_or_default(),
            currency,
        )?;

        let rate_field = format!("{key}intrest");
        let interest_rate =
            InterestRate::parse_field(&rate_field, lookup(&rate_field).unwrap_or_default())?;

        rows.push(SavingsRow::new(name, amount, interest_rate));
    }

    Ok(rows)
}
