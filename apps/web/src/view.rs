//! Data handed to page templates.
//!
//! Templates address fields by their kebab-case names, e.g.
//! `{{ annual-income }}` or `{{#each savings}}{{ .amount-input }}{{/each}}`.
//! Money fields serialize as `{"minor":..,"currency":..}` and print with their
//! symbol; the `*-input` fields are plain decimals for pre-filling forms.

use chrono::{DateTime, Utc};
use serde::Serialize;

use picofi_core::{Calculator, Money, Session, DEFAULT_PROJECTION_YEARS};

/// Data for the static pages.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct PageView {
    pub title: &'static str,
}

impl PageView {
    pub fn new(title: &'static str) -> Self {
        PageView { title }
    }
}

/// Data for the simulation page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct SimulationView {
    pub title: &'static str,
    pub currency: &'static str,
    pub annual_income: Money,
    pub annual_expenses: Money,
    pub income_input: String,
    pub expenses_input: String,
    pub savings: Vec<RowView>,
    /// Index for the blank "add a row" line.
    pub next_index: usize,
    pub total_savings: Option<Money>,
    pub projection: Vec<ProjectionRow>,
    pub projection_error: Option<String>,
    pub expires_at: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct RowView {
    pub index: usize,
    pub name: String,
    pub amount: Money,
    pub amount_input: String,
    pub rate: String,
    pub rate_input: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ProjectionRow {
    pub year: u32,
    pub savings_balance: Money,
    pub contributions: Money,
    pub total: Money,
}

impl SimulationView {
    pub fn build(calculator: &Calculator, session: &Session, expires_at: DateTime<Utc>) -> Self {
        let savings: Vec<RowView> = session
            .savings
            .iter()
            .enumerate()
            .map(|(index, row)| RowView {
                index,
                name: row.name.clone(),
                amount: row.amount,
                amount_input: row.amount.to_decimal_string(),
                rate: row.interest_rate.to_string(),
                rate_input: row.interest_rate.to_decimal_string(),
            })
            .collect();

        let (projection, projection_error) =
            match calculator.project(session, DEFAULT_PROJECTION_YEARS) {
                Ok(years) => (
                    years
                        .into_iter()
                        .map(|y| ProjectionRow {
                            year: y.year,
                            savings_balance: y.savings_balance,
                            contributions: y.contributions,
                            total: y.total,
                        })
                        .collect(),
                    None,
                ),
                Err(e) => (Vec::new(), Some(e.to_string())),
            };

        SimulationView {
            title: "Simulation",
            currency: calculator.currency().code(),
            annual_income: session.annual_income,
            annual_expenses: session.annual_expenses,
            income_input: session.annual_income.to_decimal_string(),
            expenses_input: session.annual_expenses.to_decimal_string(),
            next_index: savings.len(),
            savings,
            total_savings: calculator.total_savings(&session.savings).ok(),
            projection,
            projection_error,
            expires_at: expires_at.format("%Y-%m-%d %H:%M UTC").to_string(),
        }
    }
}
