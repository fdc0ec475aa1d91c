//! Simulation page: show and update the visitor's figures.
//!
//! Updates are read completely, checked, and only then stored, so a rejected
//! form leaves the session untouched. After a successful update the page is
//! rendered with a forced refresh.

use std::collections::HashMap;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Form;
use axum_extra::extract::cookie::CookieJar;
use tracing::info;

use picofi_core::form;

use crate::error::ApiError;
use crate::session::{self, ActiveSession};
use crate::state::AppState;
use crate::templates::page;
use crate::view::SimulationView;

use super::render_page;

/// `GET /simulation`
pub async fn show(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, ApiError> {
    let active = session::resolve(&state.sessions, jar)?;
    respond(&state, active, false)
}

/// `POST /simulation`: replaces income and expenses.
///
/// Figures the calculator refuses (negative income, savings above income)
/// are rejected with 400. A zero income is accepted; the page shows the
/// undefined rate inline.
pub async fn update(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(fields): Form<HashMap<String, String>>,
) -> Result<impl IntoResponse, ApiError> {
    let lookup = |key: &str| fields.get(key).map(String::as_str);
    let currency = state.calculator.currency();

    let income = form::parse_money_field(lookup, "income", currency)?;
    let expenses = form::parse_money_field(lookup, "expenses", currency)?;
    state.calculator.annual_savings(income, expenses)?;

    let active = session::resolve(&state.sessions, jar)?;
    let updated = active.session.with_figures(income, expenses);
    let active = active.save(&state.sessions, updated)?;
    info!(session_id = %active.id, "simulation figures updated");

    respond(&state, active, true)
}

/// `POST /simulation/savings`: replaces the savings rows wholesale.
pub async fn update_savings(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(fields): Form<HashMap<String, String>>,
) -> Result<impl IntoResponse, ApiError> {
    let lookup = |key: &str| fields.get(key).map(String::as_str);
    let rows = form::parse_savings_rows(lookup, state.calculator.currency())?;

    let active = session::resolve(&state.sessions, jar)?;
    let updated = active.session.with_savings(rows);
    let active = active.save(&state.sessions, updated)?;
    info!(session_id = %active.id, rows = active.session.savings.len(), "savings rows updated");

    respond(&state, active, true)
}

fn respond(
    state: &AppState,
    active: ActiveSession,
    force_refresh: bool,
) -> Result<impl IntoResponse, ApiError> {
    let view = SimulationView::build(&state.calculator, &active.session, active.expires_at);
    let html = render_page(state, page::SIMULATION, &view, force_refresh)?;
    Ok((active.jar, html))
}
