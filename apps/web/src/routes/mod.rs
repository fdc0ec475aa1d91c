//! HTTP routes.
//!
//! ```text
//! GET      /                    overview page
//! GET      /past                past page
//! GET      /simulation          simulation page for the visitor's session
//! POST     /simulation          replace income and expenses
//! POST     /simulation/savings  replace the savings rows
//! GET      /static/style.css    stylesheet
//! OPTIONS  (page routes)        204 with Allow
//! ```
//!
//! Any other method on a known path is answered with 405 by the method
//! router.

pub mod assets;
pub mod pages;
pub mod simulation;

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::state::AppState;

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::overview).options(allow("GET, OPTIONS")))
        .route("/past", get(pages::past).options(allow("GET, OPTIONS")))
        .route(
            "/simulation",
            get(simulation::show)
                .post(simulation::update)
                .options(allow("GET, POST, OPTIONS")),
        )
        .route(
            "/simulation/savings",
            post(simulation::update_savings).options(allow("POST, OPTIONS")),
        )
        .route("/static/style.css", get(assets::style))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// OPTIONS handler answering 204 with the route's allowed methods.
fn allow(methods: &'static str) -> impl Fn() -> std::future::Ready<Response> + Clone + Send + Sync + 'static {
    move || {
        let response = (
            StatusCode::NO_CONTENT,
            [(header::ALLOW, HeaderValue::from_static(methods))],
        )
            .into_response();
        std::future::ready(response)
    }
}

/// Renders a page through the shared cache.
fn render_page<T>(state: &AppState, name: &str, data: &T, force_refresh: bool) -> Result<Html<Vec<u8>>, ApiError>
where
    T: Serialize + ?Sized,
{
    let body = state
        .pages
        .render(name, &state.functions, data, force_refresh)?;
    Ok(Html(body))
}
