//! Static pages.
//!
//! Their markup never depends on session data, so they render from the
//! cached template without a refresh. The session is still resolved so a
//! first visit on any page hands out the cookie.

use axum::extract::State;
use axum::response::IntoResponse;
use axum_extra::extract::cookie::CookieJar;

use crate::error::ApiError;
use crate::session;
use crate::state::AppState;
use crate::templates::page;
use crate::view::PageView;

use super::render_page;

/// `GET /`: introduction and a consolidated view of one's situation.
pub async fn overview(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, ApiError> {
    let active = session::resolve(&state.sessions, jar)?;
    let html = render_page(&state, page::OVERVIEW, &PageView::new("Overview"), false)?;
    Ok((active.jar, html))
}

/// `GET /past`: steps for indexing one's financial past.
pub async fn past(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, ApiError> {
    let active = session::resolve(&state.sessions, jar)?;
    let html = render_page(&state, page::PAST, &PageView::new("Past"), false)?;
    Ok((active.jar, html))
}
