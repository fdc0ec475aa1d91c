use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use tower::ServiceExt;

use picofi_web::{app, AppState, WebConfig};

fn test_app() -> (AppState, Router) {
    app(&WebConfig::default())
}

async fn send(router: &Router, request: Request<Body>) -> Response {
    router.clone().oneshot(request).await.unwrap()
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn post_form(uri: &str, cookie: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// `session-id=<id>` from the response's Set-Cookie header.
fn session_cookie(response: &Response) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("session-id="))
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}

async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), 1_000_000)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn first_visit_gets_a_session_cookie() {
    let (_, router) = test_app();

    let response = send(&router, get("/", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(session_cookie(&response).is_some());

    let html = body_text(response).await;
    assert!(html.contains("<title>PicoFI | Overview</title>"));
}

#[tokio::test]
async fn simulation_shows_default_figures() {
    let (_, router) = test_app();

    let response = send(&router, get("/simulation", None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("€70,000.00"));
    assert!(html.contains("€50,000.00"));
    assert!(html.contains("€20,000.00"));
    assert!(html.contains("28.57%"));
    assert!(html.contains("value=\"Savings Account\""));
}

#[tokio::test]
async fn updated_figures_are_kept_in_the_session() {
    let (_, router) = test_app();

    let first = send(&router, get("/simulation", None)).await;
    let cookie = session_cookie(&first).unwrap();

    let response = send(
        &router,
        post_form("/simulation", Some(&cookie), "income=100000&expenses=20000"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("€80,000.00"));
    assert!(html.contains("80.00%"));

    let html = body_text(send(&router, get("/simulation", Some(&cookie))).await).await;
    assert!(html.contains("value=\"100000.00\""));
    assert!(html.contains("80.00%"));
}

#[tokio::test]
async fn savings_rows_replace_the_old_ones() {
    let (_, router) = test_app();

    let first = send(&router, get("/simulation", None)).await;
    let cookie = session_cookie(&first).unwrap();

    let body = "savings%5B0%5D.name=Deposit&savings%5B0%5D.amount=1000&savings%5B0%5D.intrest=1.5\
                &savings%5B1%5D.name=Stocks&savings%5B1%5D.amount=2500.50&savings%5B1%5D.intrest=6";
    let response = send(&router, post_form("/simulation/savings", Some(&cookie), body)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(send(&router, get("/simulation", Some(&cookie))).await).await;
    assert!(html.contains("value=\"Deposit\""));
    assert!(html.contains("value=\"Stocks\""));
    assert!(html.contains("value=\"1.50\""));
    assert!(html.contains("€3,500.50"));
    assert!(!html.contains("value=\"Savings Account\""));
}

#[tokio::test]
async fn runaway_interest_reports_overflow_instead_of_wrapping() {
    let (_, router) = test_app();

    let body = "savings%5B0%5D.name=Moonshot&savings%5B0%5D.amount=100000000000\
                &savings%5B0%5D.intrest=10000000000000";
    let response = send(&router, post_form("/simulation/savings", None, body)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response)
        .await
        .contains("amount is too large to calculate with"));
}

#[tokio::test]
async fn malformed_numbers_are_rejected() {
    let (_, router) = test_app();

    let response = send(
        &router,
        post_form("/simulation", None, "income=lots&expenses=100"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response).await.contains("income is not a valid number"));

    let body = "savings%5B0%5D.name=Deposit&savings%5B0%5D.amount=x&savings%5B0%5D.intrest=1";
    let response = send(&router, post_form("/simulation/savings", None, body)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn impossible_figures_are_rejected_and_not_saved() {
    let (_, router) = test_app();

    let first = send(&router, get("/simulation", None)).await;
    let cookie = session_cookie(&first).unwrap();

    let response = send(
        &router,
        post_form("/simulation", Some(&cookie), "income=-100000&expenses=10000"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response)
        .await
        .contains("income can't be negative, don't include debt here"));

    let response = send(
        &router,
        post_form("/simulation", Some(&cookie), "income=100000&expenses=-10000"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let html = body_text(send(&router, get("/simulation", Some(&cookie))).await).await;
    assert!(html.contains("value=\"70000.00\""));
}

#[tokio::test]
async fn zero_income_shows_the_error_inline() {
    let (_, router) = test_app();

    let response = send(&router, post_form("/simulation", None, "income=0&expenses=0")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response)
        .await
        .contains("error: savings rate is undefined for an income of zero"));
}

#[tokio::test]
async fn unknown_session_gets_a_new_cookie() {
    let (_, router) = test_app();

    let response = send(&router, get("/simulation", Some("session-id=long-gone"))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = session_cookie(&response).unwrap();
    assert_ne!(cookie, "session-id=long-gone");
}

#[tokio::test]
async fn known_session_is_not_reissued() {
    let (_, router) = test_app();

    let first = send(&router, get("/", None)).await;
    let cookie = session_cookie(&first).unwrap();

    let response = send(&router, get("/past", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(session_cookie(&response).is_none());
}

#[tokio::test]
async fn updates_force_a_recompile() {
    let (state, router) = test_app();

    let first = send(&router, get("/simulation", None)).await;
    let cookie = session_cookie(&first).unwrap();
    send(&router, get("/simulation", Some(&cookie))).await;
    assert_eq!(state.pages.compile_count(), 1);

    send(
        &router,
        post_form("/simulation", Some(&cookie), "income=90000&expenses=45000"),
    )
    .await;
    assert_eq!(state.pages.compile_count(), 2);
}

#[tokio::test]
async fn options_and_unsupported_methods() {
    let (_, router) = test_app();

    let request = Request::builder()
        .method("OPTIONS")
        .uri("/simulation")
        .body(Body::empty())
        .unwrap();
    let response = send(&router, request).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(response.headers()[header::ALLOW], "GET, POST, OPTIONS");

    let request = Request::builder()
        .method("DELETE")
        .uri("/simulation")
        .body(Body::empty())
        .unwrap();
    let response = send(&router, request).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

    let response = send(&router, post_form("/past", None, "")).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn serves_the_stylesheet() {
    let (_, router) = test_app();

    let response = send(&router, get("/static/style.css", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/css; charset=utf-8"
    );
}
