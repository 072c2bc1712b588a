//! Access control on protected pages and API routes.

use std::sync::atomic::Ordering;

use axum::http::StatusCode;
use serde_json::json;

mod common;
use common::{body_json, body_text, location, TestApp};

#[tokio::test]
async fn test_no_session_redirects_to_login() {
    let app = TestApp::start().await;

    for path in ["/", "/dashboard", "/dashboard?season=2022"] {
        let response = app.get(path, None).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{path}");
        assert_eq!(location(&response), "/login");
    }
}

#[tokio::test]
async fn test_no_session_api_is_unauthorized() {
    let app = TestApp::start().await;

    let response = app.get("/api/players/compare?playerIds=1,2", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await, json!({ "error": "Unauthorized" }));
    assert!(app.stats.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_unverified_session_redirects_to_verify_email() {
    let app = TestApp::start().await;
    let cookie = app.sign_in(false);

    let response = app.get("/dashboard", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/verify-email");
    assert_eq!(app.identity.lookups.load(Ordering::SeqCst), 1);

    let response = app.get("/api/players/season-averages", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await, json!({ "error": "Email not verified" }));
}

#[tokio::test]
async fn test_identity_failure_fails_closed() {
    let app = TestApp::start().await;
    app.identity.verified.store(true, Ordering::SeqCst);
    app.identity.fail.store(true, Ordering::SeqCst);
    let cookie = app.sign_in(false);

    let response = app.get("/", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/verify-email");
}

#[tokio::test]
async fn test_newly_verified_user_passes_and_is_remembered() {
    let app = TestApp::start().await;
    app.identity.verified.store(true, Ordering::SeqCst);
    let cookie = app.sign_in(false);

    let response = app.get("/", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(app.identity.lookups.load(Ordering::SeqCst), 1);

    // The session now carries the verified flag; no second lookup.
    let response = app.get("/dashboard", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(app.identity.lookups.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_verified_session_sees_dashboard() {
    let app = TestApp::start().await;
    let cookie = app.sign_in(true);

    let response = app.get("/dashboard?season=2022", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Charlotte Hornets Dashboard"));
    assert!(html.contains("Hugo Fan"));
    assert!(html.contains("<td>LaMelo Ball</td>"));
    assert!(html.contains("<td>23.9</td>"));
    assert!(html.contains(r#"<option value="2022" selected>"#));
    assert_eq!(app.identity.lookups.load(Ordering::SeqCst), 0);

    let averages = app.stats.calls_to("/season_averages");
    assert_eq!(averages.len(), 1);
    assert_eq!(averages[0].values("season"), vec!["2022"]);
}

#[tokio::test]
async fn test_expired_or_unknown_cookie_is_no_session() {
    let app = TestApp::start().await;
    let cookie = format!("appSession={}", uuid::Uuid::new_v4());

    let response = app.get("/", Some(&cookie)).await;
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn test_unprotected_routes_pass_through() {
    let app = TestApp::start().await;

    let response = app.get("/api/status", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "operational");

    let response = app.get("/login", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("/api/auth/login"));
}

#[tokio::test]
async fn test_dashboard_placeholder_and_error() {
    let app = TestApp::start().await;
    let cookie = app.sign_in(true);

    let response = app.get("/?season=1999", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("No season averages recorded"));

    app.stats.fail.store(true, Ordering::SeqCst);
    let response = app.get("/", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("unavailable right now"));
    assert!(!html.contains("upstream exploded"));
}
