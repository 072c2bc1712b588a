//! Shared utilities for integration tests: mock upstreams and a wired server.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::{
    body::Body,
    extract::{Path, RawQuery, State},
    http::{header, HeaderMap, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower::ServiceExt;

use hornets_dashboard::config::DashboardConfig;
use hornets_dashboard::session::SessionUser;
use hornets_dashboard::DashboardServer;

pub const API_KEY: &str = "test-key";
pub const USER_ID: &str = "auth0|fan";

/// Serve `router` on an ephemeral local port and return its base URL.
pub async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    format!("http://{addr}")
}

// ---------------------------------------------------------------------------
// Stats API mock
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct StatsCall {
    pub path: String,
    pub query: Vec<(String, String)>,
    pub authorization: Option<String>,
}

impl StatsCall {
    pub fn values(&self, key: &str) -> Vec<&str> {
        self.query
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }
}

#[derive(Default)]
pub struct StatsMock {
    pub calls: Mutex<Vec<StatsCall>>,
    pub fail: AtomicBool,
}

impl StatsMock {
    pub fn calls_to(&self, path: &str) -> Vec<StatsCall> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.path == path)
            .cloned()
            .collect()
    }
}

fn team(id: u64, abbr: &str, city: &str, name: &str) -> Value {
    json!({
        "id": id,
        "abbreviation": abbr,
        "city": city,
        "conference": "East",
        "division": "Southeast",
        "full_name": format!("{city} {name}"),
        "name": name,
    })
}

fn player(id: u64) -> Option<Value> {
    let (first, last, position) = match id {
        1 => ("LaMelo", "Ball", "G"),
        2 => ("Miles", "Bridges", "F"),
        _ => return None,
    };
    Some(json!({ "id": id, "first_name": first, "last_name": last, "position": position }))
}

fn average(player_id: u64, season: &str) -> Option<Value> {
    let (pts, reb, ast, fg, min) = match player_id {
        1 => (23.9, 5.1, 8.0, 0.433, "32:18"),
        2 => (21.0, 7.3, 3.3, 0.462, "37"),
        _ => return None,
    };
    Some(json!({
        "player_id": player_id,
        "season": season.parse::<u32>().unwrap_or_default(),
        "games_played": 22,
        "pts": pts,
        "reb": reb,
        "ast": ast,
        "fg_pct": fg,
        "min": min,
    }))
}

fn game_line(id: u64, player_id: u64, pts: f64, fgm_pct: f64) -> Value {
    let who = player(player_id).unwrap_or_else(|| json!({}));
    json!({
        "id": id,
        "pts": pts,
        "reb": 5,
        "ast": 4,
        "stl": 1,
        "blk": 0,
        "fgm": 8,
        "fga": 17,
        "fg_pct": fgm_pct,
        "fg3_pct": 0.4,
        "ft_pct": 0.8,
        "min": "34:30",
        "turnover": 3,
        "pf": 2,
        "game": { "id": id * 10, "date": "2024-11-02T00:00:00.000Z", "season": 2024,
                  "home_team_id": 4, "visitor_team_id": 2 },
        "team": { "id": 4, "abbreviation": "CHA" },
        "player": { "id": player_id, "first_name": who["first_name"], "last_name": who["last_name"] },
    })
}

fn record(
    mock: &StatsMock,
    path: &str,
    query: Option<String>,
    headers: &HeaderMap,
) -> Result<Vec<(String, String)>, Response> {
    let query: Vec<(String, String)> = url::form_urlencoded::parse(query.unwrap_or_default().as_bytes())
        .into_owned()
        .collect();
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    mock.calls.lock().unwrap().push(StatsCall {
        path: path.to_string(),
        query: query.clone(),
        authorization: authorization.clone(),
    });

    if mock.fail.load(Ordering::SeqCst) {
        return Err((StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").into_response());
    }
    if authorization.as_deref() != Some(API_KEY) {
        return Err((StatusCode::UNAUTHORIZED, "bad key").into_response());
    }
    Ok(query)
}

fn ids(query: &[(String, String)], key: &str) -> Vec<u64> {
    query
        .iter()
        .filter(|(k, _)| k == key)
        .filter_map(|(_, v)| v.parse().ok())
        .collect()
}

async fn teams(State(mock): State<Arc<StatsMock>>, headers: HeaderMap, RawQuery(q): RawQuery) -> Response {
    if let Err(r) = record(&mock, "/teams", q, &headers) {
        return r;
    }
    Json(json!({
        "data": [
            team(2, "BOS", "Boston", "Celtics"),
            team(4, "CHA", "Charlotte", "Hornets"),
        ]
    }))
    .into_response()
}

async fn players(State(mock): State<Arc<StatsMock>>, headers: HeaderMap, RawQuery(q): RawQuery) -> Response {
    let query = match record(&mock, "/players", q, &headers) {
        Ok(q) => q,
        Err(r) => return r,
    };
    let wanted = if ids(&query, "team_ids[]").contains(&4) {
        vec![1, 2]
    } else {
        ids(&query, "ids[]")
    };
    let data: Vec<Value> = wanted.into_iter().filter_map(player).collect();
    Json(json!({ "data": data, "meta": { "per_page": 100 } })).into_response()
}

async fn season_averages(
    State(mock): State<Arc<StatsMock>>,
    headers: HeaderMap,
    RawQuery(q): RawQuery,
) -> Response {
    let query = match record(&mock, "/season_averages", q, &headers) {
        Ok(q) => q,
        Err(r) => return r,
    };
    let season = query
        .iter()
        .find(|(k, _)| k == "season")
        .map(|(_, v)| v.clone())
        .unwrap_or_default();
    // 1999 has no recorded averages.
    let data: Vec<Value> = if season == "1999" {
        Vec::new()
    } else {
        ids(&query, "player_ids[]")
            .into_iter()
            .filter_map(|id| average(id, &season))
            .collect()
    };
    Json(json!({ "data": data })).into_response()
}

/// Player 1's log spans two pages joined by cursor 7; player 2 has one page.
async fn stats(State(mock): State<Arc<StatsMock>>, headers: HeaderMap, RawQuery(q): RawQuery) -> Response {
    let query = match record(&mock, "/stats", q, &headers) {
        Ok(q) => q,
        Err(r) => return r,
    };
    let player_id = ids(&query, "player_ids[]").first().copied().unwrap_or_default();
    let cursor = ids(&query, "cursor").first().copied();

    let body = match (player_id, cursor) {
        (1, None) => json!({ "data": [game_line(101, 1, 30.0, 0.5)], "meta": { "next_cursor": 7 } }),
        (1, Some(7)) => json!({ "data": [game_line(102, 1, 20.0, 0.4)], "meta": { "next_cursor": null } }),
        (2, _) => json!({ "data": [game_line(201, 2, 18.0, 0.45)], "meta": {} }),
        _ => json!({ "data": [], "meta": {} }),
    };
    Json(body).into_response()
}

pub async fn start_stats_mock() -> (String, Arc<StatsMock>) {
    let mock = Arc::new(StatsMock::default());
    let router = Router::new()
        .route("/teams", get(teams))
        .route("/players", get(players))
        .route("/season_averages", get(season_averages))
        .route("/stats", get(stats))
        .with_state(mock.clone());
    (serve(router).await, mock)
}

// ---------------------------------------------------------------------------
// Identity provider mock
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct IdentityMock {
    /// Verification status reported by the management API.
    pub verified: AtomicBool,
    /// Management API answers 500 when set.
    pub fail: AtomicBool,
    pub lookups: AtomicUsize,
    pub emails_sent: AtomicUsize,
}

async fn token(Json(body): Json<Value>) -> Response {
    match body["grant_type"].as_str() {
        Some("authorization_code") if body["code"] == "good-code" => {
            Json(json!({ "access_token": "user-token", "token_type": "Bearer", "expires_in": 86400 }))
                .into_response()
        }
        Some("client_credentials") => {
            Json(json!({ "access_token": "mgmt-token", "token_type": "Bearer" })).into_response()
        }
        _ => (StatusCode::FORBIDDEN, Json(json!({ "error": "invalid_grant" }))).into_response(),
    }
}

async fn userinfo(State(mock): State<Arc<IdentityMock>>, headers: HeaderMap) -> Response {
    if headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) != Some("Bearer user-token") {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(json!({
        "sub": USER_ID,
        "name": "Hugo Fan",
        "email": "fan@example.com",
        "email_verified": mock.verified.load(Ordering::SeqCst),
    }))
    .into_response()
}

fn management_allowed(mock: &IdentityMock, headers: &HeaderMap) -> Result<(), Response> {
    if mock.fail.load(Ordering::SeqCst) {
        return Err((StatusCode::INTERNAL_SERVER_ERROR, "management API down").into_response());
    }
    if headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) != Some("Bearer mgmt-token") {
        return Err(StatusCode::UNAUTHORIZED.into_response());
    }
    Ok(())
}

async fn user_record(
    State(mock): State<Arc<IdentityMock>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    mock.lookups.fetch_add(1, Ordering::SeqCst);
    if let Err(r) = management_allowed(&mock, &headers) {
        return r;
    }
    Json(json!({
        "user_id": id,
        "email": "fan@example.com",
        "email_verified": mock.verified.load(Ordering::SeqCst),
    }))
    .into_response()
}

async fn verification_job(
    State(mock): State<Arc<IdentityMock>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(r) = management_allowed(&mock, &headers) {
        return r;
    }
    if body["user_id"] != USER_ID {
        return StatusCode::BAD_REQUEST.into_response();
    }
    mock.emails_sent.fetch_add(1, Ordering::SeqCst);
    (StatusCode::CREATED, Json(json!({ "type": "verification_email", "status": "pending" }))).into_response()
}

pub async fn start_identity_mock() -> (String, Arc<IdentityMock>) {
    let mock = Arc::new(IdentityMock::default());
    let router = Router::new()
        .route("/oauth/token", post(token))
        .route("/userinfo", get(userinfo))
        .route("/api/v2/users/{id}", get(user_record))
        .route("/api/v2/jobs/verification-email", post(verification_job))
        .with_state(mock.clone());
    (serve(router).await, mock)
}

// ---------------------------------------------------------------------------
// Dashboard under test
// ---------------------------------------------------------------------------

pub fn test_config(stats_url: &str, identity_url: &str) -> DashboardConfig {
    let mut config = DashboardConfig::default();
    config.stats_api.base_url = stats_url.to_string();
    config.stats_api.api_key = API_KEY.to_string();
    config.identity.issuer_base_url = identity_url.to_string();
    config.identity.base_url = "http://localhost:3000".to_string();
    config.identity.client_id = "web-client".to_string();
    config.identity.client_secret = "web-secret".to_string();
    config.identity.m2m_client_id = "m2m-client".to_string();
    config.identity.m2m_client_secret = "m2m-secret".to_string();
    config
}

pub struct TestApp {
    pub server: DashboardServer,
    pub stats: Arc<StatsMock>,
    pub identity: Arc<IdentityMock>,
}

impl TestApp {
    pub async fn start() -> Self {
        let (stats_url, stats) = start_stats_mock().await;
        let (identity_url, identity) = start_identity_mock().await;
        let server = DashboardServer::new(test_config(&stats_url, &identity_url)).unwrap();
        Self { server, stats, identity }
    }

    /// Create a session directly and return its cookie header value.
    pub fn sign_in(&self, verified: bool) -> String {
        let session = self.server.state().sessions.create(SessionUser {
            sub: USER_ID.to_string(),
            name: Some("Hugo Fan".to_string()),
            email: Some("fan@example.com".to_string()),
            email_verified: verified,
            picture: None,
        });
        format!("appSession={}", session.id)
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response {
        let mut request = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        self.server
            .router()
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }
}

pub fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

pub async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
