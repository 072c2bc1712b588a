//! Server-rendered pages.

use axum::{
    body::Body,
    extract::{Query, State},
    http::{HeaderMap, Request},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::{error, warn};

use crate::http::handlers::parse_season;
use crate::http::middleware::access_control::LOGIN_PATH;
use crate::http::server::AppState;
use crate::session::SessionUser;
use crate::stats::service::team_dashboard;
use crate::views::{self, dashboard::{DashboardPage, StatsView}};

/// Seasons offered by the dashboard's selector.
const SEASON_CHOICES: u32 = 5;

#[derive(Debug, Default, Deserialize)]
pub struct LoginPageParams {
    pub error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DashboardParams {
    pub season: Option<String>,
}

fn season_choices(latest: u32, selected: u32) -> Vec<u32> {
    let mut seasons: Vec<u32> = (0..SEASON_CHOICES).map(|i| latest.saturating_sub(i)).collect();
    if !seasons.contains(&selected) {
        seasons.push(selected);
        seasons.sort_unstable_by(|a, b| b.cmp(a));
    }
    seasons
}

/// `GET /login`
pub async fn login_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<LoginPageParams>,
) -> Response {
    if state.current_session(&headers).is_some() {
        return Redirect::to("/").into_response();
    }
    let error = params.error.as_deref() == Some("true");
    Html(views::login::render(&state.config.stats_api.team_name, error)).into_response()
}

/// `GET /` and `GET /dashboard`
pub async fn dashboard_page(
    State(state): State<AppState>,
    Query(params): Query<DashboardParams>,
    request: Request<Body>,
) -> Response {
    let user = match request.extensions().get::<SessionUser>().cloned() {
        Some(user) => user,
        None => match state.current_session(request.headers()) {
            Some(session) => session.user,
            None => return Redirect::to(LOGIN_PATH).into_response(),
        },
    };

    let config = &state.config.stats_api;
    let season = parse_season(params.season.as_deref(), config.dashboard_season)
        .unwrap_or(config.dashboard_season);
    let latest = config.comparison_season.max(config.dashboard_season);
    let seasons = season_choices(latest, season);

    let rows = team_dashboard(&state.stats, config.team_id, season).await;
    let stats = match &rows {
        Ok(rows) => StatsView::Loaded(rows),
        Err(e) => {
            error!(team_id = config.team_id, season, error = %e, "Dashboard stats fetch failed");
            StatsView::Failed
        }
    };

    Html(views::dashboard::render(&DashboardPage {
        team_name: &config.team_name,
        user_name: user.display_name(),
        season,
        seasons: &seasons,
        stats,
    }))
    .into_response()
}

/// `GET /verify-email`
pub async fn verify_email_page(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let Some(session) = state.current_session(&headers) else {
        return Redirect::to(LOGIN_PATH).into_response();
    };

    match state.identity.email_verified(&session.user.sub).await {
        Ok(true) => {
            state.sessions.mark_verified(&session.id, true);
            return Redirect::to("/").into_response();
        }
        Ok(false) => {}
        Err(e) => warn!(user = %session.user.sub, error = %e, "Verification status lookup failed"),
    }

    Html(views::verify::render_verify_email(session.user.email.as_deref())).into_response()
}

/// `GET /verify`
pub async fn verify_page(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let Some(session) = state.current_session(&headers) else {
        return Redirect::to(LOGIN_PATH).into_response();
    };
    if session.user.email_verified {
        return Redirect::to("/dashboard").into_response();
    }

    let redirect_uri = format!("{}/verify", state.identity.base_url());
    let resend = match state
        .identity
        .authorize_url(None, &redirect_uri, Some("verify_email"))
    {
        Ok(url) => url.to_string(),
        Err(e) => {
            warn!(error = %e, "Could not build verification URL");
            "/api/auth/resend-verification".to_string()
        }
    };

    Html(views::verify::render_verify(session.user.email.as_deref(), &resend)).into_response()
}
