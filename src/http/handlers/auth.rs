//! Sign-in, sign-out and email verification endpoints.
//!
//! # Design Decisions
//! - The OAuth `state` parameter is a single-use token held in the session store
//! - Login failures of any kind land on `/login?error=true`; details are logged
//! - Verification status may only be queried for the signed-in user

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::identity::IdentityError;
use crate::session::{cookie, Session, SessionUser};

pub const CALLBACK_PATH: &str = "/api/auth/callback";
const LOGIN_ERROR_PATH: &str = "/login?error=true";

#[derive(Debug, Deserialize)]
pub struct LoginParams {
    #[serde(rename = "returnTo")]
    pub return_to: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VerifyEmailParams {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

#[derive(Debug, Error)]
enum LoginError {
    #[error("provider returned {error}: {description}")]
    Provider { error: String, description: String },

    #[error("callback is missing the authorization code")]
    MissingCode,

    #[error("unknown or expired login state")]
    UnknownState,

    #[error(transparent)]
    Identity(#[from] IdentityError),
}

/// Only same-site absolute paths are honoured as post-login targets.
fn safe_return_to(raw: Option<&str>) -> String {
    match raw {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path.to_string()
        }
        _ => "/".to_string(),
    }
}

fn callback_uri(state: &AppState) -> String {
    format!("{}{CALLBACK_PATH}", state.identity.base_url())
}

/// `GET /api/auth/login`
pub async fn login(State(state): State<AppState>, Query(params): Query<LoginParams>) -> Response {
    let return_to = safe_return_to(params.return_to.as_deref());
    let login_state = state.sessions.begin_login(&return_to);

    match state.identity.authorize_url(Some(&login_state), &callback_uri(&state), None) {
        Ok(url) => Redirect::to(url.as_str()).into_response(),
        Err(e) => {
            error!(error = %e, "Could not build authorize URL");
            Redirect::to(LOGIN_ERROR_PATH).into_response()
        }
    }
}

async fn finish_login(state: &AppState, params: CallbackParams) -> Result<(Session, String), LoginError> {
    if let Some(error) = params.error {
        return Err(LoginError::Provider {
            error,
            description: params.error_description.unwrap_or_default(),
        });
    }
    let return_to = params
        .state
        .as_deref()
        .and_then(|s| state.sessions.complete_login(s))
        .ok_or(LoginError::UnknownState)?;
    let code = params.code.ok_or(LoginError::MissingCode)?;

    let tokens = state.identity.exchange_code(&code, &callback_uri(state)).await?;
    let user = state.identity.user_info(&tokens.access_token).await?;
    let session = state.sessions.create(SessionUser::from(user));
    Ok((session, return_to))
}

/// `GET /api/auth/callback`
pub async fn callback(State(state): State<AppState>, Query(params): Query<CallbackParams>) -> Response {
    match finish_login(&state, params).await {
        Ok((session, return_to)) => {
            info!(user = %session.user.sub, verified = session.user.email_verified, "User signed in");
            let cookie = cookie::session_cookie(
                &state.config.session.cookie_name,
                &session.id,
                state.config.session.ttl_secs,
                state.secure_cookies(),
            );
            ([(header::SET_COOKIE, cookie)], Redirect::to(&return_to)).into_response()
        }
        Err(e) => {
            warn!(error = %e, "Login failed");
            Redirect::to(LOGIN_ERROR_PATH).into_response()
        }
    }
}

/// `GET /api/auth/logout`
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(id) = cookie::session_id(&headers, &state.config.session.cookie_name) {
        if let Some(session) = state.sessions.remove(&id) {
            info!(user = %session.user.sub, "User signed out");
        }
    }

    let clear = cookie::clear_cookie(&state.config.session.cookie_name, state.secure_cookies());
    let target = match state.identity.logout_url(state.identity.base_url()) {
        Ok(url) => url.to_string(),
        Err(e) => {
            warn!(error = %e, "Could not build logout URL");
            crate::http::middleware::access_control::LOGIN_PATH.to_string()
        }
    };
    ([(header::SET_COOKIE, clear)], Redirect::to(&target)).into_response()
}

/// `GET /api/auth/me`
pub async fn me(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<SessionUser>, ApiError> {
    state
        .current_session(&headers)
        .map(|s| Json(s.user))
        .ok_or(ApiError::Unauthorized)
}

/// `GET /api/auth/verify-email?userId=`
pub async fn verify_email(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<VerifyEmailParams>,
) -> Result<Json<Value>, ApiError> {
    let session = state.current_session(&headers).ok_or(ApiError::Unauthorized)?;
    let user_id = params
        .user_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("User ID is required".into()))?;
    if user_id != session.user.sub {
        return Err(ApiError::Forbidden(
            "Cannot check verification status of another user".into(),
        ));
    }

    let verified = state.identity.email_verified(&user_id).await.map_err(|e| {
        error!(user = %user_id, error = %e, "Verification status lookup failed");
        ApiError::Internal("Failed to check email verification status".into())
    })?;
    state.sessions.mark_verified(&session.id, verified);

    Ok(Json(json!({ "email_verified": verified })))
}

/// `GET /api/auth/resend-verification`
pub async fn resend_verification(State(state): State<AppState>, headers: HeaderMap) -> Result<Redirect, ApiError> {
    let session = state.current_session(&headers).ok_or(ApiError::Unauthorized)?;

    state
        .identity
        .send_verification_email(&session.user.sub)
        .await
        .map_err(|e| {
            error!(user = %session.user.sub, error = %e, "Verification email request failed");
            ApiError::Internal("Failed to send verification email".into())
        })?;

    info!(user = %session.user.sub, "Verification email requested");
    Ok(Redirect::to(&format!("{}/verify-email", state.identity.base_url())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_return_to_stays_on_site() {
        assert_eq!(safe_return_to(Some("/dashboard?season=2022")), "/dashboard?season=2022");
        assert_eq!(safe_return_to(None), "/");
        assert_eq!(safe_return_to(Some("https://evil.example.com")), "/");
        assert_eq!(safe_return_to(Some("//evil.example.com")), "/");
        assert_eq!(safe_return_to(Some("/\\evil.example.com")), "/");
    }
}
