//! Access Control Middleware.
//! Enforces sign-in and email verification on protected routes.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tracing::{debug, warn};

use crate::http::request::request_id;
use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::routing::RouteMatcher;

pub const LOGIN_PATH: &str = "/login";
pub const VERIFY_EMAIL_PATH: &str = "/verify-email";

pub async fn access_control_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let path = req.uri().path().to_string();

    // 1. Unprotected routes pass through untouched.
    if !state.protected.matches(&path) {
        return next.run(req).await;
    }
    let is_api = RouteMatcher::is_api(&path);
    let request_id = request_id(req.headers()).to_string();

    // 2. Require a live session.
    let session = match state.current_session(req.headers()) {
        Some(s) => s,
        None => {
            debug!(request_id = %request_id, path = %path, "No session for protected route");
            return if is_api {
                ApiError::Unauthorized.into_response()
            } else {
                Redirect::to(LOGIN_PATH).into_response()
            };
        }
    };

    // 3. Require a verified email, asking the provider when the session says no.
    let mut user = session.user;
    if state.config.access.require_verified_email && !user.email_verified {
        match state.identity.email_verified(&user.sub).await {
            Ok(verified) => {
                state.sessions.mark_verified(&session.id, verified);
                user.email_verified = verified;
            }
            Err(e) => {
                // Fail closed: an unknown status counts as unverified.
                warn!(request_id = %request_id, error = %e, "Verification lookup failed");
            }
        }

        if !user.email_verified {
            debug!(request_id = %request_id, path = %path, "Email not verified");
            return if is_api {
                ApiError::Forbidden("Email not verified".into()).into_response()
            } else {
                Redirect::to(VERIFY_EMAIL_PATH).into_response()
            };
        }
    }

    // 4. Attach the user for handlers.
    req.extensions_mut().insert(user);
    next.run(req).await
}
