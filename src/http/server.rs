//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with all page and API handlers
//! - Wire up middleware (access control, tracing, timeout, request id, CORS)
//! - Own the shared application state (config, upstream clients, sessions)
//! - Serve over plain TCP or TLS with graceful shutdown

use std::io;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, HeaderMap, HeaderValue, Method},
    middleware,
    routing::get,
    Router,
};
use axum_server::tls_rustls::RustlsConfig;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::{CorsConfig, DashboardConfig};
use crate::http::handlers::{auth, pages, players, status};
use crate::http::middleware::access_control_middleware;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer, track_requests};
use crate::identity::{IdentityClient, IdentityError};
use crate::lifecycle::Shutdown;
use crate::routing::{PatternError, RouteMatcher};
use crate::session::{cookie, run_sweeper, Session, SessionStore};
use crate::stats::{StatsClient, StatsError};

/// Errors building the server from configuration.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("stats client: {0}")]
    Stats(#[from] StatsError),

    #[error("identity client: {0}")]
    Identity(#[from] IdentityError),

    #[error("protected routes: {0}")]
    Routes(#[from] PatternError),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<DashboardConfig>,
    pub stats: StatsClient,
    pub identity: IdentityClient,
    pub sessions: SessionStore,
    pub protected: Arc<RouteMatcher>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Result<Self, StartupError> {
        let stats = StatsClient::new(&config.stats_api)?;
        let identity = IdentityClient::new(&config.identity)?;
        let protected = RouteMatcher::from_patterns(&config.access.protected_routes)?;
        let sessions = SessionStore::new(config.session.ttl_secs, config.session.login_state_ttl_secs);

        Ok(Self {
            config: Arc::new(config),
            stats,
            identity,
            sessions,
            protected: Arc::new(protected),
        })
    }

    /// Live session referenced by the request's cookie.
    pub fn current_session(&self, headers: &HeaderMap) -> Option<Session> {
        cookie::session_id(headers, &self.config.session.cookie_name)
            .and_then(|id| self.sessions.get(&id))
    }

    /// Cookies get `Secure` when the dashboard is served over https.
    pub fn secure_cookies(&self) -> bool {
        self.identity.base_url().starts_with("https://")
    }
}

/// HTTP server for the dashboard.
pub struct DashboardServer {
    router: Router,
    state: AppState,
}

impl DashboardServer {
    /// Create a new server with the given configuration.
    pub fn new(config: DashboardConfig) -> Result<Self, StartupError> {
        let state = AppState::new(config)?;
        let router = Self::build_router(state.clone());
        Ok(Self { router, state })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(state: AppState) -> Router {
        let config = state.config.clone();

        let router = Router::new()
            .route("/", get(pages::dashboard_page))
            .route("/dashboard", get(pages::dashboard_page))
            .route("/login", get(pages::login_page))
            .route("/verify-email", get(pages::verify_email_page))
            .route("/verify", get(pages::verify_page))
            .route("/api/auth/login", get(auth::login))
            .route("/api/auth/callback", get(auth::callback))
            .route("/api/auth/logout", get(auth::logout))
            .route("/api/auth/me", get(auth::me))
            .route("/api/auth/verify-email", get(auth::verify_email))
            .route("/api/auth/resend-verification", get(auth::resend_verification))
            .route("/api/players/compare", get(players::compare))
            .route("/api/players/season-averages", get(players::season_averages))
            .route("/api/status", get(status::get_status))
            .route_layer(middleware::from_fn(track_requests))
            .layer(middleware::from_fn_with_state(state.clone(), access_control_middleware))
            .with_state(state);

        let router = match cors_layer(&config.cors) {
            Some(cors) => router.layer(cors),
            None => router,
        };

        router
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }

    /// The fully layered router.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.state.config
    }

    /// Start background tasks tied to the shutdown signal.
    pub fn spawn_background(&self, shutdown: &Shutdown) {
        let interval = Duration::from_secs(self.state.config.session.sweep_interval_secs);
        tokio::spawn(run_sweeper(self.state.sessions.clone(), interval, shutdown.subscribe()));
    }

    /// Serve plain HTTP until shutdown is signalled.
    pub async fn run(self, listener: TcpListener, mut shutdown: broadcast::Receiver<()>) -> io::Result<()> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Serve HTTPS until shutdown is signalled.
    pub async fn run_tls(
        self,
        listener: std::net::TcpListener,
        tls: RustlsConfig,
        mut shutdown: broadcast::Receiver<()>,
    ) -> io::Result<()> {
        let addr = listener.local_addr()?;
        listener.set_nonblocking(true)?;
        tracing::info!(address = %addr, "HTTPS server starting");

        let handle = axum_server::Handle::new();
        let stopper = handle.clone();
        tokio::spawn(async move {
            let _ = shutdown.recv().await;
            stopper.graceful_shutdown(Some(Duration::from_secs(10)));
        });

        axum_server::from_tcp_rustls(listener, tls)
            .handle(handle)
            .serve(self.router.into_make_service())
            .await?;

        tracing::info!("HTTPS server stopped");
        Ok(())
    }
}

fn cors_layer(config: &CorsConfig) -> Option<CorsLayer> {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o.trim_end_matches('/')).ok())
        .collect();
    if origins.is_empty() {
        return None;
    }

    Some(
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            .allow_credentials(true),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_disabled_without_origins() {
        assert!(cors_layer(&CorsConfig::default()).is_none());
        let config = CorsConfig {
            allowed_origins: vec!["https://dash.example.com/".into()],
        };
        assert!(cors_layer(&config).is_some());
    }
}
