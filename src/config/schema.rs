//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the dashboard.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the dashboard server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct DashboardConfig {
    /// Listener configuration (bind address, TLS).
    pub listener: ListenerConfig,

    /// Upstream stats API settings.
    pub stats_api: StatsApiConfig,

    /// Identity provider settings.
    pub identity: IdentityConfig,

    /// Session cookie and lifetime settings.
    pub session: SessionConfig,

    /// Access-control gate settings.
    pub access: AccessConfig,

    /// Cross-origin settings.
    pub cors: CorsConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,

    /// Optional TLS configuration.
    pub tls: Option<TlsConfig>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            tls: None,
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

/// Stats API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StatsApiConfig {
    /// Base URL including the version segment.
    pub base_url: String,

    /// API key sent verbatim in the `Authorization` header.
    pub api_key: String,

    /// Team shown on the dashboard.
    pub team_id: u64,

    /// Display name of the dashboard team.
    pub team_name: String,

    /// Season shown on the dashboard when none is selected.
    pub dashboard_season: u32,

    /// Season used by the comparison API when none is given.
    pub comparison_season: u32,

    /// Page size for list endpoints (upstream maximum is 100).
    pub per_page: u32,

    /// Upper bound on cursor pages followed for one game log.
    pub max_pages: u32,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for StatsApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.balldontlie.io/v1".to_string(),
            api_key: String::new(),
            team_id: 4,
            team_name: "Charlotte Hornets".to_string(),
            dashboard_season: 2023,
            comparison_season: 2024,
            per_page: 100,
            max_pages: 5,
            timeout_secs: 10,
        }
    }
}

/// Identity provider configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Tenant base URL, e.g. "https://tenant.us.auth0.com".
    pub issuer_base_url: String,

    /// Public base URL of this dashboard, used for redirects.
    pub base_url: String,

    /// Regular web application client.
    pub client_id: String,
    pub client_secret: String,

    /// Machine-to-machine client for the management API.
    pub m2m_client_id: String,
    pub m2m_client_secret: String,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            issuer_base_url: String::new(),
            base_url: "http://localhost:3000".to_string(),
            client_id: String::new(),
            client_secret: String::new(),
            m2m_client_id: String::new(),
            m2m_client_secret: String::new(),
            timeout_secs: 10,
        }
    }
}

/// Session configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Name of the session cookie.
    pub cookie_name: String,

    /// Session lifetime in seconds.
    pub ttl_secs: u64,

    /// Interval of the expired-session sweeper in seconds.
    pub sweep_interval_secs: u64,

    /// Lifetime of a pending login `state` in seconds.
    pub login_state_ttl_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "appSession".to_string(),
            ttl_secs: 60 * 60 * 24,
            sweep_interval_secs: 60,
            login_state_ttl_secs: 600,
        }
    }
}

/// Access-control configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AccessConfig {
    /// Route patterns that require a session, e.g. "/api/players/:path*".
    pub protected_routes: Vec<String>,

    /// Block protected routes until the provider reports a verified email.
    pub require_verified_email: bool,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            protected_routes: vec![
                "/".to_string(),
                "/dashboard".to_string(),
                "/api/players/:path*".to_string(),
            ],
            require_verified_email: true,
        }
    }
}

/// CORS configuration. An empty origin list disables the layer.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: DashboardConfig = toml::from_str(
            r#"
            [stats_api]
            api_key = "key"
            dashboard_season = 2022

            [observability]
            log_format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.stats_api.api_key, "key");
        assert_eq!(config.stats_api.dashboard_season, 2022);
        assert_eq!(config.stats_api.team_id, 4);
        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert_eq!(config.session.cookie_name, "appSession");
        assert_eq!(config.access.protected_routes.len(), 3);
    }
}
