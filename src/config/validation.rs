//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Report every missing identity setting at once
//! - Validate value ranges (timeouts > 0, page sizes)
//! - Reject malformed route patterns and URLs
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: DashboardConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::DashboardConfig;
use crate::routing::RouteMatcher;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Missing required settings: {}", .0.join(", "))]
    MissingSettings(Vec<&'static str>),

    #[error("Invalid bind address '{0}'")]
    BindAddress(String),

    #[error("Invalid URL for {field}: '{value}'")]
    Url { field: &'static str, value: String },

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("stats_api.per_page must be between 1 and 100, got {0}")]
    PageSize(u32),

    #[error("Invalid protected route: {0}")]
    Route(String),
}

/// Validate a loaded configuration.
pub fn validate_config(config: &DashboardConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let mut missing = Vec::new();
    let identity = &config.identity;
    let required = [
        ("AUTH0_ISSUER_BASE_URL", &identity.issuer_base_url),
        ("AUTH0_BASE_URL", &identity.base_url),
        ("AUTH0_CLIENT_ID", &identity.client_id),
        ("AUTH0_CLIENT_SECRET", &identity.client_secret),
        ("AUTH0_M2M_CLIENT_ID", &identity.m2m_client_id),
        ("AUTH0_M2M_CLIENT_SECRET", &identity.m2m_client_secret),
        ("BALLDONTLIE_API_KEY", &config.stats_api.api_key),
    ];
    for (name, value) in required {
        if value.trim().is_empty() {
            missing.push(name);
        }
    }
    if !missing.is_empty() {
        errors.push(ValidationError::MissingSettings(missing));
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    let urls = [
        ("stats_api.base_url", &config.stats_api.base_url),
        ("identity.issuer_base_url", &identity.issuer_base_url),
        ("identity.base_url", &identity.base_url),
    ];
    for (field, value) in urls {
        if !value.is_empty() && Url::parse(value).is_err() {
            errors.push(ValidationError::Url { field, value: value.clone() });
        }
    }
    for origin in &config.cors.allowed_origins {
        if Url::parse(origin).is_err() {
            errors.push(ValidationError::Url {
                field: "cors.allowed_origins",
                value: origin.clone(),
            });
        }
    }

    let positive = [
        ("session.ttl_secs", config.session.ttl_secs),
        ("session.sweep_interval_secs", config.session.sweep_interval_secs),
        ("session.login_state_ttl_secs", config.session.login_state_ttl_secs),
        ("timeouts.request_secs", config.timeouts.request_secs),
        ("stats_api.timeout_secs", config.stats_api.timeout_secs),
        ("stats_api.max_pages", u64::from(config.stats_api.max_pages)),
        ("identity.timeout_secs", identity.timeout_secs),
    ];
    for (field, value) in positive {
        if value == 0 {
            errors.push(ValidationError::Zero { field });
        }
    }

    if !(1..=100).contains(&config.stats_api.per_page) {
        errors.push(ValidationError::PageSize(config.stats_api.per_page));
    }

    if let Err(e) = RouteMatcher::from_patterns(&config.access.protected_routes) {
        errors.push(ValidationError::Route(e.to_string()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
