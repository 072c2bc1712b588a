//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::DashboardConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<DashboardConfig, ConfigError> {
    let config = read_config(path)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load configuration from an optional TOML file, then `.env` and the
/// process environment, then validate.
pub fn load_from_env(path: Option<&Path>) -> Result<DashboardConfig, ConfigError> {
    // A missing .env file is normal outside development.
    let _ = dotenvy::dotenv();

    let mut config = match path {
        Some(path) => read_config(path)?,
        None => DashboardConfig::default(),
    };
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

fn read_config(path: &Path) -> Result<DashboardConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Overlay environment variables onto a config. Empty values are ignored.
pub fn apply_env_overrides<F>(config: &mut DashboardConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    let identity = &mut config.identity;
    let overrides: [(&str, &mut String); 8] = [
        ("AUTH0_ISSUER_BASE_URL", &mut identity.issuer_base_url),
        ("AUTH0_BASE_URL", &mut identity.base_url),
        ("AUTH0_CLIENT_ID", &mut identity.client_id),
        ("AUTH0_CLIENT_SECRET", &mut identity.client_secret),
        ("AUTH0_M2M_CLIENT_ID", &mut identity.m2m_client_id),
        ("AUTH0_M2M_CLIENT_SECRET", &mut identity.m2m_client_secret),
        ("BALLDONTLIE_API_KEY", &mut config.stats_api.api_key),
        ("DASHBOARD_BIND_ADDRESS", &mut config.listener.bind_address),
    ];
    for (key, field) in overrides {
        if let Some(value) = get(key) {
            *field = if key.ends_with("_URL") {
                value.trim_end_matches('/').to_string()
            } else {
                value
            };
        }
    }
}
