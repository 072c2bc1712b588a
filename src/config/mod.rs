//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → .env / process environment overrides (secrets)
//!     → validation.rs (semantic checks)
//!     → DashboardConfig (validated, immutable)
//!     → shared via Arc to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Credentials only come from config or environment, never from source

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_from_env, ConfigError};
pub use schema::{
    AccessConfig, CorsConfig, DashboardConfig, IdentityConfig, ListenerConfig, LogFormat,
    ObservabilityConfig, SessionConfig, StatsApiConfig, TimeoutConfig, TlsConfig,
};
pub use validation::ValidationError;
