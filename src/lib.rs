//! Charlotte Hornets statistics dashboard.

pub mod config;
pub mod http;
pub mod identity;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod routing;
pub mod session;
pub mod stats;
pub mod views;

pub use config::schema::DashboardConfig;
pub use http::DashboardServer;
pub use lifecycle::Shutdown;
