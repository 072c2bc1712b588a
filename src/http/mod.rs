//! HTTP surface of the dashboard.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, tower layers)
//!     → request.rs (request id, request metrics)
//!     → middleware/access_control.rs (session + verified-email gate)
//!     → handlers/ (pages, auth, players, status)
//!     → response.rs (JSON error bodies)
//! ```

pub mod handlers;
pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use response::ApiError;
pub use server::{AppState, DashboardServer, StartupError};
