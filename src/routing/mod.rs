//! Route classification for the access-control gate.
//!
//! # Data Flow
//! ```text
//! config.access.protected_routes
//!     → matcher.rs (parse patterns once at startup)
//!     → RouteMatcher shared via Arc
//!     → access_control middleware asks `matches(path)` per request
//! ```

pub mod matcher;

pub use matcher::{Matcher, PatternError, RouteMatcher};
