//! Basketball statistics subsystem.
//!
//! # Data Flow
//! ```text
//! stats REST API
//!     → client.rs (authenticated GETs, cursor paging)
//!     → model.rs (flat upstream records)
//!     → aggregate.rs (season means, advanced numbers)
//!     → ranking.rs (per-metric rank & percentile)
//!     → service.rs (fetch + aggregate for pages, API and CLI)
//!     → game_log.rs (per-game table for the CLI)
//! ```

pub mod aggregate;
pub mod client;
pub mod game_log;
pub mod model;
pub mod ranking;
pub mod service;

pub use client::{StatsClient, StatsError};
pub use ranking::{Comparison, Metric};
