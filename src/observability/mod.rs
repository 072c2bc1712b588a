//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers, middleware, upstream clients produce:
//!     → logging.rs (structured log events, request ids via tower-http)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Prometheus scrape endpoint (optional)
//! ```

pub mod logging;
pub mod metrics;
