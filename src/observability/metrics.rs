//! Metrics collection and exposition.
//!
//! # Metrics
//! - `dashboard_requests_total` (counter): requests by method, status, route
//! - `dashboard_request_duration_seconds` (histogram): handler latency
//! - `dashboard_upstream_requests_total` (counter): stats/identity calls by outcome
//! - `dashboard_upstream_duration_seconds` (histogram): upstream latency
//! - `dashboard_active_sessions` (gauge): sessions held in memory
//!
//! Recording is a no-op until a recorder is installed by `init_metrics`.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a served request.
pub fn record_request(method: &str, status: u16, route: &str, start: Instant) {
    let status = status.to_string();
    counter!(
        "dashboard_requests_total",
        "method" => method.to_string(),
        "status" => status.clone(),
        "route" => route.to_string()
    )
    .increment(1);
    histogram!(
        "dashboard_request_duration_seconds",
        "method" => method.to_string(),
        "status" => status,
        "route" => route.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record one call to an upstream service. `outcome` is ok, status or error.
pub fn record_upstream(service: &'static str, outcome: &'static str, start: Instant) {
    counter!("dashboard_upstream_requests_total", "service" => service, "outcome" => outcome)
        .increment(1);
    histogram!("dashboard_upstream_duration_seconds", "service" => service)
        .record(start.elapsed().as_secs_f64());
}

/// Current number of sessions.
pub fn record_sessions(count: usize) {
    gauge!("dashboard_active_sessions").set(count as f64);
}
