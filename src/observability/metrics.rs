//! Metrics collection and exposition.
//!
//! # Metrics
//! - `proxy_requests_total` (counter): requests by strategy and status
//! - `proxy_time_to_head_seconds` (histogram): time until the response head
//!   is ready; body streaming is not included
//! - `proxy_fetch_errors_total` (counter): pipeline failures by kind

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener.
///
/// Must run inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;

    metrics::describe_counter!(
        "proxy_requests_total",
        "Requests answered, by fetch strategy and status"
    );
    metrics::describe_histogram!(
        "proxy_time_to_head_seconds",
        metrics::Unit::Seconds,
        "Time from request arrival to response head"
    );
    metrics::describe_counter!(
        "proxy_fetch_errors_total",
        "Pipeline failures, by error kind"
    );

    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record a request whose response head is ready.
pub fn record_request(strategy: &'static str, status: u16, start: Instant) {
    metrics::counter!(
        "proxy_requests_total",
        "strategy" => strategy,
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("proxy_time_to_head_seconds", "strategy" => strategy)
        .record(start.elapsed().as_secs_f64());
}

/// Record a failed request by error kind.
pub fn record_fetch_error(kind: &'static str) {
    metrics::counter!("proxy_fetch_errors_total", "kind" => kind).increment(1);
}
