//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_requests_total` (counter): queries by outcome, status
//! - `relay_request_duration_seconds` (histogram): latency distribution
//!
//! # Design Decisions
//! - Outcome labels come from the normalizer, so operators see *why* a
//!   request failed (blocked, truncated, unreachable, malformed), not just
//!   the status code
//! - Exporter is optional; recording without it is a no-op

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on its own listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => {
            tracing::info!(address = %addr, "Metrics exporter listening");
        }
        Err(e) => {
            tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter");
            return;
        }
    }

    describe_counter!(
        "relay_requests_total",
        "Total queries handled, by normalized outcome and HTTP status"
    );
    describe_histogram!(
        "relay_request_duration_seconds",
        "End-to-end query latency in seconds"
    );
}

/// Record one handled query.
pub fn record_query(outcome: &str, status: u16, start: Instant) {
    counter!(
        "relay_requests_total",
        "outcome" => outcome.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    histogram!(
        "relay_request_duration_seconds",
        "outcome" => outcome.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}
