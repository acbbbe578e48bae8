//! Metrics collection and exposition.
//!
//! # Metrics
//! - `ssr_requests_total` (counter): SSR responses by status and outcome
//! - `ssr_load_duration_seconds` (histogram): eager loading phase latency
//! - `proxy_requests_total` (counter): API passthrough responses by status

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on the given address.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(error) => tracing::error!(%error, "Failed to install metrics exporter"),
    }
}

/// Record one SSR response.
///
/// `outcome` distinguishes how the response was produced: "rendered",
/// "shell", "redirect", "not_found", "degraded".
pub fn record_ssr_request(status: u16, outcome: &'static str, start: Instant) {
    metrics::counter!(
        "ssr_requests_total",
        "status" => status.to_string(),
        "outcome" => outcome,
    )
    .increment(1);
    metrics::histogram!("ssr_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Record one eager loading phase.
pub fn record_load(eager_count: usize, outcome: &'static str, start: Instant) {
    metrics::counter!(
        "ssr_loads_total",
        "outcome" => outcome,
        "eager" => eager_count.to_string(),
    )
    .increment(1);
    metrics::histogram!("ssr_load_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Record one proxied API response.
pub fn record_proxy_request(status: u16, start: Instant) {
    metrics::counter!("proxy_requests_total", "status" => status.to_string()).increment(1);
    metrics::histogram!("proxy_request_duration_seconds").record(start.elapsed().as_secs_f64());
}
