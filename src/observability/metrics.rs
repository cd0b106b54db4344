//! Metrics collection and exposition.
//!
//! # Metrics
//! - `bridge_frames_received_total` (counter): inbound frames read
//! - `bridge_jobs_total` (counter): jobs by dispatch shape and outcome
//! - `bridge_job_duration_seconds` (histogram): decode-to-reply latency
//! - `bridge_upstream_status_total` (counter): target service status codes
//!
//! # Design Decisions
//! - Recording is always on; the Prometheus endpoint is opt-in
//! - Outcome label is `ok` or the fault kind

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape endpoint.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_frame_received() {
    ::metrics::counter!("bridge_frames_received_total").increment(1);
}

/// Record a finished job.
pub fn record_job(shape: &'static str, outcome: &'static str, start: Instant) {
    ::metrics::counter!("bridge_jobs_total", "shape" => shape, "outcome" => outcome).increment(1);
    ::metrics::histogram!("bridge_job_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_upstream_status(status: u16) {
    ::metrics::counter!("bridge_upstream_status_total", "status" => status.to_string())
        .increment(1);
}
