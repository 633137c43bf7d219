//! Prometheus metrics for the node process.
//!
//! Subsystem crates register their own metrics with the default registry
//! behind their `metrics` feature. This module adds process-level metrics and
//! encodes everything in the default registry for scraping.
//!
//! All metrics follow the naming convention: `tangle_<area>_<metric>_<unit>`

use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, register_int_gauge_vec, Encoder,
    HistogramVec, IntCounterVec, IntGaugeVec, TextEncoder,
};

use crate::TelemetryError;

lazy_static! {
    /// Build and network of the running node, always 1
    pub static ref NODE_INFO: IntGaugeVec = register_int_gauge_vec!(
        "tangle_node_info",
        "Node build and network information",
        &["service", "version", "network"]
    )
    .expect("Failed to create NODE_INFO metric");

    /// Background worker failures by worker and error type
    pub static ref WORKER_ERRORS: IntCounterVec = register_int_counter_vec!(
        "tangle_worker_errors_total",
        "Errors returned by background workers",
        &["worker", "error_type"]
    )
    .expect("Failed to create WORKER_ERRORS metric");

    /// Time spent in one worker tick
    pub static ref WORKER_TICK_DURATION: HistogramVec = register_histogram_vec!(
        "tangle_worker_tick_duration_seconds",
        "Duration of one background worker tick",
        &["worker"],
        prometheus::exponential_buckets(0.0001, 2.0, 15)
            .expect("Failed to create WORKER_TICK_DURATION buckets")
    )
    .expect("Failed to create WORKER_TICK_DURATION metric");
}

/// Publish the node info gauge.
pub fn set_node_info(service: &str, version: &str, network: &str) {
    NODE_INFO
        .with_label_values(&[service, version, network])
        .set(1);
}

pub fn record_worker_error(worker: &str, error_type: &str) {
    WORKER_ERRORS
        .with_label_values(&[worker, error_type])
        .inc();
}

/// Encode all metrics in the default registry as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Timer guard observing a worker tick on drop.
pub struct TickTimer {
    worker: &'static str,
    start: std::time::Instant,
}

impl TickTimer {
    pub fn new(worker: &'static str) -> Self {
        Self {
            worker,
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for TickTimer {
    fn drop(&mut self) {
        WORKER_TICK_DURATION
            .with_label_values(&[self.worker])
            .observe(self.start.elapsed().as_secs_f64());
    }
}
