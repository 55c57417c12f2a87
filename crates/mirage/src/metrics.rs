//! Prometheus metrics for mirage.
//!
//! Tracks request handling, dispatch outcomes, and mock registrations.
use lazy_static::lazy_static;
use prometheus::{
    register_counter_vec, register_histogram_vec, CounterVec, Encoder, HistogramVec, TextEncoder,
};
use tracing::warn;

lazy_static! {
    /// Total number of HTTP requests answered
    pub static ref REQUESTS_TOTAL: CounterVec = register_counter_vec!(
        "mirage_requests_total",
        "Total number of HTTP requests answered",
        &["surface", "status"]  // surface: api|dispatch|system
    )
    .unwrap();

    /// Dispatch lookups by outcome
    pub static ref DISPATCH_TOTAL: CounterVec = register_counter_vec!(
        "mirage_dispatch_total",
        "Total number of dispatch lookups",
        &["method", "outcome"]  // outcome: specific|generic|not_found
    )
    .unwrap();

    /// Dispatch lookup duration
    pub static ref DISPATCH_DURATION_MS: HistogramVec = register_histogram_vec!(
        "mirage_dispatch_duration_ms",
        "Histogram of dispatch lookup time in milliseconds",
        &["outcome"],
        vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .unwrap();

    /// Registration attempts
    pub static ref REGISTRATIONS_TOTAL: CounterVec = register_counter_vec!(
        "mirage_registrations_total",
        "Total number of mock and override registrations",
        &["kind", "result"]  // kind: mock|override|workspace, result: ok|invalid_input|conflict|not_found|storage
    )
    .unwrap();
}

/// Method label for requests whose method is outside the canonical set.
/// Client-supplied extension methods never become label values.
pub const UNKNOWN_METHOD: &str = "UNKNOWN";

/// Collect and return all metrics in Prometheus text format
pub fn collect_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        warn!("Failed to encode metrics: {}", e);
        return String::new();
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

pub fn record_request(surface: &str, status: u16) {
    REQUESTS_TOTAL
        .with_label_values(&[surface, &status.to_string()])
        .inc();
}

/// Helper to record a dispatch lookup
pub fn record_dispatch(method: &str, outcome: &str, duration_ms: f64) {
    DISPATCH_TOTAL.with_label_values(&[method, outcome]).inc();
    DISPATCH_DURATION_MS
        .with_label_values(&[outcome])
        .observe(duration_ms);
}

pub fn record_registration(kind: &str, result: &str) {
    REGISTRATIONS_TOTAL.with_label_values(&[kind, result]).inc();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_metrics_includes_recorded_series() {
        record_dispatch("GET", "generic", 0.2);
        record_registration("mock", "ok");
        record_request("dispatch", 200);

        let text = collect_metrics();
        assert!(text.contains("mirage_dispatch_total"));
        assert!(text.contains("mirage_registrations_total"));
        assert!(text.contains("mirage_requests_total"));
    }
}
