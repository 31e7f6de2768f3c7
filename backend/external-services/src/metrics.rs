#![allow(clippy::expect_used)]

use error_stack::ResultExt;
use lazy_static::lazy_static;
use prometheus::{
    self, register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec, IntCounterVec,
    TextEncoder,
};

// Define latency buckets for histograms
const LATENCY_BUCKETS: &[f64] = &[
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

lazy_static! {
    pub static ref GATEWAY_API_CALLS_LATENCY: HistogramVec = register_histogram_vec!(
        "GATEWAY_API_CALLS_LATENCY_SECONDS",
        "Latency of calls to the payment gateway",
        &["endpoint", "connector"],
        LATENCY_BUCKETS.to_vec()
    )
    .expect("gateway latency histogram registers once");
    pub static ref GATEWAY_TOTAL_API_CALLS: IntCounterVec = register_int_counter_vec!(
        "GATEWAY_TOTAL_API_CALLS",
        "Total number of calls to the payment gateway",
        &["endpoint", "connector"]
    )
    .expect("gateway call counter registers once");
    pub static ref GATEWAY_API_CALLS_ERRORS: IntCounterVec = register_int_counter_vec!(
        "GATEWAY_API_CALLS_ERRORS",
        "Total number of failed calls to the payment gateway",
        &["endpoint", "connector", "error"]
    )
    .expect("gateway error counter registers once");
    pub static ref NOTIFICATIONS_RECEIVED: IntCounterVec = register_int_counter_vec!(
        "NOTIFICATIONS_RECEIVED",
        "Total number of gateway notifications received, by decoding outcome",
        &["connector", "outcome"]
    )
    .expect("notification counter registers once");
}

/// Renders every registered metric in the prometheus text format
pub async fn metrics_handler() -> error_stack::Result<String, MetricsError> {
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    encoder
        .encode(&metric_families, &mut buffer)
        .change_context(MetricsError::EncodingError)?;
    String::from_utf8(buffer).change_context(MetricsError::Utf8Error)
}

#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    #[error("Error encoding metrics")]
    EncodingError,
    #[error("Error converting metrics to utf8")]
    Utf8Error,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn rendered_metrics_include_touched_series() {
        GATEWAY_TOTAL_API_CALLS
            .with_label_values(&["PaymentInitHTTPServlet", "e24pipe"])
            .inc();

        let rendered = metrics_handler().await.expect("metrics should render");
        assert!(rendered.contains("GATEWAY_TOTAL_API_CALLS"));
        assert!(rendered.contains("endpoint=\"PaymentInitHTTPServlet\""));
    }
}
