//! Prometheus metrics

use crate::error::ReportError;

use axum::{body::Body, http::Request, response::Response};
use lazy_static::lazy_static;
use prometheus::{
    self, core::Collector, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry,
};
use tracing::{event, Level, Span};

lazy_static! {
    // Registry for holding metric state
    pub static ref REGISTRY: Registry = Registry::new();
    // Simple request counter
    pub static ref INCOMING_REQUESTS: IntCounterVec = IntCounterVec::new(
        Opts::new("incoming_requests", "The number of HTTP requests received"),
        &["http_method"]
    ).unwrap();
    // Request counter by status code
    pub static ref RESPONSE_CODE_COLLECTOR: IntCounterVec = IntCounterVec::new(
        Opts::new("outgoing_response", "The number of responses sent."),
        &["status_code"]
    ).unwrap();
    // Request histogram by response time
    pub static ref RESPONSE_TIME_COLLECTOR: HistogramVec = HistogramVec::new(
        HistogramOpts{
            common_opts: Opts::new("response_time", "The time taken to respond to each request"),
            buckets: prometheus::DEFAULT_BUCKETS.to_vec(),
        },
        &[],
    ).unwrap();
    // Report rows produced
    pub static ref REPORT_ROWS: IntCounter = IntCounter::new(
        "report_rows", "The number of report rows produced"
    ).unwrap();
    // Scans left out of reports because their widget or algorithm is unknown
    pub static ref SKIPPED_SCANS: IntCounterVec = IntCounterVec::new(
        Opts::new("skipped_scans", "The number of scans omitted from reports"),
        &["reason"]
    ).unwrap();
}

/// Register all collectors with [REGISTRY].
///
/// Collectors that are already registered are left in place.
pub fn register_metrics() {
    let collectors: [Box<dyn Collector>; 5] = [
        Box::new(INCOMING_REQUESTS.clone()),
        Box::new(RESPONSE_CODE_COLLECTOR.clone()),
        Box::new(RESPONSE_TIME_COLLECTOR.clone()),
        Box::new(REPORT_ROWS.clone()),
        Box::new(SKIPPED_SCANS.clone()),
    ];
    for collector in collectors {
        if let Err(error) = REGISTRY.register(collector) {
            event!(Level::DEBUG, "metric not registered: {}", error);
        }
    }
}

/// Render all registered metrics in the prometheus text format.
pub async fn metrics_handler() -> Result<String, ReportError> {
    let encoder = prometheus::TextEncoder::new();
    Ok(encoder.encode_to_string(&REGISTRY.gather())?)
}

/// Increments the prometheus counter on all incoming requests, labelled by http method
pub fn request_counter(request: &Request<Body>, _span: &Span) {
    INCOMING_REQUESTS
        .with_label_values(&[&request.method().to_string().to_ascii_uppercase()])
        .inc();
}

/// Increment the prometheus counter on all outgoing responses, labelled by status code
pub fn record_response_metrics<B>(
    response: &Response<B>,
    latency: std::time::Duration,
    _span: &Span,
) {
    RESPONSE_CODE_COLLECTOR
        .with_label_values(&[response.status().as_str()])
        .inc();

    RESPONSE_TIME_COLLECTOR
        .with_label_values(&[])
        .observe(latency.as_secs_f64());
}
