//! Prometheus metrics for the API server.

use std::time::Instant;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

/// Initialize the Prometheus metrics recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Metric names as constants for consistency.
pub mod names {
    // HTTP metrics
    pub const HTTP_REQUESTS_TOTAL: &str = "facemerge_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "facemerge_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "facemerge_http_requests_in_flight";

    // Provider metrics
    pub const PROVIDER_CALLS_TOTAL: &str = "facemerge_provider_calls_total";
    pub const PROVIDER_CALL_DURATION_SECONDS: &str = "facemerge_provider_call_duration_seconds";
    pub const UPLOAD_BYTES: &str = "facemerge_upload_bytes";

    // Detection metrics
    pub const CONSENSUS_TOTAL: &str = "facemerge_consensus_total";
    pub const DETECTIONS_TOTAL: &str = "facemerge_detections_total";

    // Rate limiting metrics
    pub const RATE_LIMIT_HITS_TOTAL: &str = "facemerge_rate_limit_hits_total";
}

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record one provider call and how it ended.
pub fn record_provider_call(provider: &str, outcome: &str, duration_secs: f64) {
    let labels = [
        ("provider", provider.to_string()),
        ("outcome", outcome.to_string()),
    ];
    counter!(names::PROVIDER_CALLS_TOTAL, &labels).increment(1);
    histogram!(names::PROVIDER_CALL_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record the size of an accepted upload.
pub fn record_upload_size(bytes: usize) {
    histogram!(names::UPLOAD_BYTES).record(bytes as f64);
}

/// Record a finished detection request by route profile and outcome.
pub fn record_detection(profile: &str, outcome: &str) {
    let labels = [
        ("profile", profile.to_string()),
        ("outcome", outcome.to_string()),
    ];
    counter!(names::DETECTIONS_TOTAL, &labels).increment(1);
}

/// Record a computed consensus.
pub fn record_consensus(dominant: Option<&str>) {
    let labels = [("dominant", dominant.unwrap_or("none").to_string())];
    counter!(names::CONSENSUS_TOTAL, &labels).increment(1);
}

/// Record rate limit hit.
pub fn record_rate_limit_hit(endpoint: &str) {
    let labels = [("endpoint", sanitize_path(endpoint))];
    counter!(names::RATE_LIMIT_HITS_TOTAL, &labels).increment(1);
}

/// Sanitize path for metrics labels.
///
/// Static asset paths collapse into one label; unknown paths collapse into
/// another so scanners cannot blow up label cardinality.
fn sanitize_path(path: &str) -> String {
    const KNOWN: &[&str] = &[
        "/",
        "/detect_attributes",
        "/detect_emotions_consensus",
        "/detect_emotions_summary",
        "/health",
        "/healthz",
        "/ready",
        "/metrics",
    ];

    if path.starts_with("/static/") {
        "/static/*".to_string()
    } else if KNOWN.contains(&path) {
        path.to_string()
    } else {
        "other".to_string()
    }
}

/// Metrics middleware for HTTP requests.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    // Increment in-flight counter
    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);

    let response = next.run(request).await;

    // Decrement in-flight counter
    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    let status = response.status().as_u16();
    let duration = start.elapsed().as_secs_f64();

    record_http_request(&method, &path, status, duration);

    response
}
