//! Prometheus metrics for the API server.

use axum::body::Body;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::Instant;

/// Initialize the Prometheus metrics recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> PrometheusHandle {
    PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus recorder")
}

/// Metric names as constants for consistency.
pub mod names {
    // HTTP metrics
    pub const HTTP_REQUESTS_TOTAL: &str = "adclip_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "adclip_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "adclip_http_requests_in_flight";

    // Generation metrics
    pub const GENERATIONS_TOTAL: &str = "adclip_generations_total";
    pub const GENERATION_FAILURES_TOTAL: &str = "adclip_generation_failures_total";
    pub const CACHE_HITS_TOTAL: &str = "adclip_cache_hits_total";
    pub const CACHE_CLEARED_TOTAL: &str = "adclip_cache_cleared_entries_total";

    // Rate limiting metrics
    pub const RATE_LIMIT_HITS_TOTAL: &str = "adclip_rate_limit_hits_total";
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

/// Record a completed generation, cached or fresh.
pub fn record_generation(model: &str, cache_hit: bool) {
    let labels = [("model", model.to_string())];
    counter!(names::GENERATIONS_TOTAL, &labels).increment(1);
    if cache_hit {
        counter!(names::CACHE_HITS_TOTAL).increment(1);
    }
}

/// Record a terminally failed generation.
pub fn record_generation_failure(code: &'static str) {
    let labels = [("code", code)];
    counter!(names::GENERATION_FAILURES_TOTAL, &labels).increment(1);
}

/// Record entries removed by a cache clear.
pub fn record_cache_cleared(entries: usize) {
    counter!(names::CACHE_CLEARED_TOTAL).increment(entries as u64);
}

/// Record rate limit hit.
pub fn record_rate_limit_hit(endpoint: &str) {
    let labels = [("endpoint", endpoint.to_string())];
    counter!(names::RATE_LIMIT_HITS_TOTAL, &labels).increment(1);
}

/// Collapse ID-bearing path segments so label cardinality stays bounded.
/// Unknown paths reach the middleware too, not just the routed ones.
fn sanitize_path(path: &str) -> String {
    static UUID_SEGMENT: OnceLock<regex_lite::Regex> = OnceLock::new();
    static NUMERIC_SEGMENT: OnceLock<regex_lite::Regex> = OnceLock::new();

    let uuid = UUID_SEGMENT.get_or_init(|| {
        regex_lite::Regex::new(r"[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}")
            .unwrap()
    });
    let numeric =
        NUMERIC_SEGMENT.get_or_init(|| regex_lite::Regex::new(r"/[0-9]+(/|$)").unwrap());

    let path = uuid.replace_all(path, ":id");
    numeric.replace_all(&path, "/:id$1").to_string()
}

/// Metrics middleware for HTTP requests.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);

    let response = next.run(request).await;

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    let status = response.status().as_u16();
    let duration = start.elapsed().as_secs_f64();

    record_http_request(&method, &path, status, duration);

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_path() {
        assert_eq!(sanitize_path("/api/ads/generate"), "/api/ads/generate");
        assert_eq!(
            sanitize_path("/api/jobs/550e8400-e29b-41d4-a716-446655440000"),
            "/api/jobs/:id"
        );
        assert_eq!(sanitize_path("/api/jobs/12345"), "/api/jobs/:id");
    }
}
