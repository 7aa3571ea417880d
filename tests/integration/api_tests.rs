//! API integration tests.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

fn get_request(path: &str) -> Request<Body> {
    Request::builder().uri(path).body(Body::empty()).unwrap()
}

/// Liveness probe answers 200.
#[tokio::test]
async fn test_health_endpoint() {
    dotenvy::dotenv().ok();

    let app = create_test_router().await;
    let response = app.oneshot(get_request("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

/// Metrics endpoint renders when enabled, 404s when disabled.
#[tokio::test]
async fn test_metrics_endpoint() {
    dotenvy::dotenv().ok();

    let app = create_test_router().await;
    let response = app.oneshot(get_request("/metrics")).await.unwrap();

    assert!(response.status() == StatusCode::OK || response.status() == StatusCode::NOT_FOUND);
}

/// Hammering one endpoint from one address trips the per-IP limiter.
#[tokio::test]
#[ignore = "requires full app setup"]
async fn test_rate_limiting() {
    dotenvy::dotenv().ok();

    let app = create_test_router().await;

    for i in 0..20 {
        let request = Request::builder()
            .method("POST")
            .uri("/api/ads/generate")
            .header("X-Forwarded-For", "203.0.113.50")
            .body(Body::empty())
            .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            println!("Rate limited after {} requests", i + 1);
            return;
        }
    }

    // Twenty requests without a 429 means the configured limit is above
    // what this test sends
}

/// CORS preflight on the generate route.
#[tokio::test]
async fn test_cors_headers() {
    dotenvy::dotenv().ok();

    let app = create_test_router().await;

    let preflight = Request::builder()
        .method("OPTIONS")
        .uri("/api/ads/generate")
        .header("Origin", "http://localhost:3000")
        .header("Access-Control-Request-Method", "POST")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(preflight).await.unwrap();

    assert!(response.status() == StatusCode::OK || response.status() == StatusCode::NO_CONTENT);
}

/// Every response carries the security headers and a request id.
#[tokio::test]
async fn test_security_headers() {
    dotenvy::dotenv().ok();

    let app = create_test_router().await;
    let response = app.oneshot(get_request("/healthz")).await.unwrap();

    let headers = response.headers();
    assert!(headers.contains_key("X-Content-Type-Options"));
    assert!(headers.contains_key("X-Frame-Options"));
    assert!(headers.contains_key("X-Request-ID"));
}

/// Build the real router when the environment allows, a stub otherwise.
/// The stub keeps the probe tests runnable without ffmpeg installed.
async fn create_test_router() -> axum::Router {
    use adclip_api::{create_router, metrics, ApiConfig, AppState};

    let config = ApiConfig::from_env();

    match AppState::new(config).await {
        Ok(state) => {
            let metrics_handle = Some(metrics::init_metrics());
            create_router(state, metrics_handle)
        }
        Err(_) => {
            use axum::routing::get;
            use axum::Json;
            use serde_json::json;

            axum::Router::new()
                .route(
                    "/health",
                    get(|| async {
                        Json(json!({
                            "status": "healthy",
                            "version": env!("CARGO_PKG_VERSION")
                        }))
                    }),
                )
                .route("/metrics", get(|| async { "# No metrics" }))
        }
    }
}

/// Smoke test against a running server.
#[tokio::test]
#[ignore = "requires full app setup"]
async fn test_generate_ad_endpoint() {
    dotenvy::dotenv().ok();

    let base_url = std::env::var("ADCLIP_TEST_API_BASE_URL")
        .unwrap_or_else(|_| "http://localhost:8080".to_string());

    let client = reqwest::Client::new();
    let request = client
        .post(format!("{}/api/ads/generate", base_url))
        .json(&serde_json::json!({
            "videoId": "abc123def45",
            "timestampSeconds": 30.0,
            "durationSeconds": 8.0,
            "product": {
                "brand": "Aurora",
                "product": "Trail Shoe",
                "tagline": "Run anywhere",
                "visualDescription": "Blue trail running shoe",
                "actionScript": "Runner sprints along a ridge",
                "benefits": ["All-day grip", "Feather light", "Trail tough"],
                "gradientColors": ["#0af", "#f50"]
            }
        }));

    match request.send().await {
        Ok(resp) => {
            println!("Generate endpoint responded with status {}", resp.status());
            assert_ne!(resp.status(), StatusCode::NOT_FOUND);
        }
        Err(e) => {
            println!("Request failed (expected if server not running): {}", e);
        }
    }
}
