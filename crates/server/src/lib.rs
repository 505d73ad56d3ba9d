//! Helper utilities to launch the fee analytics API server.

use std::{net::SocketAddr, sync::Arc};

use api::{self, ApiState};
use axum::{
    Router,
    http::{HeaderValue, Method},
    routing::get,
};
use eyre::{Context, Result};
use runtime::{health, shutdown::ShutdownSignal};
mod rate_limit;
use rate_limit::RateLimitLayer;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, info};

/// Version prefix for all API routes.
pub const API_VERSION: &str = "v1";

/// Build the API router with CORS and tracing layers.
pub fn router(state: ApiState, allowed_origins: Vec<String>) -> Router {
    let allowed = Arc::new(allowed_origins);
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::predicate({
            let allowed = Arc::clone(&allowed);
            move |origin: &HeaderValue, _| match origin.to_str() {
                Ok(origin) => {
                    allowed.iter().any(|o| o == origin) ||
                        origin.starts_with("http://localhost:") ||
                        origin.starts_with("http://127.0.0.1:")
                }
                Err(_) => false,
            }
        }))
        .allow_methods([Method::GET])
        .allow_headers(Any)
        .expose_headers(Any);
    let trace = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let max_requests = state.max_requests();
    let rate_period = state.rate_period();
    let api_service = tower::ServiceBuilder::new()
        .layer(RateLimitLayer::new(max_requests, rate_period))
        .service(api::router(state));

    Router::new()
        .route("/health", get(health::handler))
        .nest_service(&format!("/{API_VERSION}"), api_service)
        .layer(cors)
        .layer(trace)
}

/// Run the API server on the given address until SIGINT or SIGTERM.
pub async fn run(addr: SocketAddr, state: ApiState, allowed_origins: Vec<String>) -> Result<()> {
    let app = router(state, allowed_origins);
    let shutdown = ShutdownSignal::new().wrap_err("failed to install shutdown signal handlers")?;

    info!("Starting API server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .wrap_err_with(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown)
        .await?;
    info!("API server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use api::{DEFAULT_MAX_REQUESTS, DEFAULT_RATE_PERIOD};
    use axum::{
        body::{self, Body},
        http::{Request, StatusCode},
    };
    use report::{MemoryTable, ReportParams};
    use serde_json::{Value, json};
    use std::time::Duration;
    use tower::util::ServiceExt;

    fn state(max_requests: u64, rate_period: Duration) -> ApiState {
        let params = ReportParams {
            fee_recipient: "fees.near".to_owned(),
            top_n: 20,
            series_start: None,
            series_limit: Some(1000),
        };
        ApiState::new(Arc::new(MemoryTable::default()), params, max_requests, rate_period)
    }

    fn build_app(allowed: Vec<String>) -> Router {
        router(state(DEFAULT_MAX_REQUESTS, DEFAULT_RATE_PERIOD), allowed)
    }

    fn default_origins() -> Vec<String> {
        config::DEFAULT_ALLOWED_ORIGINS.split(',').map(|s| s.to_owned()).collect()
    }

    async fn send_request(app: Router, origin: &str) -> (StatusCode, Value, Option<String>) {
        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/{API_VERSION}/fees/top-assets"))
                    .header("Origin", origin)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let cors = response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok())
            .map(ToOwned::to_owned);
        let bytes = body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        (status, body, cors)
    }

    #[tokio::test]
    async fn serves_versioned_routes() {
        let (status, body, _) = send_request(build_app(default_origins()), "http://x").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "assets": [] }));
    }

    #[tokio::test]
    async fn health_is_unversioned() {
        let response = build_app(default_origins())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn allows_extra_origin() {
        let mut origins = default_origins();
        origins.push("https://fees.example.com".to_owned());
        let (status, _, cors) = send_request(build_app(origins), "https://fees.example.com").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(cors.as_deref(), Some("https://fees.example.com"));
    }

    #[tokio::test]
    async fn allows_localhost_origin() {
        let (status, _, cors) =
            send_request(build_app(default_origins()), "http://localhost:8501").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(cors.as_deref(), Some("http://localhost:8501"));
    }

    #[tokio::test]
    async fn allows_127_0_0_1_origin() {
        let (status, _, cors) =
            send_request(build_app(default_origins()), "http://127.0.0.1:3001").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(cors.as_deref(), Some("http://127.0.0.1:3001"));
    }

    #[tokio::test]
    async fn denies_other_origin() {
        let (status, _, cors) =
            send_request(build_app(default_origins()), "https://notallowed.com").await;
        assert_eq!(status, StatusCode::OK);
        assert!(cors.is_none());
    }

    #[tokio::test]
    async fn rate_limits_versioned_routes() {
        let app = router(state(1, Duration::from_secs(60)), default_origins());

        let (first, _, _) = send_request(app.clone(), "http://localhost:3000").await;
        let (second, body, _) = send_request(app.clone(), "http://localhost:3000").await;

        assert_eq!(first, StatusCode::OK);
        assert_eq!(second, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body["type"], "rate-limit");

        let health = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(health.status(), StatusCode::OK);
    }
}
