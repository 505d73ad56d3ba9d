//! Liveness endpoint.

use api_types::HealthResponse;
use axum::{Json, Router, routing::get};

/// Health check handler returning `{ "status": "ok" }`.
pub async fn handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok".to_owned() })
}

/// Create a router exposing the `/health` endpoint.
pub fn router() -> Router {
    Router::new().route("/health", get(handler))
}
