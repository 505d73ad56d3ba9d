//! API route definitions

pub mod fees;

use crate::{ApiDoc, state::ApiState};
use axum::{Router, routing::get};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use fees::*;

/// Build the router with all API endpoints.
pub fn router(state: ApiState) -> Router {
    let api_routes = Router::new()
        .route("/fees/summary", get(fee_summary))
        .route("/fees/top-assets", get(top_assets))
        .route("/fees/daily-cumulative", get(daily_cumulative))
        .route("/fees/daily-totals", get(daily_totals));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .merge(api_routes)
        .with_state(state)
}
