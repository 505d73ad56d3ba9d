//! Thin HTTP API serving the fee revenue reports

pub mod helpers;
pub mod routes;
pub mod state;
pub mod validation;

use api_types::{
    DailyCumulativeResponse, DailyTotalRow, DailyTotalsResponse, ErrorResponse, FeeSummary,
    HealthResponse, TopAssetsResponse,
};
use utoipa::OpenApi;

pub use routes::router;
pub use state::{ApiState, DEFAULT_MAX_REQUESTS, DEFAULT_RATE_PERIOD, MAX_SERIES_LIMIT};

use validation::{DailyTotalsQuery, SeriesQuery, TopAssetsQuery};

/// `OpenAPI` documentation structure
#[derive(Debug, OpenApi)]
#[openapi(
    paths(
        routes::fees::fee_summary,
        routes::fees::top_assets,
        routes::fees::daily_cumulative,
        routes::fees::daily_totals
    ),
    components(
        schemas(
            TopAssetsQuery,
            SeriesQuery,
            DailyTotalsQuery,
            FeeSummary,
            TopAssetsResponse,
            DailyCumulativeResponse,
            DailyTotalsResponse,
            DailyTotalRow,
            clickhouse_lib::TopAssetRow,
            clickhouse_lib::DailyCumulativeRow,
            HealthResponse,
            ErrorResponse
        )
    ),
    tags(
        (name = "fees", description = "Intents fee revenue reports")
    ),
    info(
        title = "Intents Fee Analytics API",
        description = "Fee revenue summary, top assets and daily cumulative series",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;
