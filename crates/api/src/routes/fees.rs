//! Fee revenue report endpoints

use crate::{
    helpers::{csv_response, daily_totals_response, database_error},
    state::{ApiState, MAX_SERIES_LIMIT},
    validation::{
        DailyTotalsQuery, OutputFormat, SeriesQuery, TopAssetsQuery, parse_format, parse_since,
        query_params, validate_series_limit, validate_top_limit,
    },
};
use api_types::{
    DailyCumulativeResponse, DailyTotalsResponse, ErrorResponse, FeeSummary, TopAssetsResponse,
};
use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    response::{IntoResponse, Response},
};
use report::ReportParams;
use tracing::info;

#[utoipa::path(
    get,
    path = "/fees/summary",
    responses(
        (status = 200, description = "Fee revenue summary", body = FeeSummary),
        (status = 500, description = "Database error", body = ErrorResponse)
    ),
    tag = "fees"
)]
/// Get totals, latest day activity and the top asset over all fee transfers
pub async fn fee_summary(State(state): State<ApiState>) -> Result<Json<FeeSummary>, ErrorResponse> {
    let summary = state
        .reports
        .summary(&state.params)
        .await
        .map_err(|e| database_error("get fee summary", e))?;
    info!(total_transactions = summary.total_transactions, "Returning fee summary");
    Ok(Json(summary))
}

#[utoipa::path(
    get,
    path = "/fees/top-assets",
    params(
        TopAssetsQuery
    ),
    responses(
        (status = 200, description = "Assets ranked by USD fee volume", body = TopAssetsResponse),
        (status = 400, description = "Invalid parameters", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    ),
    tag = "fees"
)]
/// Get the assets with the highest USD fee totals.
///
/// Results are ordered by total USD descending, ties by asset name.
pub async fn top_assets(
    query: Result<Query<TopAssetsQuery>, QueryRejection>,
    State(state): State<ApiState>,
) -> Result<Response, ErrorResponse> {
    let params = query_params(query)?;
    let format = parse_format(params.format.as_deref())?;
    let top_n = validate_top_limit(params.limit, state.params.top_n)?;

    let report_params = ReportParams { top_n, ..state.params.clone() };
    let assets = state
        .reports
        .top_assets(&report_params)
        .await
        .map_err(|e| database_error("get top assets", e))?;
    info!(count = assets.len(), "Returning top assets");

    match format {
        OutputFormat::Json => Ok(Json(TopAssetsResponse { assets }).into_response()),
        OutputFormat::Csv => csv_response(&assets, "top_assets.csv"),
    }
}

#[utoipa::path(
    get,
    path = "/fees/daily-cumulative",
    params(
        SeriesQuery
    ),
    responses(
        (status = 200, description = "Daily fee buckets with running totals", body = DailyCumulativeResponse),
        (status = 400, description = "Invalid parameters", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    ),
    tag = "fees"
)]
/// Get daily fee buckets per asset and chain with running totals per asset.
///
/// Results are ordered by date descending, then by daily USD amount descending.
pub async fn daily_cumulative(
    query: Result<Query<SeriesQuery>, QueryRejection>,
    State(state): State<ApiState>,
) -> Result<Response, ErrorResponse> {
    let params = query_params(query)?;
    let format = parse_format(params.format.as_deref())?;
    let series_start = parse_since(params.since.as_deref(), state.params.series_start)?;
    let series_limit =
        validate_series_limit(params.limit, state.params.series_limit, MAX_SERIES_LIMIT)?;

    let report_params = ReportParams { series_start, series_limit, ..state.params.clone() };
    let rows = state
        .reports
        .daily_cumulative(&report_params)
        .await
        .map_err(|e| database_error("get daily cumulative fees", e))?;
    info!(count = rows.len(), "Returning daily cumulative fees");

    match format {
        OutputFormat::Json => Ok(Json(DailyCumulativeResponse { rows }).into_response()),
        OutputFormat::Csv => csv_response(&rows, "daily_cumulative.csv"),
    }
}

#[utoipa::path(
    get,
    path = "/fees/daily-totals",
    params(
        DailyTotalsQuery
    ),
    responses(
        (status = 200, description = "Per-day fee totals with spike days", body = DailyTotalsResponse),
        (status = 400, description = "Invalid parameters", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    ),
    tag = "fees"
)]
/// Get per-day transfer counts and USD volume over all assets.
///
/// Days are in ascending order; the three busiest days by count and by volume
/// are returned separately.
pub async fn daily_totals(
    query: Result<Query<DailyTotalsQuery>, QueryRejection>,
    State(state): State<ApiState>,
) -> Result<Json<DailyTotalsResponse>, ErrorResponse> {
    let params = query_params(query)?;
    let series_start = parse_since(params.since.as_deref(), state.params.series_start)?;

    // A row cap would cut days partially, so the whole series is aggregated.
    let report_params = ReportParams { series_start, series_limit: None, ..state.params.clone() };
    let rows = state
        .reports
        .daily_cumulative(&report_params)
        .await
        .map_err(|e| database_error("get daily fee totals", e))?;

    let resp = daily_totals_response(&rows);
    info!(days = resp.days.len(), "Returning daily fee totals");
    Ok(Json(resp))
}
