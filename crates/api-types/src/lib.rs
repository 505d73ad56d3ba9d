//! Data types for the fee analytics API.
//!
//! These structs define the JSON responses returned by the API server. They
//! are provided in a separate crate so that consumers such as the dashboard can
//! depend on them without pulling in the rest of the server implementation.

#![allow(missing_docs)]

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use clickhouse_lib::{DailyCumulativeRow, TopAssetRow};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub use clickhouse_lib::FeeSummary;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TopAssetsResponse {
    pub assets: Vec<TopAssetRow>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DailyCumulativeResponse {
    pub rows: Vec<DailyCumulativeRow>,
}

/// Fee activity of one day summed over every asset and chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DailyTotalRow {
    pub date: NaiveDate,
    pub transaction_count: u64,
    #[schema(value_type = String)]
    pub usd_amount: Decimal,
}

/// Chart feed: per-day totals in ascending date order plus the busiest days.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DailyTotalsResponse {
    pub days: Vec<DailyTotalRow>,
    /// Top days by transaction count
    pub count_spikes: Vec<DailyTotalRow>,
    /// Top days by USD volume
    pub volume_spikes: Vec<DailyTotalRow>,
}

/// Problem details style error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub r#type: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
}

impl ErrorResponse {
    pub fn new(
        r#type: impl Into<String>,
        title: impl Into<String>,
        status: StatusCode,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            r#type: r#type.into(),
            title: title.into(),
            status: status.as_u16(),
            detail: detail.into(),
        }
    }

    /// 400 response for a rejected query parameter.
    pub fn invalid_params(detail: impl Into<String>) -> Self {
        Self::new("invalid-params", "Bad Request", StatusCode::BAD_REQUEST, detail)
    }

    /// Generic 500 response; the cause is logged, not returned.
    pub fn database_error() -> Self {
        Self::new(
            "database-error",
            "Internal Server Error",
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to query fee data",
        )
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}
