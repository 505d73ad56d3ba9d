//! Validation functions for API query parameters

use api_types::ErrorResponse;
use axum::extract::{Query, rejection::QueryRejection};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

/// Response encoding requested by the client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON body (default)
    #[default]
    Json,
    /// CSV attachment with a header row
    Csv,
}

/// Query parameters for the top assets endpoint
#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct TopAssetsQuery {
    /// Maximum number of assets to return (capped at the configured top N)
    #[serde(deserialize_with = "crate::validation::de_u64_opt", default)]
    pub limit: Option<u64>,
    /// Response format, `json` or `csv`
    pub format: Option<String>,
}

/// Query parameters for the daily & cumulative series endpoint
#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct SeriesQuery {
    /// First day (UTC) to include, formatted `YYYY-MM-DD`
    pub since: Option<String>,
    /// Maximum number of rows to return
    #[serde(deserialize_with = "crate::validation::de_u64_opt", default)]
    pub limit: Option<u64>,
    /// Response format, `json` or `csv`
    pub format: Option<String>,
}

/// Query parameters for the daily totals chart feed
#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct DailyTotalsQuery {
    /// First day (UTC) to include, formatted `YYYY-MM-DD`
    pub since: Option<String>,
}

/// Unwrap extracted query parameters, reporting malformed ones as `invalid-params`.
pub fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, ErrorResponse> {
    match query {
        Ok(Query(params)) => Ok(params),
        Err(rejection) => {
            let detail = rejection.body_text();
            tracing::warn!(error = %detail, "Rejected query parameters");
            Err(ErrorResponse::invalid_params(detail))
        }
    }
}

/// Parse the `format` parameter, defaulting to JSON.
pub fn parse_format(format: Option<&str>) -> Result<OutputFormat, ErrorResponse> {
    match format.map(|f| f.trim().to_ascii_lowercase()).as_deref() {
        None | Some("json") => Ok(OutputFormat::Json),
        Some("csv") => Ok(OutputFormat::Csv),
        Some(other) => Err(ErrorResponse::invalid_params(format!(
            "Unsupported format '{}', expected 'json' or 'csv'",
            other
        ))),
    }
}

/// Parse the `since` parameter, falling back to `default` when absent.
pub fn parse_since(
    since: Option<&str>,
    default: Option<NaiveDate>,
) -> Result<Option<NaiveDate>, ErrorResponse> {
    let Some(raw) = since else { return Ok(default) };
    NaiveDate::parse_from_str(raw.trim_matches('"'), "%Y-%m-%d").map(Some).map_err(|e| {
        tracing::warn!(error = %e, since = raw, "Failed to parse since date");
        ErrorResponse::invalid_params(format!("Invalid since date '{}': expected YYYY-MM-DD", raw))
    })
}

/// Resolve the number of top assets to return.
///
/// Requests above `max_limit` are clamped.
pub fn validate_top_limit(limit: Option<u64>, max_limit: u64) -> Result<u64, ErrorResponse> {
    match limit {
        Some(0) => Err(ErrorResponse::invalid_params("limit must be greater than zero")),
        Some(limit) => Ok(limit.min(max_limit)),
        None => Ok(max_limit),
    }
}

/// Resolve the series row cap.
///
/// Without an explicit limit the configured `default` applies, which may be unbounded.
pub fn validate_series_limit(
    limit: Option<u64>,
    default: Option<u64>,
    max_limit: u64,
) -> Result<Option<u64>, ErrorResponse> {
    match limit {
        Some(0) => Err(ErrorResponse::invalid_params("limit must be greater than zero")),
        Some(limit) if limit > max_limit => Err(ErrorResponse::invalid_params(format!(
            "limit {} exceeds the maximum of {}",
            limit, max_limit
        ))),
        Some(limit) => Ok(Some(limit)),
        None => Ok(default),
    }
}

/// Deserialize an optional `u64`, rejecting negative values.
pub fn de_u64_opt<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    // `serde_urlencoded` always yields strings, so deserialize as `Option<String>`
    // and trim any stray quotes before parsing.
    Option::<String>::deserialize(deserializer)?
        .map(|raw| {
            let trimmed = raw.trim_matches('"');
            let value: i64 = trimmed
                .parse()
                .map_err(|e| Error::custom(format!("invalid integer '{}': {}", raw, e)))?;
            u64::try_from(value)
                .map_err(|_| Error::custom(format!("negative value '{}' not allowed", raw)))
        })
        .transpose()
}
