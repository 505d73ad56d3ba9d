//! Common helper functions used across API endpoints

use api_types::ErrorResponse;
use axum::{
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Create a database error response with logging
pub fn database_error(operation: &str, error: impl std::fmt::Display) -> ErrorResponse {
    tracing::error!(operation = operation, error = %error, "Database operation failed");
    ErrorResponse::database_error()
}

/// Serialize `rows` as CSV with a header row.
pub fn to_csv<T: Serialize>(rows: &[T]) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    writer.into_inner().map_err(|e| e.into_error().into())
}

/// Build a CSV attachment response named `filename`.
pub fn csv_response<T: Serialize>(rows: &[T], filename: &str) -> Result<Response, ErrorResponse> {
    let body = to_csv(rows).map_err(|e| {
        tracing::error!(error = %e, filename, "Failed to encode CSV");
        ErrorResponse::new(
            "encoding-error",
            "Internal Server Error",
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to encode CSV",
        )
    })?;
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{}\"", filename))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));
    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("text/csv; charset=utf-8")),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}
