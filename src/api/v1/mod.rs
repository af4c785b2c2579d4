//! V1 API handlers.

mod admin;
mod blog;
mod images;
mod leads;
mod schools;
mod system;
mod voice;

#[cfg(test)]
mod leads_test;
#[cfg(test)]
mod schools_test;
#[cfg(test)]
pub(crate) mod test_support;

pub use admin::*;
pub use blog::*;
pub use images::*;
pub use leads::*;
pub use schools::*;
pub use system::*;
pub use voice::*;

use axum::{Json, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::db::{DbError, SortOrder};

/// Error response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "Missing required fields: title")]
    pub error: String,
}

/// Handler error: status plus JSON body.
pub type ApiErrorResponse = (StatusCode, Json<ErrorResponse>);

pub(crate) fn error_response(status: StatusCode, message: impl Into<String>) -> ApiErrorResponse {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

pub(crate) fn bad_request(message: impl Into<String>) -> ApiErrorResponse {
    error_response(StatusCode::BAD_REQUEST, message)
}

/// Map a storage error for `entity` to a response.
///
/// Not-found and validation errors are reported to the caller. Anything else
/// is logged and replaced by `failure`, so storage details never leak.
pub(crate) fn db_error(e: DbError, entity: &str, failure: &str) -> ApiErrorResponse {
    match e {
        DbError::NotFound { .. } => {
            error_response(StatusCode::NOT_FOUND, format!("{entity} not found"))
        }
        DbError::Validation { message } => bad_request(message),
        DbError::AlreadyExists { .. } => {
            error_response(StatusCode::CONFLICT, format!("{entity} already exists"))
        }
        other => {
            error!(error = %other, "{failure}");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, failure)
        }
    }
}

/// Collect the names of required fields that are absent or blank.
pub(crate) fn missing_fields<'a>(fields: &[(&'a str, Option<&str>)]) -> Vec<&'a str> {
    fields
        .iter()
        .filter(|(_, value)| value.is_none_or(|v| v.trim().is_empty()))
        .map(|(name, _)| *name)
        .collect()
}

/// Reject a request naming every missing required field.
pub(crate) fn require_fields(fields: &[(&str, Option<&str>)]) -> Result<(), ApiErrorResponse> {
    let missing = missing_fields(fields);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(bad_request(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )))
    }
}

pub(crate) fn parse_sort_order(order: Option<&str>) -> Option<SortOrder> {
    match order {
        Some("desc") => Some(SortOrder::Desc),
        Some("asc") => Some(SortOrder::Asc),
        _ => None,
    }
}

/// Trim a field, turning blank strings into `None`.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
