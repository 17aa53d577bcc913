use axum::http::StatusCode;
use page_core::PageError;

use crate::api::rest::problem::{Problem, ProblemResponse};
use crate::domain::error::DomainError;

/// Helper to create a ProblemResponse with less boilerplate.
pub fn from_parts(
    status: StatusCode,
    code: &str,
    title: &str,
    detail: impl Into<String>,
    instance: &str,
) -> ProblemResponse {
    ProblemResponse(
        Problem::new(status, title, detail)
            .with_code(code)
            .with_instance(instance),
    )
}

/// Map a domain error to an RFC 9457 problem response.
///
/// Column-validation failures surface as 400 with the offending name —
/// never a partial or empty result — and internal database details are
/// logged, not leaked.
pub fn map_domain_error(e: &DomainError, instance: &str) -> ProblemResponse {
    match e {
        DomainError::CityNotFound { .. } | DomainError::CountryNotFound { .. } => from_parts(
            StatusCode::NOT_FOUND,
            "WORLDCITIES_NOT_FOUND",
            "Not Found",
            e.to_string(),
            instance,
        ),
        DomainError::IdMismatch { .. } => from_parts(
            StatusCode::BAD_REQUEST,
            "WORLDCITIES_ID_MISMATCH",
            "Bad Request",
            e.to_string(),
            instance,
        ),
        DomainError::VersionConflict { .. } => from_parts(
            StatusCode::CONFLICT,
            "WORLDCITIES_VERSION_CONFLICT",
            "Conflict",
            e.to_string(),
            instance,
        ),
        DomainError::Validation { .. } => from_parts(
            StatusCode::BAD_REQUEST,
            "WORLDCITIES_VALIDATION",
            "Validation error",
            e.to_string(),
            instance,
        ),
        DomainError::Listing(page_err) => match page_err {
            PageError::UnknownColumn(name) => from_parts(
                StatusCode::BAD_REQUEST,
                "LISTING_UNKNOWN_COLUMN",
                "Unknown column",
                format!("column '{name}' does not exist"),
                instance,
            ),
            PageError::InvalidPageSize(_) | PageError::InvalidPageIndex(_) => from_parts(
                StatusCode::BAD_REQUEST,
                "LISTING_INVALID_PAGING",
                "Invalid paging",
                page_err.to_string(),
                instance,
            ),
            PageError::Db(_) => internal(e, instance),
        },
        DomainError::Database { .. } => internal(e, instance),
    }
}

fn internal(e: &DomainError, instance: &str) -> ProblemResponse {
    tracing::error!(error = ?e, "database error");
    from_parts(
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_DB",
        "Internal error",
        "An internal database error occurred",
        instance,
    )
}
