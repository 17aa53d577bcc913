use thiserror::Error;

/// Errors surfaced while building or running a paged listing.
///
/// Column-name failures are never silently corrected: a caller-supplied
/// name that is not in the registry aborts the whole request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PageError {
    #[error("unknown column: {0}")]
    UnknownColumn(String),

    #[error("invalid page size: {0}")]
    InvalidPageSize(i64),

    #[error("invalid page index: {0}")]
    InvalidPageIndex(i64),

    #[error("database error: {0}")]
    Db(String),
}
