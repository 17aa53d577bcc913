use page_core::PageError;
use thiserror::Error;

/// Domain-level failures for both entities.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("city not found: {id}")]
    CityNotFound { id: i32 },

    #[error("country not found: {id}")]
    CountryNotFound { id: i32 },

    #[error("path id {path_id} does not match record id {body_id}")]
    IdMismatch { path_id: i32, body_id: i32 },

    /// The record's persisted version changed between read and write; the
    /// caller must re-read and retry. Never merged or silently overwritten.
    #[error("record {id} was modified concurrently")]
    VersionConflict { id: i32 },

    #[error("validation failed: {field}: {message}")]
    Validation { field: String, message: String },

    /// Listing errors propagate unmodified from the paging layer.
    #[error(transparent)]
    Listing(#[from] PageError),

    #[error("database error: {message}")]
    Database { message: String },
}

impl DomainError {
    pub fn city_not_found(id: i32) -> Self {
        Self::CityNotFound { id }
    }

    pub fn country_not_found(id: i32) -> Self {
        Self::CountryNotFound { id }
    }

    pub fn id_mismatch(path_id: i32, body_id: i32) -> Self {
        Self::IdMismatch { path_id, body_id }
    }

    pub fn version_conflict(id: i32) -> Self {
        Self::VersionConflict { id }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }
}
