//! World cities module: City and Country records behind paged, sortable,
//! filterable listings and guarded CRUD mutations.
//!
//! Layering follows the usual port/adapter split:
//! - `domain` — models, per-entity services, repository ports, errors;
//! - `infra` — SeaORM entities, migrations and repository adapters;
//! - `api` — REST DTOs, problem responses, handlers and the router.

pub mod api;
pub mod config;
pub mod domain;
pub mod infra;
