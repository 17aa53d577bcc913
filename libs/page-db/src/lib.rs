//! Paged listings over SeaORM selects.
//!
//! The two halves of the engine:
//! - [`ColumnMap`] — a closed, case-insensitive registry from API column
//!   name to a typed SQL expression. It is the only gate between
//!   caller-supplied sort/filter strings and the query; anything not
//!   registered fails with `PageError::UnknownColumn`.
//! - [`paginate`] — the filter → count → order → window combiner that
//!   materializes one page and returns it as a `page_core::PagedResult`.

mod columns;
mod select;

pub use columns::{ColumnKind, ColumnMap, ListColumn};
pub use select::paginate;
