pub mod cities;
pub mod countries;
pub mod error;
pub mod model;
pub mod repo;

use page_core::{PageError, PageRequest};

use crate::config::WorldCitiesConfig;
use crate::domain::model::ListRequest;

/// Apply defaults and the configured cap, then hand the raw listing
/// parameters to `PageRequest` for validation.
pub(crate) fn page_request(
    raw: &ListRequest,
    config: &WorldCitiesConfig,
) -> Result<PageRequest, PageError> {
    let mut req = PageRequest::from_raw(
        raw.page_index.unwrap_or(0),
        raw.page_size.unwrap_or(i64::from(config.default_page_size)),
        raw.sort_column.as_deref(),
        raw.sort_order.as_deref(),
        raw.filter_column.as_deref(),
        raw.filter_query.as_deref(),
    )?;
    req.clamp_page_size(u64::from(config.max_page_size));
    Ok(req)
}
