use serde::{Deserialize, Serialize};

use crate::request::{PageRequest, SortDir};

/// One page of a listing plus the navigation metadata callers page with.
///
/// Constructed once per query and immutable afterwards. `total_pages` and
/// the navigation flags are always derived from `total_count`, `page_size`
/// and `page_index` at construction time, so they cannot drift apart.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResult<T> {
    data: Vec<T>,
    total_count: u64,
    page_index: u64,
    page_size: u64,
    sort_column: Option<String>,
    sort_order: Option<SortDir>,
    filter_column: Option<String>,
    filter_query: Option<String>,
    total_pages: u64,
    has_previous_page: bool,
    has_next_page: bool,
}

impl<T> PagedResult<T> {
    /// Assemble a page from the materialized records, the count of the
    /// (filtered) source and the request that produced them. The request's
    /// parameters are echoed back even when they triggered no-ops.
    pub fn new(data: Vec<T>, total_count: u64, req: &PageRequest) -> Self {
        let total_pages = total_count.div_ceil(req.page_size());
        Self {
            total_count,
            page_index: req.page_index(),
            page_size: req.page_size(),
            sort_column: req.sort().map(|s| s.column().to_owned()),
            sort_order: req.sort().map(|s| s.dir()),
            filter_column: req.filter().map(|f| f.column().to_owned()),
            filter_query: req.filter().map(|f| f.query().to_owned()),
            total_pages,
            has_previous_page: req.page_index() > 0,
            has_next_page: req.page_index() + 1 < total_pages,
            data,
        }
    }

    /// Map records while preserving the paging metadata (row -> DTO
    /// mapping convenience).
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> PagedResult<U> {
        PagedResult {
            data: self.data.into_iter().map(&mut f).collect(),
            total_count: self.total_count,
            page_index: self.page_index,
            page_size: self.page_size,
            sort_column: self.sort_column,
            sort_order: self.sort_order,
            filter_column: self.filter_column,
            filter_query: self.filter_query,
            total_pages: self.total_pages,
            has_previous_page: self.has_previous_page,
            has_next_page: self.has_next_page,
        }
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn into_data(self) -> Vec<T> {
        self.data
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn page_index(&self) -> u64 {
        self.page_index
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    pub fn total_pages(&self) -> u64 {
        self.total_pages
    }

    pub fn has_previous_page(&self) -> bool {
        self.has_previous_page
    }

    pub fn has_next_page(&self) -> bool {
        self.has_next_page
    }

    pub fn sort_column(&self) -> Option<&str> {
        self.sort_column.as_deref()
    }

    pub fn sort_order(&self) -> Option<SortDir> {
        self.sort_order
    }

    pub fn filter_column(&self) -> Option<&str> {
        self.filter_column.as_deref()
    }

    pub fn filter_query(&self) -> Option<&str> {
        self.filter_query.as_deref()
    }
}
