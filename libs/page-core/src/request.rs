use serde::{Deserialize, Serialize};

use crate::error::PageError;

/// Sort direction keyword as it appears on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDir {
    #[serde(rename = "ASC")]
    Asc,
    #[serde(rename = "DESC")]
    Desc,
}

impl SortDir {
    /// Normalize a raw direction keyword. Only a case-insensitive `"DESC"`
    /// selects descending; anything else falls back to ascending.
    pub fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("desc") {
            SortDir::Desc
        } else {
            SortDir::Asc
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortDir::Asc => "ASC",
            SortDir::Desc => "DESC",
        }
    }
}

/// Requested ordering: a column name (still unvalidated here) plus direction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sort {
    column: String,
    dir: SortDir,
}

impl Sort {
    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn dir(&self) -> SortDir {
        self.dir
    }
}

/// Requested substring filter: a column name plus the value to look up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Filter {
    column: String,
    query: String,
}

impl Filter {
    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn query(&self) -> &str {
        &self.query
    }
}

/// Validated paging/sorting/filtering parameters for one listing call.
///
/// `from_raw` is the only constructor; it owns all the input edge cases so
/// the query layer never sees a zero page size, a negative index, an empty
/// column name, or a half-specified filter.
#[derive(Clone, Debug)]
pub struct PageRequest {
    page_index: u64,
    page_size: u64,
    sort: Option<Sort>,
    filter: Option<Filter>,
}

impl PageRequest {
    /// Build a request from raw caller input.
    ///
    /// - `page_index < 0` and `page_size <= 0` are input errors (the latter
    ///   also guards the division in the total-pages computation);
    /// - empty or whitespace-only strings count as absent;
    /// - the filter activates only when both column and query are present,
    ///   one without the other behaves exactly like no filter;
    /// - the sort direction is normalized per [`SortDir::parse`] and only
    ///   retained when a sort column is present.
    pub fn from_raw(
        page_index: i64,
        page_size: i64,
        sort_column: Option<&str>,
        sort_order: Option<&str>,
        filter_column: Option<&str>,
        filter_query: Option<&str>,
    ) -> Result<Self, PageError> {
        if page_index < 0 {
            return Err(PageError::InvalidPageIndex(page_index));
        }
        if page_size <= 0 {
            return Err(PageError::InvalidPageSize(page_size));
        }

        let sort = non_empty(sort_column).map(|column| Sort {
            column: column.to_owned(),
            dir: non_empty(sort_order)
                .map(SortDir::parse)
                .unwrap_or(SortDir::Asc),
        });

        let filter = match (non_empty(filter_column), non_empty(filter_query)) {
            (Some(column), Some(query)) => Some(Filter {
                column: column.to_owned(),
                query: query.to_owned(),
            }),
            _ => None,
        };

        Ok(Self {
            page_index: page_index as u64,
            page_size: page_size as u64,
            sort,
            filter,
        })
    }

    /// Cap the page size at a configured maximum. The capped value is the
    /// one echoed in the result, keeping the total-pages arithmetic honest.
    pub fn clamp_page_size(&mut self, max: u64) {
        if max > 0 && self.page_size > max {
            self.page_size = max;
        }
    }

    pub fn page_index(&self) -> u64 {
        self.page_index
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Number of records to skip before the requested page.
    pub fn offset(&self) -> u64 {
        self.page_index * self.page_size
    }

    pub fn sort(&self) -> Option<&Sort> {
        self.sort.as_ref()
    }

    pub fn filter(&self) -> Option<&Filter> {
        self.filter.as_ref()
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}
