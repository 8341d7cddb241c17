use std::collections::BTreeMap;

use catalog_core::listing::SortDirection;

/// Extra per-table filters keyed by query parameter (`categories`, `type`).
///
/// A key is present only while it has at least one value.
pub type ExtraFilter = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based page number.
    pub page: i64,
    pub per_page: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Order {
    pub sort: Option<String>,
    pub dir: Option<SortDirection>,
}

/// Everything a server-side table sends to the list endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub search: String,
    pub pagination: Pagination,
    pub order: Order,
    pub extra_filter: ExtraFilter,
}

impl FilterState {
    /// Empty search, first page, unsorted, no extra filter.
    pub fn initial(per_page: i64) -> Self {
        Self {
            search: String::new(),
            pagination: Pagination { page: 1, per_page },
            order: Order::default(),
            extra_filter: ExtraFilter::new(),
        }
    }
}
