use std::collections::BTreeMap;

use catalog_core::listing::SortDirection;

use super::state::FilterState;

/// Tagged state transitions dispatched by table events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterAction {
    SetSearch(String),
    /// 1-based page number.
    SetPage(i64),
    SetPerPage(i64),
    SetOrder {
        sort: Option<String>,
        dir: Option<SortDirection>,
    },
    /// Replace the whole state with the table defaults.
    Reset(FilterState),
    /// Merge keys into the extra filter; `None` or an empty list removes a key.
    SetExtraFilter(BTreeMap<String, Option<Vec<String>>>),
}
