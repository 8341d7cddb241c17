use super::action::FilterAction;
use super::state::{FilterState, Order};

/// Apply `action` to `state`.
///
/// Every action except page and page-size changes sends the table back to
/// page 1.
pub fn reduce(state: &FilterState, action: FilterAction) -> FilterState {
    let mut next = state.clone();
    match action {
        FilterAction::SetSearch(search) => {
            next.search = search;
            next.pagination.page = 1;
        }
        FilterAction::SetPage(page) => {
            next.pagination.page = page;
        }
        FilterAction::SetPerPage(per_page) => {
            next.pagination.per_page = per_page;
        }
        FilterAction::SetOrder { sort, dir } => {
            next.order = Order { sort, dir };
            next.pagination.page = 1;
        }
        FilterAction::Reset(initial) => {
            next = initial;
        }
        FilterAction::SetExtraFilter(changes) => {
            for (key, values) in changes {
                match values {
                    Some(values) if !values.is_empty() => {
                        next.extra_filter.insert(key, values);
                    }
                    _ => {
                        next.extra_filter.remove(&key);
                    }
                }
            }
            next.pagination.page = 1;
        }
    }
    next
}
