//! Query-string codec for [`FilterState`].
//!
//! Parsing never fails: every value that does not fit its rule falls back to
//! the table default. Formatting only emits values that differ from the
//! defaults so clean URLs stay clean.

use catalog_core::listing::{parse_csv, SortDirection};
use reqwest::Url;

use super::state::{ExtraFilter, FilterState, Order, Pagination};
use crate::http::QueryParams;

/// A table column as the filter layer sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub label: &'static str,
    pub sortable: bool,
}

impl Column {
    pub const fn sortable(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            sortable: true,
        }
    }

    pub const fn fixed(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            sortable: false,
        }
    }
}

/// Defaulting rules for one table's URL state.
#[derive(Debug, Clone)]
pub struct FilterSchema {
    columns: Vec<Column>,
    rows_per_page: i64,
    rows_per_page_options: Vec<i64>,
    extra_filter_keys: Vec<&'static str>,
}

impl FilterSchema {
    pub fn new(
        columns: &[Column],
        rows_per_page: i64,
        rows_per_page_options: &[i64],
        extra_filter_keys: &[&'static str],
    ) -> Self {
        Self {
            columns: columns.to_vec(),
            rows_per_page,
            rows_per_page_options: rows_per_page_options.to_vec(),
            extra_filter_keys: extra_filter_keys.to_vec(),
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows_per_page(&self) -> i64 {
        self.rows_per_page
    }

    pub fn rows_per_page_options(&self) -> &[i64] {
        &self.rows_per_page_options
    }

    /// The state a table starts from when the URL carries nothing.
    pub fn defaults(&self) -> FilterState {
        FilterState::initial(self.rows_per_page)
    }

    pub fn is_sortable(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c.sortable && c.name == column)
    }

    /// Parse a query string (with or without a leading `?`).
    pub fn parse_query(&self, query: &str) -> FilterState {
        let pairs = decode(query);
        let get = |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };

        let page = get("page")
            .and_then(|v| v.trim().parse::<i64>().ok())
            .filter(|&p| p >= 1)
            .unwrap_or(1);
        let per_page = get("per_page")
            .and_then(|v| v.trim().parse::<i64>().ok())
            .filter(|p| self.rows_per_page_options.contains(p))
            .unwrap_or(self.rows_per_page);
        let sort = get("sort")
            .filter(|s| self.is_sortable(s))
            .map(str::to_string);
        // A direction means nothing without a column to sort by.
        let dir = sort
            .as_ref()
            .and(get("dir"))
            .and_then(SortDirection::parse);

        let mut extra_filter = ExtraFilter::new();
        for key in &self.extra_filter_keys {
            let values = get(key).map(parse_csv).unwrap_or_default();
            if !values.is_empty() {
                extra_filter.insert(key.to_string(), values);
            }
        }

        FilterState {
            search: get("search").unwrap_or_default().to_string(),
            pagination: Pagination { page, per_page },
            order: Order { sort, dir },
            extra_filter,
        }
    }

    /// Non-default values only, in a stable order.
    pub fn format_params(&self, state: &FilterState) -> QueryParams {
        let mut params = QueryParams::new();
        if !state.search.is_empty() {
            params.push(("search".into(), state.search.clone()));
        }
        if state.pagination.page != 1 {
            params.push(("page".into(), state.pagination.page.to_string()));
        }
        if state.pagination.per_page != self.rows_per_page {
            params.push(("per_page".into(), state.pagination.per_page.to_string()));
        }
        if let Some(ref sort) = state.order.sort {
            params.push(("sort".into(), sort.clone()));
            if let Some(dir) = state.order.dir {
                params.push(("dir".into(), dir.as_str().into()));
            }
        }
        self.push_extra_filter(&mut params, state);
        params
    }

    /// Encoded query string for the browser location, without a leading `?`.
    pub fn format_query(&self, state: &FilterState) -> String {
        encode(&self.format_params(state))
    }

    /// Parameters for the list endpoint. Page and page size are always sent.
    pub fn request_params(&self, state: &FilterState) -> QueryParams {
        let mut params = QueryParams::new();
        if !state.search.is_empty() {
            params.push(("search".into(), state.search.clone()));
        }
        params.push(("page".into(), state.pagination.page.to_string()));
        params.push(("per_page".into(), state.pagination.per_page.to_string()));
        if let Some(ref sort) = state.order.sort {
            params.push(("sort".into(), sort.clone()));
            if let Some(dir) = state.order.dir {
                params.push(("dir".into(), dir.as_str().into()));
            }
        }
        self.push_extra_filter(&mut params, state);
        params
    }

    fn push_extra_filter(&self, params: &mut QueryParams, state: &FilterState) {
        for key in &self.extra_filter_keys {
            if let Some(values) = state.extra_filter.get(*key).filter(|v| !v.is_empty()) {
                params.push((key.to_string(), values.join(",")));
            }
        }
    }
}

fn decode(query: &str) -> Vec<(String, String)> {
    let query = query.trim_start_matches('?');
    match Url::parse(&format!("http://localhost/?{query}")) {
        Ok(url) => url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect(),
        Err(_) => Vec::new(),
    }
}

fn encode(params: &[(String, String)]) -> String {
    let Ok(mut url) = Url::parse("http://localhost/") else {
        return String::new();
    };
    if params.is_empty() {
        return String::new();
    }
    url.query_pairs_mut().extend_pairs(params);
    url.query().unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> FilterSchema {
        FilterSchema::new(
            &[
                Column::sortable("name", "Name"),
                Column::fixed("categories", "Categories"),
                Column::sortable("created_at", "Created"),
            ],
            15,
            &[15, 25, 50],
            &["categories"],
        )
    }

    #[test]
    fn empty_query_yields_defaults() {
        assert_eq!(schema().parse_query(""), schema().defaults());
        assert_eq!(schema().parse_query("?"), schema().defaults());
    }

    #[test]
    fn invalid_values_fall_back() {
        let state = schema().parse_query("page=0&per_page=30&sort=categories&dir=sideways");
        assert_eq!(state.pagination.page, 1);
        assert_eq!(state.pagination.per_page, 15);
        assert_eq!(state.order, Order::default());

        let state = schema().parse_query("page=abc&per_page=x&sort=password");
        assert_eq!(state.pagination.page, 1);
        assert_eq!(state.pagination.per_page, 15);
        assert!(state.order.sort.is_none());
    }

    #[test]
    fn valid_values_are_kept_and_dir_is_case_insensitive() {
        let state =
            schema().parse_query("?search=dark%20city&page=4&per_page=50&sort=name&dir=DESC");
        assert_eq!(state.search, "dark city");
        assert_eq!(state.pagination, Pagination { page: 4, per_page: 50 });
        assert_eq!(state.order.sort.as_deref(), Some("name"));
        assert_eq!(state.order.dir, Some(SortDirection::Desc));
    }

    #[test]
    fn dir_without_sort_is_dropped() {
        let state = schema().parse_query("dir=desc");
        assert_eq!(state, schema().defaults());
        assert_eq!(schema().format_query(&state), "");

        let state = schema().parse_query("sort=categories&dir=desc");
        assert_eq!(state.order, Order::default());
    }

    #[test]
    fn request_params_send_dir_only_with_sort() {
        let mut state = schema().defaults();
        state.order.dir = Some(SortDirection::Desc);
        let keys: Vec<_> = schema()
            .request_params(&state)
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(keys, ["page", "per_page"]);
    }

    #[test]
    fn extra_filter_parses_comma_lists_and_drops_empty() {
        let state = schema().parse_query("categories=Drama,%20Horror,");
        assert_eq!(
            state.extra_filter.get("categories"),
            Some(&vec!["Drama".to_string(), "Horror".to_string()])
        );
        assert!(schema().parse_query("categories=").extra_filter.is_empty());
    }

    #[test]
    fn defaults_format_to_an_empty_query() {
        assert_eq!(schema().format_query(&schema().defaults()), "");
    }

    #[test]
    fn only_non_default_values_are_formatted() {
        let mut state = schema().defaults();
        state.pagination.page = 2;
        state.order.sort = Some("name".into());
        state.order.dir = Some(SortDirection::Asc);

        let keys: Vec<_> = schema()
            .format_params(&state)
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(keys, ["page", "sort", "dir"]);
    }

    #[test]
    fn formatted_query_parses_back_to_the_same_state() {
        let mut state = schema().defaults();
        state.search = "a&b".into();
        state.pagination = Pagination { page: 3, per_page: 25 };
        state.order = Order {
            sort: Some("created_at".into()),
            dir: Some(SortDirection::Desc),
        };
        state
            .extra_filter
            .insert("categories".into(), vec!["Kids".into(), "Family".into()]);

        let query = schema().format_query(&state);
        assert_eq!(schema().parse_query(&query), state);
    }

    #[test]
    fn request_params_always_carry_the_page_window() {
        let params = schema().request_params(&schema().defaults());
        assert_eq!(
            params,
            vec![
                ("page".to_string(), "1".to_string()),
                ("per_page".to_string(), "15".to_string()),
            ]
        );
    }
}
