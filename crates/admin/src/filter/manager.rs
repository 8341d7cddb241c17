use std::collections::BTreeMap;
use std::sync::Arc;

use catalog_core::listing::SortDirection;
use tokio::sync::watch;

use super::action::FilterAction;
use super::history::{History, Location};
use super::reducer::reduce;
use super::schema::FilterSchema;
use super::state::FilterState;

/// Owns one table's filter state and keeps the URL in step with it.
///
/// Every dispatched action publishes the new state on a [`watch`] channel;
/// the list controller debounces that channel and re-fetches.
pub struct FilterManager {
    schema: Arc<FilterSchema>,
    history: Arc<dyn History>,
    state: FilterState,
    tx: watch::Sender<FilterState>,
}

impl FilterManager {
    /// Start from the state encoded in the current history entry.
    pub fn new(schema: Arc<FilterSchema>, history: Arc<dyn History>) -> Self {
        let state = schema.parse_query(&history.location().search);
        let (tx, _) = watch::channel(state.clone());
        Self {
            schema,
            history,
            state,
            tx,
        }
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn schema(&self) -> &Arc<FilterSchema> {
        &self.schema
    }

    pub fn history(&self) -> &Arc<dyn History> {
        &self.history
    }

    /// Receive every state the manager publishes.
    pub fn subscribe(&self) -> watch::Receiver<FilterState> {
        self.tx.subscribe()
    }

    pub fn dispatch(&mut self, action: FilterAction) {
        tracing::trace!(?action, "Dispatching filter action");
        self.state = reduce(&self.state, action);
        self.tx.send_replace(self.state.clone());
    }

    pub fn change_search(&mut self, value: impl Into<String>) {
        self.dispatch(FilterAction::SetSearch(value.into()));
    }

    /// `page` is the table's 0-based page index. Negative indexes mean the
    /// first page.
    pub fn change_page(&mut self, page: i64) {
        self.dispatch(FilterAction::SetPage(page.max(0).saturating_add(1)));
    }

    pub fn change_rows_per_page(&mut self, per_page: i64) {
        self.dispatch(FilterAction::SetPerPage(per_page));
    }

    /// Sort by `column` in `direction` (`asc`/`desc`, any case).
    pub fn change_column_sort(&mut self, column: &str, direction: &str) {
        self.dispatch(FilterAction::SetOrder {
            sort: Some(column.to_string()),
            dir: SortDirection::parse(direction),
        });
    }

    pub fn change_extra_filter(&mut self, changes: BTreeMap<String, Option<Vec<String>>>) {
        self.dispatch(FilterAction::SetExtraFilter(changes));
    }

    pub fn reset_filter(&mut self) {
        let defaults = self.schema.defaults();
        self.dispatch(FilterAction::Reset(defaults));
    }

    /// The table's 0-based page index for the current state.
    pub fn table_page(&self) -> i64 {
        self.state.pagination.page - 1
    }

    /// Parse the current history entry without touching the manager's state.
    pub fn state_from_url(&self) -> FilterState {
        self.schema.parse_query(&self.history.location().search)
    }

    /// Rewrite the current entry with the canonical URL of the current state.
    ///
    /// Called once when the table mounts.
    pub fn replace_history(&self) {
        let location = location_for(&*self.history, &self.schema, &self.state);
        self.history.replace(location);
    }

    /// Push the current state unless the current entry already holds it.
    pub fn push_history(&self) -> bool {
        push_history(&*self.history, &self.schema, &self.state)
    }
}

/// Push `state` onto `history` unless the current entry carries an equal
/// state. Returns `true` if an entry was added.
pub fn push_history(history: &dyn History, schema: &FilterSchema, state: &FilterState) -> bool {
    if history.location().state.as_ref() == Some(state) {
        return false;
    }
    let location = location_for(history, schema, state);
    tracing::debug!(search = %location.search, "Pushing filter state to history");
    history.push(location);
    true
}

fn location_for(history: &dyn History, schema: &FilterSchema, state: &FilterState) -> Location {
    Location {
        pathname: history.location().pathname,
        search: schema.format_query(state),
        state: Some(state.clone()),
    }
}
