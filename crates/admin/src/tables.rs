//! Per-resource table definitions.

use std::sync::Arc;
use std::time::Duration;

use catalog_core::catalog::CastMemberType;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::AdminError;
use crate::filter::{Column, FilterManager, FilterSchema, History};
use crate::http::ResourceClient;
use crate::models::Category;
use crate::table::{ListController, ListSource, Notifier, TableSnapshot};

/// Static description of one list page.
#[derive(Debug, Clone, Copy)]
pub struct TableDefinition {
    /// API resource path, also the page path.
    pub resource: &'static str,
    pub title: &'static str,
    pub columns: &'static [Column],
    pub rows_per_page: i64,
    pub rows_per_page_options: &'static [i64],
    pub debounce: Duration,
    /// Query keys of the table's extra filters.
    pub extra_filter: &'static [&'static str],
}

pub const CATEGORIES: TableDefinition = TableDefinition {
    resource: "categories",
    title: "Categories",
    columns: &[
        Column::sortable("name", "Name"),
        Column::sortable("is_active", "Active"),
        Column::sortable("created_at", "Created at"),
    ],
    rows_per_page: 10,
    rows_per_page_options: &[10, 25, 50],
    debounce: Duration::from_millis(200),
    extra_filter: &[],
};

pub const GENRES: TableDefinition = TableDefinition {
    resource: "genres",
    title: "Genres",
    columns: &[
        Column::sortable("name", "Name"),
        Column::fixed("categories", "Categories"),
        Column::sortable("created_at", "Created at"),
    ],
    rows_per_page: 15,
    rows_per_page_options: &[15, 25, 50],
    debounce: Duration::from_millis(300),
    extra_filter: &["categories"],
};

pub const CAST_MEMBERS: TableDefinition = TableDefinition {
    resource: "cast-members",
    title: "Cast members",
    columns: &[
        Column::sortable("name", "Name"),
        Column::sortable("type", "Type"),
        Column::sortable("created_at", "Created at"),
    ],
    rows_per_page: 15,
    rows_per_page_options: &[15, 25, 50],
    debounce: Duration::from_millis(300),
    extra_filter: &["type"],
};

pub const VIDEOS: TableDefinition = TableDefinition {
    resource: "videos",
    title: "Videos",
    columns: &[
        Column::sortable("title", "Title"),
        Column::fixed("genres", "Genres"),
        Column::fixed("categories", "Categories"),
        Column::sortable("created_at", "Created at"),
    ],
    rows_per_page: 15,
    rows_per_page_options: &[15, 25, 50],
    debounce: Duration::from_millis(300),
    extra_filter: &[],
};

pub const ALL: [&TableDefinition; 4] = [&CATEGORIES, &GENRES, &CAST_MEMBERS, &VIDEOS];

/// Look a table up by resource path.
pub fn find(resource: &str) -> Option<&'static TableDefinition> {
    ALL.into_iter().find(|t| t.resource == resource)
}

/// A table wired to its data source.
pub struct MountedTable<T> {
    pub manager: FilterManager,
    pub snapshot: watch::Receiver<TableSnapshot<T>>,
    pub task: JoinHandle<()>,
}

impl TableDefinition {
    pub fn schema(&self) -> FilterSchema {
        FilterSchema::new(
            self.columns,
            self.rows_per_page,
            self.rows_per_page_options,
            self.extra_filter,
        )
    }

    pub fn pathname(&self) -> String {
        format!("/{}", self.resource)
    }

    /// Build the filter manager from the current URL, canonicalize the URL,
    /// and start the list controller.
    pub fn mount<T: Send + Sync + 'static>(
        &self,
        source: Arc<dyn ListSource<T>>,
        notifier: Arc<dyn Notifier>,
        history: Arc<dyn History>,
        shutdown: CancellationToken,
    ) -> MountedTable<T> {
        let schema = Arc::new(self.schema());
        let manager = FilterManager::new(Arc::clone(&schema), Arc::clone(&history));
        manager.replace_history();

        let controller = ListController::new(source, notifier, history, schema, self.debounce);
        let snapshot = controller.snapshot();
        let task = controller.spawn(manager.subscribe(), shutdown);
        tracing::debug!(resource = self.resource, "Mounted table");

        MountedTable {
            manager,
            snapshot,
            task,
        }
    }
}

/// Category names offered by the genre table's `categories` filter.
pub async fn category_filter_options(
    client: &ResourceClient<Category>,
) -> Result<Vec<String>, AdminError> {
    let response = client.list(&[("all".to_string(), String::new())]).await?;
    Ok(response.data.into_iter().map(|c| c.name).collect())
}

/// `(value, label)` pairs offered by the cast member table's `type` filter.
pub fn cast_member_type_options() -> Vec<(String, &'static str)> {
    CastMemberType::ALL
        .iter()
        .map(|&t| (i16::from(t).to_string(), t.label()))
        .collect()
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use catalog_core::listing::{ListMeta, PageRequest};

    use super::*;
    use crate::filter::MemoryHistory;
    use crate::models::ListResponse;
    use crate::table::LogNotifier;

    #[test]
    fn every_default_page_size_is_an_option() {
        for table in ALL {
            assert!(
                table.rows_per_page_options.contains(&table.rows_per_page),
                "{} default page size missing from options",
                table.resource
            );
        }
    }

    #[test]
    fn extra_filters_round_trip_through_the_schema() {
        let schema = GENRES.schema();
        let state = schema.parse_query("categories=Drama,Kids&per_page=25");
        assert_eq!(state.pagination.per_page, 25);
        assert_eq!(schema.format_query(&state), "per_page=25&categories=Drama%2CKids");
    }

    #[test]
    fn non_sortable_columns_are_rejected_as_sort() {
        let state = VIDEOS.schema().parse_query("sort=genres&dir=asc");
        assert!(state.order.sort.is_none());
        assert!(CATEGORIES.schema().is_sortable("is_active"));
    }

    #[test]
    fn find_looks_up_by_resource() {
        assert_eq!(find("cast-members").map(|t| t.rows_per_page), Some(15));
        assert!(find("users").is_none());
    }

    #[test]
    fn cast_member_type_options_use_wire_values() {
        assert_eq!(
            cast_member_type_options(),
            vec![("1".to_string(), "Director"), ("2".to_string(), "Actor")]
        );
    }

    struct Empty;

    #[async_trait]
    impl ListSource<String> for Empty {
        async fn fetch(
            &self,
            _params: &[(String, String)],
            _cancel: &CancellationToken,
        ) -> Result<ListResponse<String>, AdminError> {
            Ok(ListResponse {
                data: Vec::new(),
                meta: ListMeta::new(&PageRequest::new(None, None, 10, 100), 0, 0),
            })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn mount_canonicalizes_the_url() {
        let history = Arc::new(MemoryHistory::at("/categories", "per_page=15&page=2"));
        let shutdown = CancellationToken::new();

        let table = CATEGORIES.mount::<String>(
            Arc::new(Empty),
            Arc::new(LogNotifier),
            history.clone(),
            shutdown.clone(),
        );

        // 15 is not a category page size, so it falls back to the default.
        assert_eq!(table.manager.state().pagination.per_page, 10);
        assert_eq!(history.location().search, "page=2");

        shutdown.cancel();
        table.task.await.unwrap();
    }
}
