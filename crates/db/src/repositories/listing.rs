//! Dynamic WHERE / ORDER BY / LIMIT assembly shared by the list queries.
//!
//! Each repository pushes its filter clauses into [`Conditions`], then hands
//! the assembled SQL to [`fetch_page`], which runs the `COUNT(*)` and the row
//! query with identical bindings.

use std::collections::HashMap;

use catalog_core::listing::{resolve_sort, PageRequest, SortDirection};
use catalog_core::types::DbId;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::{QueryAs, QueryScalar};
use sqlx::{FromRow, PgPool, Postgres, Row};

/// Sort and window options for a list query.
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// Requested sort column; ignored unless it is whitelisted.
    pub sort: Option<String>,
    pub dir: SortDirection,
    /// `None` returns every matching row.
    pub page: Option<PageRequest>,
}

/// One page of rows plus the total number of matching rows.
#[derive(Debug, Clone)]
pub struct ListPage<T> {
    pub items: Vec<T>,
    pub total: i64,
}

impl<T> ListPage<T> {
    /// Transform the rows while keeping the total.
    pub fn map_items<U>(self, f: impl FnOnce(Vec<T>) -> Vec<U>) -> ListPage<U> {
        ListPage {
            items: f(self.items),
            total: self.total,
        }
    }
}

/// A typed bind value for dynamic queries.
#[derive(Debug, Clone)]
pub(crate) enum BindValue {
    Text(String),
    TextArray(Vec<String>),
    Bool(bool),
    SmallIntArray(Vec<i16>),
    UuidArray(Vec<DbId>),
}

/// Accumulates `AND`-joined clauses and their bind values.
#[derive(Debug, Default)]
pub(crate) struct Conditions {
    clauses: Vec<String>,
    values: Vec<BindValue>,
}

impl Conditions {
    pub(crate) fn new(base: &str) -> Self {
        Self {
            clauses: vec![base.to_string()],
            values: Vec::new(),
        }
    }

    /// Push a clause. `clause` receives the `$n` placeholder index for `value`.
    pub(crate) fn push(&mut self, clause: impl FnOnce(usize) -> String, value: BindValue) {
        let idx = self.values.len() + 1;
        self.clauses.push(clause(idx));
        self.values.push(value);
    }

    /// Push a case-insensitive substring match on `column`.
    pub(crate) fn push_search(&mut self, column: &str, search: Option<&str>) {
        let Some(term) = search.map(str::trim).filter(|s| !s.is_empty()) else {
            return;
        };
        self.push(
            |idx| format!("{column} ILIKE ${idx}"),
            BindValue::Text(format!("%{}%", escape_like(term))),
        );
    }

    fn where_clause(&self) -> String {
        format!("WHERE {}", self.clauses.join(" AND "))
    }

    fn next_index(&self) -> usize {
        self.values.len() + 1
    }
}

/// Escape `LIKE` metacharacters so user input matches literally.
pub(crate) fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Build an `ORDER BY` clause from a whitelist.
///
/// `alias` prefixes the column (e.g. `c`); unknown or missing sort columns
/// fall back to newest first.
pub(crate) fn order_by(alias: &str, allowed: &[&str], options: &ListOptions) -> String {
    match resolve_sort(options.sort.as_deref(), allowed) {
        Some(column) => format!(
            "ORDER BY {alias}.{column} {}, {alias}.id ASC",
            options.dir.as_sql()
        ),
        None => format!("ORDER BY {alias}.created_at DESC, {alias}.id DESC"),
    }
}

/// Run a count query and a row query sharing the same filters.
///
/// `from` is everything between `SELECT` and `WHERE`, e.g.
/// `"categories c"`; `columns` is the projected column list.
pub(crate) async fn fetch_page<T>(
    pool: &PgPool,
    columns: &str,
    from: &str,
    conditions: &Conditions,
    order: &str,
    page: Option<PageRequest>,
) -> Result<ListPage<T>, sqlx::Error>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let where_clause = conditions.where_clause();

    let count_sql = format!("SELECT COUNT(*)::BIGINT FROM {from} {where_clause}");
    let total = bind_scalar(sqlx::query_scalar::<_, i64>(&count_sql), &conditions.values)
        .fetch_one(pool)
        .await?;

    let items = match page {
        Some(page) => {
            let idx = conditions.next_index();
            let sql = format!(
                "SELECT {columns} FROM {from} {where_clause} {order} LIMIT ${idx} OFFSET ${}",
                idx + 1
            );
            bind_rows(sqlx::query_as::<_, T>(&sql), &conditions.values)
                .bind(page.per_page)
                .bind(page.offset())
                .fetch_all(pool)
                .await?
        }
        None => {
            let sql = format!("SELECT {columns} FROM {from} {where_clause} {order}");
            bind_rows(sqlx::query_as::<_, T>(&sql), &conditions.values)
                .fetch_all(pool)
                .await?
        }
    };

    Ok(ListPage { items, total })
}

/// Bind a slice of `BindValue` to a sqlx `QueryAs`.
fn bind_rows<'q, O>(
    mut q: QueryAs<'q, Postgres, O, PgArguments>,
    values: &'q [BindValue],
) -> QueryAs<'q, Postgres, O, PgArguments> {
    for value in values {
        q = match value {
            BindValue::Text(v) => q.bind(v.as_str()),
            BindValue::TextArray(v) => q.bind(v.clone()),
            BindValue::Bool(v) => q.bind(*v),
            BindValue::SmallIntArray(v) => q.bind(v.clone()),
            BindValue::UuidArray(v) => q.bind(v.clone()),
        };
    }
    q
}

/// Bind a slice of `BindValue` to a sqlx `QueryScalar`.
fn bind_scalar<'q>(
    mut q: QueryScalar<'q, Postgres, i64, PgArguments>,
    values: &'q [BindValue],
) -> QueryScalar<'q, Postgres, i64, PgArguments> {
    for value in values {
        q = match value {
            BindValue::Text(v) => q.bind(v.as_str()),
            BindValue::TextArray(v) => q.bind(v.clone()),
            BindValue::Bool(v) => q.bind(*v),
            BindValue::SmallIntArray(v) => q.bind(v.clone()),
            BindValue::UuidArray(v) => q.bind(v.clone()),
        };
    }
    q
}

// ---------------------------------------------------------------------------
// Relation loading
// ---------------------------------------------------------------------------

/// A related row tagged with the id of the row that owns the link.
///
/// Queries select the owner id as `owner_id` next to the related columns.
pub(crate) struct Linked<T> {
    pub owner_id: DbId,
    pub item: T,
}

impl<'r, T> FromRow<'r, PgRow> for Linked<T>
where
    T: FromRow<'r, PgRow>,
{
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            owner_id: row.try_get("owner_id")?,
            item: T::from_row(row)?,
        })
    }
}

/// Group linked rows by owner id, preserving query order within each group.
pub(crate) fn group_by_owner<T>(rows: Vec<Linked<T>>) -> HashMap<DbId, Vec<T>> {
    let mut grouped: HashMap<DbId, Vec<T>> = HashMap::new();
    for row in rows {
        grouped.entry(row.owner_id).or_default().push(row.item);
    }
    grouped
}
