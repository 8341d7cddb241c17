//! Repository for the `categories` table.

use catalog_core::types::{new_id, DbId};
use sqlx::PgPool;

use crate::models::category::{Category, CategoryFilter, CreateCategory, UpdateCategory};
use crate::repositories::listing::{
    fetch_page, order_by, BindValue, Conditions, ListOptions, ListPage,
};

/// Column list shared across queries to avoid repetition.
pub(crate) const COLUMNS: &str =
    "c.id, c.name, c.description, c.is_active, c.created_at, c.updated_at, c.deleted_at";

/// Columns accepted by `?sort=`.
pub const SORTABLE: &[&str] = &["name", "is_active", "created_at"];

/// Provides CRUD operations for categories.
pub struct CategoryRepo;

impl CategoryRepo {
    /// Insert a new category, returning the created row.
    ///
    /// If `is_active` is `None`, defaults to `true`.
    pub async fn create(pool: &PgPool, input: &CreateCategory) -> Result<Category, sqlx::Error> {
        let query = format!(
            "INSERT INTO categories AS c (id, name, description, is_active)
             VALUES ($1, $2, $3, COALESCE($4, true))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(new_id())
            .bind(input.name.trim())
            .bind(&input.description)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    /// Find a category by id. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Category>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM categories c WHERE c.id = $1 AND c.deleted_at IS NULL");
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List categories matching `filter`, paginated and sorted per `options`.
    pub async fn list(
        pool: &PgPool,
        filter: &CategoryFilter,
        options: &ListOptions,
    ) -> Result<ListPage<Category>, sqlx::Error> {
        let mut conditions = Conditions::new("c.deleted_at IS NULL");
        conditions.push_search("c.name", filter.search.as_deref());
        if let Some(is_active) = filter.is_active {
            conditions.push(
                |idx| format!("c.is_active = ${idx}"),
                BindValue::Bool(is_active),
            );
        }

        let order = order_by("c", SORTABLE, options);
        fetch_page(pool, COLUMNS, "categories c", &conditions, &order, options.page).await
    }

    /// Replace every writable column. Returns `None` if the row does not exist.
    pub async fn replace(
        pool: &PgPool,
        id: DbId,
        input: &CreateCategory,
    ) -> Result<Option<Category>, sqlx::Error> {
        let query = format!(
            "UPDATE categories AS c SET
                name = $2,
                description = $3,
                is_active = COALESCE($4, true),
                updated_at = NOW()
             WHERE c.id = $1 AND c.deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .bind(input.name.trim())
            .bind(&input.description)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Update a category. Only non-`None` fields in `input` are applied;
    /// an explicit `null` description clears it.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCategory,
    ) -> Result<Option<Category>, sqlx::Error> {
        let query = format!(
            "UPDATE categories AS c SET
                name = COALESCE($2, c.name),
                description = CASE WHEN $5 THEN $3 ELSE c.description END,
                is_active = COALESCE($4, c.is_active),
                updated_at = NOW()
             WHERE c.id = $1 AND c.deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(input.description.clone().flatten())
            .bind(input.is_active)
            .bind(input.description.is_some())
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a category by id. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE categories SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
