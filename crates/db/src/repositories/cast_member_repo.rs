//! Repository for the `cast_members` table.

use catalog_core::types::{new_id, DbId};
use sqlx::PgPool;

use crate::models::cast_member::{
    CastMember, CastMemberFilter, CreateCastMember, UpdateCastMember,
};
use crate::repositories::listing::{
    fetch_page, order_by, BindValue, Conditions, ListOptions, ListPage,
};

/// Column list shared across queries to avoid repetition.
pub(crate) const COLUMNS: &str =
    "cm.id, cm.name, cm.type, cm.created_at, cm.updated_at, cm.deleted_at";

/// Columns accepted by `?sort=`.
pub const SORTABLE: &[&str] = &["name", "type", "created_at"];

/// Provides CRUD operations for cast members.
pub struct CastMemberRepo;

impl CastMemberRepo {
    /// Insert a new cast member, returning the created row.
    ///
    /// `input.kind` must already be validated as present.
    pub async fn create(
        pool: &PgPool,
        input: &CreateCastMember,
    ) -> Result<CastMember, sqlx::Error> {
        let query = format!(
            "INSERT INTO cast_members AS cm (id, name, type)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CastMember>(&query)
            .bind(new_id())
            .bind(input.name.trim())
            .bind(input.kind)
            .fetch_one(pool)
            .await
    }

    /// Find a cast member by id. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<CastMember>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM cast_members cm WHERE cm.id = $1 AND cm.deleted_at IS NULL"
        );
        sqlx::query_as::<_, CastMember>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List cast members matching `filter`, paginated and sorted per `options`.
    pub async fn list(
        pool: &PgPool,
        filter: &CastMemberFilter,
        options: &ListOptions,
    ) -> Result<ListPage<CastMember>, sqlx::Error> {
        let mut conditions = Conditions::new("cm.deleted_at IS NULL");
        conditions.push_search("cm.name", filter.search.as_deref());
        if !filter.kinds.is_empty() {
            conditions.push(
                |idx| format!("cm.type = ANY(${idx})"),
                BindValue::SmallIntArray(filter.kinds.clone()),
            );
        }

        let order = order_by("cm", SORTABLE, options);
        fetch_page(pool, COLUMNS, "cast_members cm", &conditions, &order, options.page).await
    }

    /// Replace every writable column. Returns `None` if the row does not exist.
    pub async fn replace(
        pool: &PgPool,
        id: DbId,
        input: &CreateCastMember,
    ) -> Result<Option<CastMember>, sqlx::Error> {
        let update = UpdateCastMember {
            name: Some(input.name.clone()),
            kind: input.kind,
        };
        Self::update(pool, id, &update).await
    }

    /// Update a cast member. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCastMember,
    ) -> Result<Option<CastMember>, sqlx::Error> {
        let query = format!(
            "UPDATE cast_members AS cm SET
                name = COALESCE($2, cm.name),
                type = COALESCE($3, cm.type),
                updated_at = NOW()
             WHERE cm.id = $1 AND cm.deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CastMember>(&query)
            .bind(id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(input.kind)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a cast member by id. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE cast_members SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
