//! Repository for the `genres` table and its `category_genre` links.

use std::collections::HashMap;

use catalog_core::types::{new_id, DbId};
use sqlx::PgPool;

use crate::models::category::Category;
use crate::models::genre::{CreateGenre, Genre, GenreFilter, GenreWithCategories, UpdateGenre};
use crate::repositories::category_repo;
use crate::repositories::listing::{
    fetch_page, group_by_owner, order_by, BindValue, Conditions, Linked, ListOptions, ListPage,
};
use crate::repositories::relation_repo::{sync_links, GENRE_CATEGORIES};

/// Column list shared across queries to avoid repetition.
pub(crate) const COLUMNS: &str =
    "g.id, g.name, g.is_active, g.created_at, g.updated_at, g.deleted_at";

/// Columns accepted by `?sort=`.
pub const SORTABLE: &[&str] = &["name", "is_active", "created_at"];

/// Provides CRUD operations for genres.
pub struct GenreRepo;

impl GenreRepo {
    /// Insert a genre and link it to `input.categories_id` in one transaction.
    pub async fn create(
        pool: &PgPool,
        input: &CreateGenre,
    ) -> Result<GenreWithCategories, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO genres AS g (id, name, is_active)
             VALUES ($1, $2, COALESCE($3, true))
             RETURNING {COLUMNS}"
        );
        let genre = sqlx::query_as::<_, Genre>(&query)
            .bind(new_id())
            .bind(input.name.trim())
            .bind(input.is_active)
            .fetch_one(&mut *tx)
            .await?;

        sync_links(&mut *tx, GENRE_CATEGORIES, genre.id, &input.categories_id).await?;
        tx.commit().await?;

        let categories = Self::categories_for(pool, genre.id).await?;
        Ok(GenreWithCategories { genre, categories })
    }

    /// Find a genre by id with its categories. Excludes soft-deleted rows.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<GenreWithCategories>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM genres g WHERE g.id = $1 AND g.deleted_at IS NULL");
        let Some(genre) = sqlx::query_as::<_, Genre>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?
        else {
            return Ok(None);
        };

        let categories = Self::categories_for(pool, genre.id).await?;
        Ok(Some(GenreWithCategories { genre, categories }))
    }

    /// List genres matching `filter`, each with its categories embedded.
    pub async fn list(
        pool: &PgPool,
        filter: &GenreFilter,
        options: &ListOptions,
    ) -> Result<ListPage<GenreWithCategories>, sqlx::Error> {
        let mut conditions = Conditions::new("g.deleted_at IS NULL");
        conditions.push_search("g.name", filter.search.as_deref());
        if let Some(is_active) = filter.is_active {
            conditions.push(
                |idx| format!("g.is_active = ${idx}"),
                BindValue::Bool(is_active),
            );
        }
        if !filter.categories.is_empty() {
            conditions.push(
                |idx| {
                    format!(
                        "EXISTS (SELECT 1 FROM category_genre fcg \
                         JOIN categories fc ON fc.id = fcg.category_id \
                         WHERE fcg.genre_id = g.id AND fc.deleted_at IS NULL \
                         AND (fc.id::text = ANY(${idx}) OR fc.name = ANY(${idx})))"
                    )
                },
                BindValue::TextArray(filter.categories.clone()),
            );
        }

        let order = order_by("g", SORTABLE, options);
        let page: ListPage<Genre> =
            fetch_page(pool, COLUMNS, "genres g", &conditions, &order, options.page).await?;

        let ids: Vec<DbId> = page.items.iter().map(|g| g.id).collect();
        let mut categories = Self::categories_by_genre(pool, &ids).await?;

        Ok(page.map_items(|genres| {
            genres
                .into_iter()
                .map(|genre| GenreWithCategories {
                    categories: categories.remove(&genre.id).unwrap_or_default(),
                    genre,
                })
                .collect()
        }))
    }

    /// Replace every writable column and all category links.
    ///
    /// Returns `None` if the row does not exist.
    pub async fn replace(
        pool: &PgPool,
        id: DbId,
        input: &CreateGenre,
    ) -> Result<Option<GenreWithCategories>, sqlx::Error> {
        let update = UpdateGenre {
            name: Some(input.name.clone()),
            is_active: Some(input.is_active.unwrap_or(true)),
            categories_id: Some(input.categories_id.clone()),
        };
        Self::update(pool, id, &update).await
    }

    /// Update a genre. Only non-`None` fields in `input` are applied; a
    /// present `categories_id` replaces all links.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateGenre,
    ) -> Result<Option<GenreWithCategories>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE genres AS g SET
                name = COALESCE($2, g.name),
                is_active = COALESCE($3, g.is_active),
                updated_at = NOW()
             WHERE g.id = $1 AND g.deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        let Some(genre) = sqlx::query_as::<_, Genre>(&query)
            .bind(id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(input.is_active)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        if let Some(ref categories_id) = input.categories_id {
            sync_links(&mut *tx, GENRE_CATEGORIES, genre.id, categories_id).await?;
        }
        tx.commit().await?;

        let categories = Self::categories_for(pool, genre.id).await?;
        Ok(Some(GenreWithCategories { genre, categories }))
    }

    /// Soft-delete a genre by id. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE genres SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn categories_for(pool: &PgPool, genre_id: DbId) -> Result<Vec<Category>, sqlx::Error> {
        let mut grouped = Self::categories_by_genre(pool, &[genre_id]).await?;
        Ok(grouped.remove(&genre_id).unwrap_or_default())
    }

    /// Load non-deleted categories for many genres at once, ordered by name.
    async fn categories_by_genre(
        pool: &PgPool,
        genre_ids: &[DbId],
    ) -> Result<HashMap<DbId, Vec<Category>>, sqlx::Error> {
        if genre_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let query = format!(
            "SELECT cg.genre_id AS owner_id, {} \
             FROM category_genre cg \
             JOIN categories c ON c.id = cg.category_id \
             WHERE cg.genre_id = ANY($1) AND c.deleted_at IS NULL \
             ORDER BY c.name",
            category_repo::COLUMNS
        );
        let rows = sqlx::query_as::<_, Linked<Category>>(&query)
            .bind(genre_ids.to_vec())
            .fetch_all(pool)
            .await?;
        Ok(group_by_owner(rows))
    }
}
