//! Repository for the `videos` table and its three pivot tables.

use std::collections::HashMap;

use catalog_core::types::{new_id, DbId};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool};

use crate::models::cast_member::CastMember;
use crate::models::category::Category;
use crate::models::genre::Genre;
use crate::models::video::{CreateVideo, UpdateVideo, Video, VideoFilter, VideoWithRelations};
use crate::repositories::listing::{
    fetch_page, group_by_owner, order_by, BindValue, Conditions, Linked, ListOptions, ListPage,
};
use crate::repositories::relation_repo::{
    sync_links, LinkTable, VIDEO_CAST_MEMBERS, VIDEO_CATEGORIES, VIDEO_GENRES,
};
use crate::repositories::{cast_member_repo, category_repo, genre_repo};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "v.id, v.title, v.description, v.year_launched, v.opened, v.rating, \
    v.duration, v.created_at, v.updated_at, v.deleted_at";

/// Columns accepted by `?sort=`.
pub const SORTABLE: &[&str] = &["title", "year_launched", "duration", "rating", "created_at"];

/// Relations of many videos, keyed by video id.
#[derive(Default)]
struct Relations {
    categories: HashMap<DbId, Vec<Category>>,
    genres: HashMap<DbId, Vec<Genre>>,
    cast_members: HashMap<DbId, Vec<CastMember>>,
}

impl Relations {
    fn attach(&mut self, video: Video) -> VideoWithRelations {
        VideoWithRelations {
            categories: self.categories.remove(&video.id).unwrap_or_default(),
            genres: self.genres.remove(&video.id).unwrap_or_default(),
            cast_members: self.cast_members.remove(&video.id).unwrap_or_default(),
            video,
        }
    }
}

/// Provides CRUD operations for videos.
pub struct VideoRepo;

impl VideoRepo {
    /// Insert a video and all of its links in one transaction.
    ///
    /// Numeric fields must already be validated as present.
    pub async fn create(
        pool: &PgPool,
        input: &CreateVideo,
    ) -> Result<VideoWithRelations, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO videos AS v
                (id, title, description, year_launched, opened, rating, duration)
             VALUES ($1, $2, $3, $4, COALESCE($5, false), $6, $7)
             RETURNING {COLUMNS}"
        );
        let video = sqlx::query_as::<_, Video>(&query)
            .bind(new_id())
            .bind(input.title.trim())
            .bind(&input.description)
            .bind(input.year_launched)
            .bind(input.opened)
            .bind(&input.rating)
            .bind(input.duration)
            .fetch_one(&mut *tx)
            .await?;

        sync_links(&mut *tx, VIDEO_CATEGORIES, video.id, &input.categories_id).await?;
        sync_links(&mut *tx, VIDEO_GENRES, video.id, &input.genres_id).await?;
        sync_links(&mut *tx, VIDEO_CAST_MEMBERS, video.id, &input.cast_members_id).await?;
        tx.commit().await?;

        let mut relations = Self::load_relations(pool, &[video.id]).await?;
        Ok(relations.attach(video))
    }

    /// Find a video by id with every relation. Excludes soft-deleted rows.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<VideoWithRelations>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM videos v WHERE v.id = $1 AND v.deleted_at IS NULL");
        let Some(video) = sqlx::query_as::<_, Video>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?
        else {
            return Ok(None);
        };

        let mut relations = Self::load_relations(pool, &[video.id]).await?;
        Ok(Some(relations.attach(video)))
    }

    /// List videos matching `filter`, each with its relations embedded.
    pub async fn list(
        pool: &PgPool,
        filter: &VideoFilter,
        options: &ListOptions,
    ) -> Result<ListPage<VideoWithRelations>, sqlx::Error> {
        let mut conditions = Conditions::new("v.deleted_at IS NULL");
        conditions.push_search("v.title", filter.search.as_deref());
        push_link_filter(&mut conditions, VIDEO_CATEGORIES, &filter.categories);
        push_link_filter(&mut conditions, VIDEO_GENRES, &filter.genres);
        push_link_filter(&mut conditions, VIDEO_CAST_MEMBERS, &filter.cast_members);

        let order = order_by("v", SORTABLE, options);
        let page: ListPage<Video> =
            fetch_page(pool, COLUMNS, "videos v", &conditions, &order, options.page).await?;

        let ids: Vec<DbId> = page.items.iter().map(|v| v.id).collect();
        let mut relations = Self::load_relations(pool, &ids).await?;

        Ok(page.map_items(|videos| {
            videos
                .into_iter()
                .map(|video| relations.attach(video))
                .collect()
        }))
    }

    /// Replace every writable column and all links.
    ///
    /// Returns `None` if the row does not exist.
    pub async fn replace(
        pool: &PgPool,
        id: DbId,
        input: &CreateVideo,
    ) -> Result<Option<VideoWithRelations>, sqlx::Error> {
        let update = UpdateVideo {
            title: Some(input.title.clone()),
            description: Some(input.description.clone()),
            year_launched: input.year_launched,
            opened: Some(input.opened.unwrap_or(false)),
            rating: Some(input.rating.clone()),
            duration: input.duration,
            categories_id: Some(input.categories_id.clone()),
            genres_id: Some(input.genres_id.clone()),
            cast_members_id: Some(input.cast_members_id.clone()),
        };
        Self::update(pool, id, &update).await
    }

    /// Update a video. Only non-`None` fields in `input` are applied; each
    /// present relation list replaces that relation's links.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateVideo,
    ) -> Result<Option<VideoWithRelations>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE videos AS v SET
                title = COALESCE($2, v.title),
                description = COALESCE($3, v.description),
                year_launched = COALESCE($4, v.year_launched),
                opened = COALESCE($5, v.opened),
                rating = COALESCE($6, v.rating),
                duration = COALESCE($7, v.duration),
                updated_at = NOW()
             WHERE v.id = $1 AND v.deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        let Some(video) = sqlx::query_as::<_, Video>(&query)
            .bind(id)
            .bind(input.title.as_deref().map(str::trim))
            .bind(&input.description)
            .bind(input.year_launched)
            .bind(input.opened)
            .bind(&input.rating)
            .bind(input.duration)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        if let Some(ref ids) = input.categories_id {
            sync_links(&mut *tx, VIDEO_CATEGORIES, video.id, ids).await?;
        }
        if let Some(ref ids) = input.genres_id {
            sync_links(&mut *tx, VIDEO_GENRES, video.id, ids).await?;
        }
        if let Some(ref ids) = input.cast_members_id {
            sync_links(&mut *tx, VIDEO_CAST_MEMBERS, video.id, ids).await?;
        }
        tx.commit().await?;

        let mut relations = Self::load_relations(pool, &[video.id]).await?;
        Ok(Some(relations.attach(video)))
    }

    /// Soft-delete a video by id. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE videos SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn load_relations(pool: &PgPool, video_ids: &[DbId]) -> Result<Relations, sqlx::Error> {
        if video_ids.is_empty() {
            return Ok(Relations::default());
        }
        Ok(Relations {
            categories: load_linked(
                pool,
                VIDEO_CATEGORIES,
                "categories c",
                "c",
                category_repo::COLUMNS,
                "c.name",
                video_ids,
            )
            .await?,
            genres: load_linked(
                pool,
                VIDEO_GENRES,
                "genres g",
                "g",
                genre_repo::COLUMNS,
                "g.name",
                video_ids,
            )
            .await?,
            cast_members: load_linked(
                pool,
                VIDEO_CAST_MEMBERS,
                "cast_members cm",
                "cm",
                cast_member_repo::COLUMNS,
                "cm.name",
                video_ids,
            )
            .await?,
        })
    }
}

/// Require at least one link from the video into `ids`.
fn push_link_filter(conditions: &mut Conditions, link: LinkTable, ids: &[DbId]) {
    if ids.is_empty() {
        return;
    }
    let LinkTable {
        table,
        owner_column,
        target_column,
    } = link;
    conditions.push(
        |idx| {
            format!(
                "EXISTS (SELECT 1 FROM {table} lf \
                 WHERE lf.{owner_column} = v.id AND lf.{target_column} = ANY(${idx}))"
            )
        },
        BindValue::UuidArray(ids.to_vec()),
    );
}

/// Load non-deleted targets of `link` for the given videos, grouped by video.
async fn load_linked<T>(
    pool: &PgPool,
    link: LinkTable,
    target: &str,
    alias: &str,
    columns: &str,
    order: &str,
    video_ids: &[DbId],
) -> Result<HashMap<DbId, Vec<T>>, sqlx::Error>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let LinkTable {
        table,
        owner_column,
        target_column,
    } = link;
    let query = format!(
        "SELECT l.{owner_column} AS owner_id, {columns} \
         FROM {table} l \
         JOIN {target} ON {alias}.id = l.{target_column} \
         WHERE l.{owner_column} = ANY($1) AND {alias}.deleted_at IS NULL \
         ORDER BY {order}"
    );
    let rows = sqlx::query_as::<_, Linked<T>>(&query)
        .bind(video_ids.to_vec())
        .fetch_all(pool)
        .await?;
    Ok(group_by_owner(rows))
}
