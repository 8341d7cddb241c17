//! Pivot-table helpers: existence checks and link synchronization.

use catalog_core::types::DbId;
use sqlx::{PgConnection, PgPool};

/// Entity tables that can be referenced from a pivot table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelatedTable {
    Categories,
    Genres,
    CastMembers,
}

impl RelatedTable {
    fn table(self) -> &'static str {
        match self {
            RelatedTable::Categories => "categories",
            RelatedTable::Genres => "genres",
            RelatedTable::CastMembers => "cast_members",
        }
    }
}

/// A many-to-many pivot table described by its owner and target columns.
#[derive(Debug, Clone, Copy)]
pub struct LinkTable {
    pub table: &'static str,
    pub owner_column: &'static str,
    pub target_column: &'static str,
}

pub const GENRE_CATEGORIES: LinkTable = LinkTable {
    table: "category_genre",
    owner_column: "genre_id",
    target_column: "category_id",
};

pub const VIDEO_CATEGORIES: LinkTable = LinkTable {
    table: "category_video",
    owner_column: "video_id",
    target_column: "category_id",
};

pub const VIDEO_GENRES: LinkTable = LinkTable {
    table: "genre_video",
    owner_column: "video_id",
    target_column: "genre_id",
};

pub const VIDEO_CAST_MEMBERS: LinkTable = LinkTable {
    table: "cast_member_video",
    owner_column: "video_id",
    target_column: "cast_member_id",
};

/// Provides cross-entity queries used by relation validation.
pub struct RelationRepo;

impl RelationRepo {
    /// Return the subset of `ids` that exist in `table` and are not soft-deleted.
    pub async fn existing_ids(
        pool: &PgPool,
        table: RelatedTable,
        ids: &[DbId],
    ) -> Result<Vec<DbId>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "SELECT id FROM {} WHERE id = ANY($1) AND deleted_at IS NULL",
            table.table()
        );
        sqlx::query_scalar::<_, DbId>(&query)
            .bind(ids.to_vec())
            .fetch_all(pool)
            .await
    }

    /// Load `(genre_id, category_id)` links for the given genres.
    pub async fn genre_category_links(
        pool: &PgPool,
        genre_ids: &[DbId],
    ) -> Result<Vec<(DbId, DbId)>, sqlx::Error> {
        if genre_ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, (DbId, DbId)>(
            "SELECT genre_id, category_id FROM category_genre WHERE genre_id = ANY($1)",
        )
        .bind(genre_ids.to_vec())
        .fetch_all(pool)
        .await
    }
}

/// Replace every link owned by `owner_id` in `link` with `target_ids`.
///
/// Runs on the caller's connection so it can join an open transaction.
pub(crate) async fn sync_links(
    conn: &mut PgConnection,
    link: LinkTable,
    owner_id: DbId,
    target_ids: &[DbId],
) -> Result<(), sqlx::Error> {
    let LinkTable {
        table,
        owner_column,
        target_column,
    } = link;

    sqlx::query(&format!("DELETE FROM {table} WHERE {owner_column} = $1"))
        .bind(owner_id)
        .execute(&mut *conn)
        .await?;

    if target_ids.is_empty() {
        return Ok(());
    }

    sqlx::query(&format!(
        "INSERT INTO {table} ({owner_column}, {target_column})
         SELECT $1, UNNEST($2::uuid[])
         ON CONFLICT DO NOTHING"
    ))
    .bind(owner_id)
    .bind(target_ids.to_vec())
    .execute(&mut *conn)
    .await?;

    tracing::debug!(table, %owner_id, count = target_ids.len(), "Synchronized links");
    Ok(())
}
