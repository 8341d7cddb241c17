//! Integration tests for soft-delete behaviour across the catalog tables.
//!
//! Soft-deleted rows must vanish from `find_by_id`, from lists, and from the
//! relations embedded in other entities.

use catalog_db::models::cast_member::CreateCastMember;
use catalog_db::models::category::{CreateCategory, UpdateCategory};
use catalog_db::models::genre::CreateGenre;
use catalog_db::models::video::CreateVideo;
use catalog_db::repositories::{
    CastMemberRepo, CategoryRepo, GenreRepo, ListOptions, RelatedTable, RelationRepo, VideoRepo,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_category(name: &str) -> CreateCategory {
    CreateCategory {
        name: name.to_string(),
        description: None,
        is_active: None,
    }
}

fn new_video(category: uuid::Uuid, genre: uuid::Uuid, member: uuid::Uuid) -> CreateVideo {
    CreateVideo {
        title: "Soft delete".to_string(),
        description: "Test video".to_string(),
        year_launched: Some(2001),
        opened: None,
        rating: "L".to_string(),
        duration: Some(90),
        categories_id: vec![category],
        genres_id: vec![genre],
        cast_members_id: vec![member],
    }
}

fn all_rows() -> ListOptions {
    ListOptions::default()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_soft_deleted_category_is_hidden(pool: PgPool) {
    let category = CategoryRepo::create(&pool, &new_category("Hidden")).await.unwrap();

    assert!(CategoryRepo::soft_delete(&pool, category.id).await.unwrap());
    assert!(CategoryRepo::find_by_id(&pool, category.id).await.unwrap().is_none());

    let page = CategoryRepo::list(&pool, &Default::default(), &all_rows())
        .await
        .unwrap();
    assert_eq!(page.total, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_soft_delete_is_idempotent(pool: PgPool) {
    let category = CategoryRepo::create(&pool, &new_category("Twice")).await.unwrap();

    assert!(CategoryRepo::soft_delete(&pool, category.id).await.unwrap());
    assert!(!CategoryRepo::soft_delete(&pool, category.id).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deleted_rows_fail_existence_checks(pool: PgPool) {
    let live = CategoryRepo::create(&pool, &new_category("Live")).await.unwrap();
    let gone = CategoryRepo::create(&pool, &new_category("Gone")).await.unwrap();
    CategoryRepo::soft_delete(&pool, gone.id).await.unwrap();

    let found = RelationRepo::existing_ids(&pool, RelatedTable::Categories, &[live.id, gone.id])
        .await
        .unwrap();
    assert_eq!(found, vec![live.id]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deleted_relations_are_not_embedded_in_videos(pool: PgPool) {
    let category = CategoryRepo::create(&pool, &new_category("Cat")).await.unwrap();
    let genre = GenreRepo::create(
        &pool,
        &CreateGenre {
            name: "Gen".to_string(),
            is_active: None,
            categories_id: vec![category.id],
        },
    )
    .await
    .unwrap();
    let member = CastMemberRepo::create(
        &pool,
        &CreateCastMember {
            name: "Member".to_string(),
            kind: Some(1),
        },
    )
    .await
    .unwrap();

    let video = VideoRepo::create(&pool, &new_video(category.id, genre.genre.id, member.id))
        .await
        .unwrap();
    assert_eq!(video.cast_members.len(), 1);
    assert!(!video.video.opened);

    CastMemberRepo::soft_delete(&pool, member.id).await.unwrap();

    let reloaded = VideoRepo::find_by_id(&pool, video.video.id)
        .await
        .unwrap()
        .unwrap();
    assert!(reloaded.cast_members.is_empty());
    assert_eq!(reloaded.genres.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deleted_category_rejects_updates_and_spares_others(pool: PgPool) {
    let gone = CategoryRepo::create(&pool, &new_category("Gone")).await.unwrap();
    let kept = CategoryRepo::create(&pool, &new_category("Kept")).await.unwrap();
    assert!(CategoryRepo::soft_delete(&pool, gone.id).await.unwrap());

    let rename = UpdateCategory {
        name: Some("Revived".to_string()),
        ..Default::default()
    };
    assert!(CategoryRepo::update(&pool, gone.id, &rename).await.unwrap().is_none());
    assert!(CategoryRepo::replace(&pool, gone.id, &new_category("Revived"))
        .await
        .unwrap()
        .is_none());
    assert!(!CategoryRepo::soft_delete(&pool, gone.id).await.unwrap());

    let still = CategoryRepo::find_by_id(&pool, kept.id).await.unwrap().unwrap();
    assert_eq!(still.name, "Kept");
    assert_eq!(still.updated_at, kept.updated_at);
    assert!(still.deleted_at.is_none());
}
