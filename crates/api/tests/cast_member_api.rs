//! HTTP-level integration tests for `/api/cast-members`.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, patch_json, post_json, seed_cast_member};
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_cast_member_returns_201(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/cast-members",
        serde_json::json!({ "name": "Greta Gerwig", "type": 1 }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Greta Gerwig");
    assert_eq!(json["data"]["type"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_invalid_type_is_reported_under_type(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/cast-members",
        serde_json::json!({ "name": "Nobody", "type": 7 }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["errors"]["type"][0], "The selected type is invalid.");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_filters_by_type(pool: PgPool) {
    seed_cast_member(&pool, "Director One", 1).await;
    seed_cast_member(&pool, "Actor One", 2).await;
    seed_cast_member(&pool, "Actor Two", 2).await;

    let app = common::build_test_app(pool.clone());
    let json = body_json(get(app, "/api/cast-members?type=2&sort=name").await).await;
    assert_eq!(json["meta"]["total"], 2);
    assert_eq!(json["data"][0]["name"], "Actor One");

    let app = common::build_test_app(pool);
    let json = body_json(get(app, "/api/cast-members?type=1,2").await).await;
    assert_eq!(json["meta"]["total"], 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_patch_changes_only_type(pool: PgPool) {
    let id = seed_cast_member(&pool, "Switcher", 2).await;

    let app = common::build_test_app(pool);
    let response = patch_json(
        app,
        &format!("/api/cast-members/{id}"),
        serde_json::json!({ "type": 1 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Switcher");
    assert_eq!(json["data"]["type"], 1);
}
