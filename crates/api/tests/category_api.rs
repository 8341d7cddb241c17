//! HTTP-level integration tests for `/api/categories`.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete, get, patch_json, post_json, put_json, seed_category};
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_category_returns_201_with_defaults(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/categories",
        serde_json::json!({ "name": "Drama" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Drama");
    assert_eq!(json["data"]["is_active"], true);
    assert!(json["data"]["description"].is_null());
    assert!(json["data"]["id"].is_string());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_category_without_name_returns_422(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/categories", serde_json::json!({})).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["errors"]["name"].is_array());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_get_category_by_id(pool: PgPool) {
    let id = seed_category(&pool, "Comedy").await;

    let app = common::build_test_app(pool);
    let response = get(app, &format!("/api/categories/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Comedy");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_get_unknown_category_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(
        app,
        &format!("/api/categories/{}", uuid::Uuid::now_v7()),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_put_replaces_and_patch_updates_partially(pool: PgPool) {
    let id = seed_category(&pool, "Documentaries").await;

    let app = common::build_test_app(pool.clone());
    let response = patch_json(
        app,
        &format!("/api/categories/{id}"),
        serde_json::json!({ "description": "Kept name", "is_active": false }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Documentaries");
    assert_eq!(json["data"]["is_active"], false);

    let app = common::build_test_app(pool);
    let response = put_json(
        app,
        &format!("/api/categories/{id}"),
        serde_json::json!({ "name": "Replaced" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Replaced");
    assert!(json["data"]["description"].is_null());
    assert_eq!(json["data"]["is_active"], true);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_category_returns_204_then_404(pool: PgPool) {
    let id = seed_category(&pool, "Temporary").await;

    let app = common::build_test_app(pool.clone());
    let response = delete(app, &format!("/api/categories/{id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool.clone());
    let response = get(app, &format!("/api/categories/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let app = common::build_test_app(pool);
    let response = delete(app, &format!("/api/categories/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_paginates_with_meta(pool: PgPool) {
    for i in 0..12 {
        seed_category(&pool, &format!("Category {i:02}")).await;
    }

    let app = common::build_test_app(pool);
    let response = get(app, "/api/categories?per_page=5&page=3&sort=name&dir=asc").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;

    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["name"], "Category 10");
    assert_eq!(json["meta"]["total"], 12);
    assert_eq!(json["meta"]["current_page"], 3);
    assert_eq!(json["meta"]["last_page"], 3);
    assert_eq!(json["meta"]["from"], 11);
    assert_eq!(json["meta"]["to"], 12);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_filters_by_search_and_is_active(pool: PgPool) {
    seed_category(&pool, "Action").await;
    let inactive = seed_category(&pool, "Action Classics").await;
    seed_category(&pool, "Romance").await;

    let app = common::build_test_app(pool.clone());
    patch_json(
        app,
        &format!("/api/categories/{inactive}"),
        serde_json::json!({ "is_active": false }),
    )
    .await;

    let app = common::build_test_app(pool.clone());
    let json = body_json(get(app, "/api/categories?search=action").await).await;
    assert_eq!(json["meta"]["total"], 2);

    let app = common::build_test_app(pool);
    let json = body_json(get(app, "/api/categories?search=action&is_active=true").await).await;
    assert_eq!(json["meta"]["total"], 1);
    assert_eq!(json["data"][0]["name"], "Action");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_sort_falls_back_to_newest_first(pool: PgPool) {
    seed_category(&pool, "First").await;
    seed_category(&pool, "Second").await;

    let app = common::build_test_app(pool);
    let json = body_json(get(app, "/api/categories?sort=password&page=abc").await).await;
    assert_eq!(json["data"][0]["name"], "Second");
    assert_eq!(json["meta"]["current_page"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_all_returns_every_row(pool: PgPool) {
    for i in 0..20 {
        seed_category(&pool, &format!("C{i}")).await;
    }

    let app = common::build_test_app(pool);
    let json = body_json(get(app, "/api/categories?all").await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 20);
    assert_eq!(json["meta"]["last_page"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_page_past_the_end_returns_empty_data(pool: PgPool) {
    seed_category(&pool, "Drama").await;

    let app = common::build_test_app(pool);
    let response = get(app, "/api/categories?page=9223372036854775807").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 0);
    assert_eq!(json["meta"]["total"], 1);
    assert_eq!(json["meta"]["last_page"], 1);
    assert!(json["meta"]["from"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_and_delete_only_touch_the_target(pool: PgPool) {
    let target = seed_category(&pool, "Target").await;
    let bystander = seed_category(&pool, "Bystander").await;

    let app = common::build_test_app(pool.clone());
    let response = patch_json(
        app,
        &format!("/api/categories/{target}"),
        serde_json::json!({ "name": "Renamed", "is_active": false }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = common::build_test_app(pool.clone());
    let json = body_json(get(app, &format!("/api/categories/{bystander}")).await).await;
    assert_eq!(json["data"]["name"], "Bystander");
    assert_eq!(json["data"]["is_active"], true);

    let app = common::build_test_app(pool.clone());
    let response = delete(app, &format!("/api/categories/{target}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    let json = body_json(get(app, "/api/categories").await).await;
    assert_eq!(json["meta"]["total"], 1);
    assert_eq!(json["data"][0]["id"], bystander.as_str());
    assert_eq!(json["data"][0]["name"], "Bystander");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deleted_category_cannot_be_updated(pool: PgPool) {
    let id = seed_category(&pool, "Gone").await;

    let app = common::build_test_app(pool.clone());
    assert_eq!(
        delete(app, &format!("/api/categories/{id}")).await.status(),
        StatusCode::NO_CONTENT
    );

    let app = common::build_test_app(pool.clone());
    let response = patch_json(
        app,
        &format!("/api/categories/{id}"),
        serde_json::json!({ "name": "Back" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let app = common::build_test_app(pool.clone());
    let response = put_json(
        app,
        &format!("/api/categories/{id}"),
        serde_json::json!({ "name": "Back" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let app = common::build_test_app(pool);
    let response = delete(app, &format!("/api/categories/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_patch_null_description_clears_it(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let created = body_json(
        post_json(
            app,
            "/api/categories",
            serde_json::json!({ "name": "Kids", "description": "Family films" }),
        )
        .await,
    )
    .await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let app = common::build_test_app(pool.clone());
    let json = body_json(
        patch_json(
            app,
            &format!("/api/categories/{id}"),
            serde_json::json!({ "is_active": false }),
        )
        .await,
    )
    .await;
    assert_eq!(json["data"]["description"], "Family films");

    let app = common::build_test_app(pool);
    let json = body_json(
        patch_json(
            app,
            &format!("/api/categories/{id}"),
            serde_json::json!({ "description": null }),
        )
        .await,
    )
    .await;
    assert!(json["data"]["description"].is_null());
    assert_eq!(json["data"]["name"], "Kids");
}
