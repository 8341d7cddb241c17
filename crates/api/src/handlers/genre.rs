//! Handlers for the `/genres` resource.
//!
//! Writes validate `categories_id` against live categories before the genre
//! and its links are stored.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use catalog_core::error::CoreError;
use catalog_core::types::DbId;
use catalog_db::models::genre::{CreateGenre, GenreFilter, GenreWithCategories, UpdateGenre};
use catalog_db::repositories::{GenreRepo, RelatedTable};

use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::handlers::relations::RelationCheck;
use crate::query::GenreListParams;
use crate::response::{DataResponse, ListResponse};
use crate::state::AppState;

/// GET /api/genres
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<GenreListParams>,
) -> AppResult<Json<ListResponse<GenreWithCategories>>> {
    let filter = GenreFilter {
        search: params.list.search(),
        is_active: params.is_active(),
        categories: params.categories(),
    };
    let options = params.list.to_options(&state.config);
    let page = GenreRepo::list(&state.pool, &filter, &options).await?;
    Ok(Json(ListResponse::from_page(page, options.page)))
}

/// POST /api/genres
pub async fn create(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateGenre>,
) -> AppResult<(StatusCode, Json<DataResponse<GenreWithCategories>>)> {
    check_categories(&state, &input.categories_id).await?;
    let genre = GenreRepo::create(&state.pool, &input).await?;
    tracing::info!(id = %genre.genre.id, categories = genre.categories.len(), "Genre created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: genre })))
}

/// GET /api/genres/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<GenreWithCategories>>> {
    let genre = GenreRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: genre }))
}

/// PUT /api/genres/{id}
pub async fn replace(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<CreateGenre>,
) -> AppResult<Json<DataResponse<GenreWithCategories>>> {
    check_categories(&state, &input.categories_id).await?;
    let genre = GenreRepo::replace(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: genre }))
}

/// PATCH /api/genres/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateGenre>,
) -> AppResult<Json<DataResponse<GenreWithCategories>>> {
    if let Some(ref categories_id) = input.categories_id {
        check_categories(&state, categories_id).await?;
    }
    let genre = GenreRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: genre }))
}

/// DELETE /api/genres/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if GenreRepo::soft_delete(&state.pool, id).await? {
        tracing::info!(%id, "Genre deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

async fn check_categories(state: &AppState, categories_id: &[DbId]) -> AppResult<()> {
    let mut check = RelationCheck::new(&state.pool);
    check
        .exist("categories_id", RelatedTable::Categories, categories_id)
        .await?;
    check.finish()
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Genre", id })
}
