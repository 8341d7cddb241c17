//! Handlers for the `/videos` resource.
//!
//! Every write checks that the referenced categories, genres and cast
//! members exist, and that each genre belongs to a selected category.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use catalog_core::error::CoreError;
use catalog_core::types::DbId;
use catalog_db::models::video::{CreateVideo, UpdateVideo, VideoFilter, VideoWithRelations};
use catalog_db::repositories::{RelatedTable, VideoRepo};

use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::handlers::relations::RelationCheck;
use crate::query::VideoListParams;
use crate::response::{DataResponse, ListResponse};
use crate::state::AppState;

/// GET /api/videos
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<VideoListParams>,
) -> AppResult<Json<ListResponse<VideoWithRelations>>> {
    let filter = VideoFilter {
        search: params.list.search(),
        categories: params.categories(),
        genres: params.genres(),
        cast_members: params.cast_members(),
    };
    let options = params.list.to_options(&state.config);
    let page = VideoRepo::list(&state.pool, &filter, &options).await?;
    Ok(Json(ListResponse::from_page(page, options.page)))
}

/// POST /api/videos
pub async fn create(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateVideo>,
) -> AppResult<(StatusCode, Json<DataResponse<VideoWithRelations>>)> {
    check_relations(
        &state,
        Some(&input.categories_id),
        Some(&input.genres_id),
        Some(&input.cast_members_id),
        None,
    )
    .await?;
    let video = VideoRepo::create(&state.pool, &input).await?;
    tracing::info!(id = %video.video.id, "Video created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: video })))
}

/// GET /api/videos/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<VideoWithRelations>>> {
    let video = find_inner(&state, id).await?;
    Ok(Json(DataResponse { data: video }))
}

/// PUT /api/videos/{id}
pub async fn replace(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<CreateVideo>,
) -> AppResult<Json<DataResponse<VideoWithRelations>>> {
    check_relations(
        &state,
        Some(&input.categories_id),
        Some(&input.genres_id),
        Some(&input.cast_members_id),
        None,
    )
    .await?;
    let video = VideoRepo::replace(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: video }))
}

/// PATCH /api/videos/{id}
///
/// When only one of `categories_id` / `genres_id` is sent, the genre rule is
/// checked against the video's current links for the other.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateVideo>,
) -> AppResult<Json<DataResponse<VideoWithRelations>>> {
    let current = find_inner(&state, id).await?;
    check_relations(
        &state,
        input.categories_id.as_deref(),
        input.genres_id.as_deref(),
        input.cast_members_id.as_deref(),
        Some(&current),
    )
    .await?;
    let video = VideoRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: video }))
}

/// DELETE /api/videos/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if VideoRepo::soft_delete(&state.pool, id).await? {
        tracing::info!(%id, "Video deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

async fn find_inner(state: &AppState, id: DbId) -> AppResult<VideoWithRelations> {
    VideoRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))
}

/// Validate the relation lists present in a write.
///
/// `current` supplies the stored links for lists a partial update omits.
async fn check_relations(
    state: &AppState,
    categories_id: Option<&[DbId]>,
    genres_id: Option<&[DbId]>,
    cast_members_id: Option<&[DbId]>,
    current: Option<&VideoWithRelations>,
) -> AppResult<()> {
    let mut check = RelationCheck::new(&state.pool);

    let categories_ok = match categories_id {
        Some(ids) => {
            check
                .exist("categories_id", RelatedTable::Categories, ids)
                .await?
        }
        None => true,
    };
    let genres_ok = match genres_id {
        Some(ids) => check.exist("genres_id", RelatedTable::Genres, ids).await?,
        None => true,
    };
    if let Some(ids) = cast_members_id {
        check
            .exist("cast_members_id", RelatedTable::CastMembers, ids)
            .await?;
    }

    if categories_ok && genres_ok && (categories_id.is_some() || genres_id.is_some()) {
        let stored_categories: Vec<DbId>;
        let categories: &[DbId] = match (categories_id, current) {
            (Some(ids), _) => ids,
            (None, Some(video)) => {
                stored_categories = video.categories.iter().map(|c| c.id).collect();
                &stored_categories
            }
            (None, None) => &[],
        };
        let stored_genres: Vec<DbId>;
        let genres: &[DbId] = match (genres_id, current) {
            (Some(ids), _) => ids,
            (None, Some(video)) => {
                stored_genres = video.genres.iter().map(|g| g.id).collect();
                &stored_genres
            }
            (None, None) => &[],
        };
        check.genres_have_categories(genres, categories).await?;
    }

    check.finish()
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Video", id })
}
