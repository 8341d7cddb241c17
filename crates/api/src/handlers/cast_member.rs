//! Handlers for the `/cast-members` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use catalog_core::error::CoreError;
use catalog_core::types::DbId;
use catalog_db::models::cast_member::{
    CastMember, CastMemberFilter, CreateCastMember, UpdateCastMember,
};
use catalog_db::repositories::CastMemberRepo;

use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::query::CastMemberListParams;
use crate::response::{DataResponse, ListResponse};
use crate::state::AppState;

/// GET /api/cast-members
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<CastMemberListParams>,
) -> AppResult<Json<ListResponse<CastMember>>> {
    let filter = CastMemberFilter {
        search: params.list.search(),
        kinds: params.kinds(),
    };
    let options = params.list.to_options(&state.config);
    let page = CastMemberRepo::list(&state.pool, &filter, &options).await?;
    Ok(Json(ListResponse::from_page(page, options.page)))
}

/// POST /api/cast-members
pub async fn create(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateCastMember>,
) -> AppResult<(StatusCode, Json<DataResponse<CastMember>>)> {
    let member = CastMemberRepo::create(&state.pool, &input).await?;
    tracing::info!(id = %member.id, kind = member.kind, "Cast member created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: member })))
}

/// GET /api/cast-members/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<CastMember>>> {
    let member = CastMemberRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: member }))
}

/// PUT /api/cast-members/{id}
pub async fn replace(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<CreateCastMember>,
) -> AppResult<Json<DataResponse<CastMember>>> {
    let member = CastMemberRepo::replace(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: member }))
}

/// PATCH /api/cast-members/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateCastMember>,
) -> AppResult<Json<DataResponse<CastMember>>> {
    let member = CastMemberRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: member }))
}

/// DELETE /api/cast-members/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if CastMemberRepo::soft_delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "CastMember",
        id,
    })
}
