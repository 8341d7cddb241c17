//! Route definitions for `/cast-members`.

use axum::routing::get;
use axum::Router;

use crate::handlers::cast_member;
use crate::state::AppState;

/// Routes mounted at `/cast-members`.
///
/// ```text
/// GET    /          -> list
/// POST   /          -> create
/// GET    /{id}      -> get_by_id
/// PUT    /{id}      -> replace
/// PATCH  /{id}      -> update
/// DELETE /{id}      -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(cast_member::list).post(cast_member::create))
        .route(
            "/{id}",
            get(cast_member::get_by_id)
                .put(cast_member::replace)
                .patch(cast_member::update)
                .delete(cast_member::delete),
        )
}
