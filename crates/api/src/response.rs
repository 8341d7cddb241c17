//! Shared response envelope types for API handlers.
//!
//! Single entities use a `{ "data": ... }` envelope; lists add pagination
//! metadata under `meta`.

use catalog_core::listing::{ListMeta, PageRequest};
use catalog_db::repositories::ListPage;
use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// # Example
///
/// ```ignore
/// Ok(Json(DataResponse { data: category }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// `{ "data": [...], "meta": {...} }` envelope for list endpoints.
#[derive(Debug, Serialize)]
pub struct ListResponse<T: Serialize> {
    pub data: Vec<T>,
    pub meta: ListMeta,
}

impl<T: Serialize> ListResponse<T> {
    /// Build the envelope from a repository page.
    ///
    /// `page` is `None` when the caller asked for every row (`?all`).
    pub fn from_page(page: ListPage<T>, request: Option<PageRequest>) -> Self {
        let request = request.unwrap_or_else(|| PageRequest::everything(page.total));
        let meta = ListMeta::new(&request, page.total, page.items.len());
        Self {
            data: page.items,
            meta,
        }
    }
}
