//! Request handlers for the catalog resources.
//!
//! Each submodule provides async handler functions (list, create, get_by_id,
//! replace, update, delete) for a single entity type. Handlers delegate to the
//! corresponding repository in `catalog_db` and map errors via [`AppError`].
//!
//! [`AppError`]: crate::error::AppError

pub mod cast_member;
pub mod category;
pub mod genre;
pub mod relations;
pub mod video;
