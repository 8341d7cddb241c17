//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` + `Validate` create DTO, also used for full `PUT` updates
//! - A `Deserialize` + `Validate` update DTO (all `Option` fields) for `PATCH`
//! - A filter struct for the list endpoint

pub mod cast_member;
pub mod category;
pub mod genre;
pub mod video;
