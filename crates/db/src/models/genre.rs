//! Genre entity model and DTOs.

use catalog_core::types::{DbId, Timestamp};
use catalog_core::validation::validate_not_blank;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::category::Category;

/// A row from the `genres` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Genre {
    pub id: DbId,
    pub name: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// A genre with its linked (non-deleted) categories embedded.
#[derive(Debug, Clone, Serialize)]
pub struct GenreWithCategories {
    #[serde(flatten)]
    pub genre: Genre,
    pub categories: Vec<Category>,
}

/// DTO for creating (or fully replacing) a genre.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateGenre {
    #[serde(default)]
    #[validate(
        length(min = 1, max = 255, message = "The name must be between 1 and 255 characters."),
        custom(function = "validate_not_blank")
    )]
    pub name: String,
    /// Defaults to `true` if omitted.
    pub is_active: Option<bool>,
    #[serde(default)]
    #[validate(length(min = 1, message = "At least one category must be selected."))]
    pub categories_id: Vec<DbId>,
}

/// DTO for a partial update. `categories_id`, when present, replaces all links.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateGenre {
    #[validate(
        length(min = 1, max = 255, message = "The name must be between 1 and 255 characters."),
        custom(function = "validate_not_blank")
    )]
    pub name: Option<String>,
    pub is_active: Option<bool>,
    #[validate(length(min = 1, message = "At least one category must be selected."))]
    pub categories_id: Option<Vec<DbId>>,
}

/// List filters for `GET /genres`.
#[derive(Debug, Clone, Default)]
pub struct GenreFilter {
    pub search: Option<String>,
    pub is_active: Option<bool>,
    /// Category ids or names; a genre matches if linked to any of them.
    pub categories: Vec<String>,
}
