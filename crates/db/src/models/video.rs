//! Video entity model and DTOs.

use catalog_core::catalog::{MAX_YEAR_LAUNCHED, MIN_YEAR_LAUNCHED};
use catalog_core::types::{DbId, Timestamp};
use catalog_core::validation::{validate_not_blank, validate_rating};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::cast_member::CastMember;
use crate::models::category::Category;
use crate::models::genre::Genre;

/// A row from the `videos` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Video {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub year_launched: i16,
    pub opened: bool,
    pub rating: String,
    /// Running time in minutes.
    pub duration: i16,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// A video with every relation embedded.
#[derive(Debug, Clone, Serialize)]
pub struct VideoWithRelations {
    #[serde(flatten)]
    pub video: Video,
    pub categories: Vec<Category>,
    pub genres: Vec<Genre>,
    pub cast_members: Vec<CastMember>,
}

/// DTO for creating (or fully replacing) a video.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateVideo {
    #[serde(default)]
    #[validate(
        length(min = 1, max = 255, message = "The title must be between 1 and 255 characters."),
        custom(function = "validate_not_blank")
    )]
    pub title: String,
    #[serde(default)]
    #[validate(custom(function = "validate_not_blank"))]
    pub description: String,
    #[validate(
        required(message = "The year_launched field is required."),
        range(
            min = MIN_YEAR_LAUNCHED,
            max = MAX_YEAR_LAUNCHED,
            message = "The year_launched must be a four-digit year."
        )
    )]
    pub year_launched: Option<i16>,
    /// Defaults to `false` if omitted.
    pub opened: Option<bool>,
    #[serde(default)]
    #[validate(custom(function = "validate_rating"))]
    pub rating: String,
    #[validate(
        required(message = "The duration field is required."),
        range(min = 1, message = "The duration must be at least 1 minute.")
    )]
    pub duration: Option<i16>,
    #[serde(default)]
    #[validate(length(min = 1, message = "At least one category must be selected."))]
    pub categories_id: Vec<DbId>,
    #[serde(default)]
    #[validate(length(min = 1, message = "At least one genre must be selected."))]
    pub genres_id: Vec<DbId>,
    #[serde(default)]
    #[validate(length(min = 1, message = "At least one cast member must be selected."))]
    pub cast_members_id: Vec<DbId>,
}

/// DTO for a partial update. Relation lists, when present, replace all links.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateVideo {
    #[validate(
        length(min = 1, max = 255, message = "The title must be between 1 and 255 characters."),
        custom(function = "validate_not_blank")
    )]
    pub title: Option<String>,
    #[validate(custom(function = "validate_not_blank"))]
    pub description: Option<String>,
    #[validate(range(
        min = MIN_YEAR_LAUNCHED,
        max = MAX_YEAR_LAUNCHED,
        message = "The year_launched must be a four-digit year."
    ))]
    pub year_launched: Option<i16>,
    pub opened: Option<bool>,
    #[validate(custom(function = "validate_rating"))]
    pub rating: Option<String>,
    #[validate(range(min = 1, message = "The duration must be at least 1 minute."))]
    pub duration: Option<i16>,
    #[validate(length(min = 1, message = "At least one category must be selected."))]
    pub categories_id: Option<Vec<DbId>>,
    #[validate(length(min = 1, message = "At least one genre must be selected."))]
    pub genres_id: Option<Vec<DbId>>,
    #[validate(length(min = 1, message = "At least one cast member must be selected."))]
    pub cast_members_id: Option<Vec<DbId>>,
}

/// List filters for `GET /videos`. Empty id lists mean no restriction.
#[derive(Debug, Clone, Default)]
pub struct VideoFilter {
    pub search: Option<String>,
    pub categories: Vec<DbId>,
    pub genres: Vec<DbId>,
    pub cast_members: Vec<DbId>,
}
