//! Form schemas for the create/edit pages.
//!
//! Each form validates locally with the same rules the API enforces, then
//! submits through a [`ResourceClient`]. Server-side 422s come back in the
//! same `field -> messages` shape so a page renders both identically.

use std::collections::BTreeMap;

use catalog_core::catalog::{CastMemberType, MAX_YEAR_LAUNCHED, MIN_YEAR_LAUNCHED};
use catalog_core::types::DbId;
use catalog_core::validation::{
    self, field_messages, validate_not_blank, validate_rating, MAX_NAME_LENGTH,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use validator::{Validate, ValidationErrors};

use crate::error::AdminError;
use crate::http::ResourceClient;
use crate::models::{CastMember, Category, Genre, Video};

/// Messages to render next to each field.
pub type FormErrors = BTreeMap<String, Vec<String>>;

/// Field errors carried by `err`, or `None` if it is not a validation failure.
pub fn form_errors(err: &AdminError) -> Option<&FormErrors> {
    match err {
        AdminError::Validation { errors } => Some(errors),
        _ => None,
    }
}

/// Validate `form`, then create it, or replace the entity `id` when editing.
pub async fn submit<F, T>(
    client: &ResourceClient<T>,
    id: Option<DbId>,
    form: &F,
) -> Result<T, AdminError>
where
    F: Validate + Serialize,
    T: DeserializeOwned,
{
    if let Err(errors) = form.validate() {
        return Err(AdminError::Validation {
            errors: field_messages(&errors),
        });
    }

    let saved = match id {
        Some(id) => client.update(id, form).await?,
        None => client.create(form).await?,
    };
    tracing::info!(url = client.collection_url(), editing = id.is_some(), "Saved form");
    Ok(saved)
}

#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
pub struct CategoryForm {
    #[validate(
        length(min = 1, max = 255, message = "The name must be between 1 and 255 characters."),
        custom(function = "validate_not_blank")
    )]
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
}

impl Default for CategoryForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: None,
            is_active: true,
        }
    }
}

impl From<&Category> for CategoryForm {
    fn from(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            description: category.description.clone(),
            is_active: category.is_active,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
pub struct GenreForm {
    #[validate(
        length(min = 1, max = 255, message = "The name must be between 1 and 255 characters."),
        custom(function = "validate_not_blank")
    )]
    pub name: String,
    pub is_active: bool,
    #[validate(length(min = 1, message = "At least one category must be selected."))]
    pub categories_id: Vec<DbId>,
}

impl Default for GenreForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            is_active: true,
            categories_id: Vec::new(),
        }
    }
}

impl From<&Genre> for GenreForm {
    fn from(genre: &Genre) -> Self {
        Self {
            name: genre.name.clone(),
            is_active: genre.is_active,
            categories_id: genre.categories.iter().map(|c| c.id).collect(),
        }
    }
}

/// `kind` serializes as `type`, so validation is written by hand to report
/// under the wire name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CastMemberForm {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: Option<i16>,
}

impl Validate for CastMemberForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name_len = self.name.chars().count() as u64;
        if !(1..=MAX_NAME_LENGTH).contains(&name_len) {
            errors.add(
                "name",
                validation::error("length", "The name must be between 1 and 255 characters."),
            );
        } else if let Err(err) = validate_not_blank(&self.name) {
            errors.add("name", err);
        }

        match self.kind {
            None => errors.add(
                "type",
                validation::error("required", "The type field is required."),
            ),
            Some(kind) if CastMemberType::try_from(kind).is_err() => errors.add(
                "type",
                validation::error("in", "The selected type is invalid."),
            ),
            Some(_) => {}
        }

        if errors.field_errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl From<&CastMember> for CastMemberForm {
    fn from(member: &CastMember) -> Self {
        Self {
            name: member.name.clone(),
            kind: Some(i16::from(member.kind)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Validate)]
pub struct VideoForm {
    #[validate(
        length(min = 1, max = 255, message = "The title must be between 1 and 255 characters."),
        custom(function = "validate_not_blank")
    )]
    pub title: String,
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
    #[validate(
        required(message = "The duration field is required."),
        range(min = 1, message = "The duration must be at least 1 minute.")
    )]
    pub duration: Option<i16>,
    #[validate(custom(function = "validate_rating"))]
    pub rating: String,
    pub opened: bool,
    #[validate(length(min = 1, message = "At least one category must be selected."))]
    pub categories_id: Vec<DbId>,
    #[validate(length(min = 1, message = "At least one genre must be selected."))]
    pub genres_id: Vec<DbId>,
    #[validate(length(min = 1, message = "At least one cast member must be selected."))]
    pub cast_members_id: Vec<DbId>,
}

impl From<&Video> for VideoForm {
    fn from(video: &Video) -> Self {
        Self {
            title: video.title.clone(),
            description: video.description.clone(),
            year_launched: Some(video.year_launched),
            duration: Some(video.duration),
            rating: video.rating.clone(),
            opened: video.opened,
            categories_id: video.categories.iter().map(|c| c.id).collect(),
            genres_id: video.genres.iter().map(|g| g.id).collect(),
            cast_members_id: video.cast_members.iter().map(|m| m.id).collect(),
        }
    }
}
