//! Cast member entity model and DTOs.

use catalog_core::catalog::CastMemberType;
use catalog_core::types::{DbId, Timestamp};
use catalog_core::validation::{self, validate_not_blank, MAX_NAME_LENGTH};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationErrors};

/// A row from the `cast_members` table.
///
/// `kind` is the `type` column (1 = director, 2 = actor), see
/// [`catalog_core::catalog::CastMemberType`].
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CastMember {
    pub id: DbId,
    pub name: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: i16,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// DTO for creating (or fully replacing) a cast member.
///
/// `Validate` is implemented by hand so failures on `kind` are reported under
/// the wire name `type`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCastMember {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: Option<i16>,
}

impl Validate for CreateCastMember {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_name(&mut errors, &self.name);
        match self.kind {
            None => errors.add("type", validation::error("required", "The type field is required.")),
            Some(kind) => check_kind(&mut errors, kind),
        }
        into_result(errors)
    }
}

/// DTO for a partial update. Only provided fields are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCastMember {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<i16>,
}

impl Validate for UpdateCastMember {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(ref name) = self.name {
            check_name(&mut errors, name);
        }
        if let Some(kind) = self.kind {
            check_kind(&mut errors, kind);
        }
        into_result(errors)
    }
}

fn check_name(errors: &mut ValidationErrors, name: &str) {
    let length = name.chars().count() as u64;
    if length == 0 || length > MAX_NAME_LENGTH {
        errors.add(
            "name",
            validation::error("length", "The name must be between 1 and 255 characters."),
        );
    } else if let Err(error) = validate_not_blank(name) {
        errors.add("name", error);
    }
}

fn check_kind(errors: &mut ValidationErrors, kind: i16) {
    if CastMemberType::try_from(kind).is_err() {
        errors.add("type", validation::error("in", "The selected type is invalid."));
    }
}

fn into_result(errors: ValidationErrors) -> Result<(), ValidationErrors> {
    if errors.field_errors().is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// List filters for `GET /cast-members`.
#[derive(Debug, Clone, Default)]
pub struct CastMemberFilter {
    pub search: Option<String>,
    /// Restrict to these `type` values; empty means no restriction.
    pub kinds: Vec<i16>,
}
