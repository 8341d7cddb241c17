//! Category entity model and DTOs.

use catalog_core::types::{DbId, Timestamp};
use catalog_core::validation::validate_not_blank;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `categories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Category {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// DTO for creating (or fully replacing) a category.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCategory {
    #[serde(default)]
    #[validate(
        length(min = 1, max = 255, message = "The name must be between 1 and 255 characters."),
        custom(function = "validate_not_blank")
    )]
    pub name: String,
    pub description: Option<String>,
    /// Defaults to `true` if omitted.
    pub is_active: Option<bool>,
}

/// DTO for a partial update. Only provided fields are applied.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateCategory {
    #[validate(
        length(min = 1, max = 255, message = "The name must be between 1 and 255 characters."),
        custom(function = "validate_not_blank")
    )]
    pub name: Option<String>,
    /// `None` keeps the stored value; `Some(None)` (an explicit `null`)
    /// clears it.
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    pub is_active: Option<bool>,
}

/// Mark a field that was sent, even as `null`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// List filters for `GET /categories`.
#[derive(Debug, Clone, Default)]
pub struct CategoryFilter {
    pub search: Option<String>,
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_distinguishes_null_from_absent_description() {
        let absent: UpdateCategory = serde_json::from_str(r#"{"name":"Drama"}"#).unwrap();
        assert_eq!(absent.description, None);

        let cleared: UpdateCategory = serde_json::from_str(r#"{"description":null}"#).unwrap();
        assert_eq!(cleared.description, Some(None));

        let set: UpdateCategory = serde_json::from_str(r#"{"description":"Films"}"#).unwrap();
        assert_eq!(set.description, Some(Some("Films".to_string())));
    }
}
