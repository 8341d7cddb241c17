//! Cross-entity checks run before relation ids are written.
//!
//! Failures are collected per field so a single 422 reports every problem.

use catalog_core::catalog::{distinct_ids, genres_missing_categories};
use catalog_core::types::DbId;
use catalog_core::validation;
use catalog_db::repositories::{RelatedTable, RelationRepo};
use catalog_db::DbPool;
use validator::{ValidationError, ValidationErrors};

use crate::error::{AppError, AppResult};

/// Accumulates relation failures keyed by request field.
pub struct RelationCheck<'a> {
    pool: &'a DbPool,
    failures: Vec<(&'static str, ValidationError)>,
}

impl<'a> RelationCheck<'a> {
    pub fn new(pool: &'a DbPool) -> Self {
        Self {
            pool,
            failures: Vec::new(),
        }
    }

    /// Every id in `ids` must name a live row in `table`.
    ///
    /// Returns `true` when the ids passed.
    pub async fn exist(
        &mut self,
        field: &'static str,
        table: RelatedTable,
        ids: &[DbId],
    ) -> AppResult<bool> {
        let wanted = distinct_ids(ids);
        let found = RelationRepo::existing_ids(self.pool, table, &wanted).await?;
        if found.len() == wanted.len() {
            return Ok(true);
        }
        self.failures.push((
            field,
            validation::error("exists", format!("The selected {field} is invalid.")),
        ));
        Ok(false)
    }

    /// Each genre must be linked to at least one of the selected categories.
    pub async fn genres_have_categories(
        &mut self,
        genre_ids: &[DbId],
        category_ids: &[DbId],
    ) -> AppResult<()> {
        let links = RelationRepo::genre_category_links(self.pool, genre_ids).await?;
        let missing = genres_missing_categories(genre_ids, &links, category_ids);
        if let Some(genre_id) = missing.first() {
            tracing::debug!(%genre_id, missing = missing.len(), "Genre without selected category");
            self.failures.push((
                "genres_id",
                validation::error(
                    "genre_has_categories",
                    "Each selected genre must be related to at least one selected category.",
                ),
            ));
        }
        Ok(())
    }

    /// Turn collected failures into a 422, or succeed.
    pub fn finish(self) -> AppResult<()> {
        if self.failures.is_empty() {
            return Ok(());
        }
        let mut errors = ValidationErrors::new();
        for (field, error) in self.failures {
            errors.add(field, error);
        }
        Err(AppError::from(errors))
    }
}
