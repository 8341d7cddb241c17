//! Catalog domain constants and relation rules.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::types::DbId;

// ---------------------------------------------------------------------------
// Cast members
// ---------------------------------------------------------------------------

/// Role a cast member plays, stored as `SMALLINT` in `cast_members.type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i16", into = "i16")]
pub enum CastMemberType {
    Director = 1,
    Actor = 2,
}

impl CastMemberType {
    pub const ALL: [CastMemberType; 2] = [CastMemberType::Director, CastMemberType::Actor];

    pub fn label(self) -> &'static str {
        match self {
            CastMemberType::Director => "Director",
            CastMemberType::Actor => "Actor",
        }
    }
}

impl From<CastMemberType> for i16 {
    fn from(value: CastMemberType) -> Self {
        value as i16
    }
}

impl TryFrom<i16> for CastMemberType {
    type Error = String;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(CastMemberType::Director),
            2 => Ok(CastMemberType::Actor),
            other => Err(format!("unknown cast member type {other}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Videos
// ---------------------------------------------------------------------------

/// Advisory content ratings accepted for `videos.rating`.
pub const RATINGS: &[&str] = &["L", "10", "12", "14", "16", "18"];

pub fn is_valid_rating(rating: &str) -> bool {
    RATINGS.contains(&rating)
}

/// Earliest accepted `year_launched`.
pub const MIN_YEAR_LAUNCHED: i16 = 1;

/// Latest accepted `year_launched` (four-digit years only).
pub const MAX_YEAR_LAUNCHED: i16 = 9999;

/// Return the genres that are not linked to any of the selected categories.
///
/// `links` holds `(genre_id, category_id)` pairs loaded from `category_genre`.
/// Order follows `genre_ids`; duplicates are reported once.
pub fn genres_missing_categories(
    genre_ids: &[DbId],
    links: &[(DbId, DbId)],
    category_ids: &[DbId],
) -> Vec<DbId> {
    let selected: HashSet<&DbId> = category_ids.iter().collect();
    let covered: HashSet<&DbId> = links
        .iter()
        .filter(|(_, category_id)| selected.contains(category_id))
        .map(|(genre_id, _)| genre_id)
        .collect();

    let mut seen = HashSet::new();
    genre_ids
        .iter()
        .filter(|id| !covered.contains(id) && seen.insert(**id))
        .copied()
        .collect()
}

/// Deduplicate an id list while preserving first-seen order.
pub fn distinct_ids(ids: &[DbId]) -> Vec<DbId> {
    let mut seen = HashSet::new();
    ids.iter().filter(|id| seen.insert(**id)).copied().collect()
}
