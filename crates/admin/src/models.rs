//! Entities as the API returns them.

use catalog_core::catalog::CastMemberType;
use catalog_core::listing::ListMeta;
use catalog_core::types::{DbId, Timestamp};
use serde::Deserialize;

/// `{ "data": T }` envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct DataResponse<T> {
    pub data: T,
}

/// `{ "data": [...], "meta": {...} }` envelope returned by list endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse<T> {
    pub data: Vec<T>,
    pub meta: ListMeta,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Category {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Genre {
    pub id: DbId,
    pub name: String,
    pub is_active: bool,
    /// Present on genre endpoints, absent when embedded in a video.
    #[serde(default)]
    pub categories: Vec<Category>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CastMember {
    pub id: DbId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CastMemberType,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Video {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub year_launched: i16,
    pub opened: bool,
    pub rating: String,
    pub duration: i16,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub cast_members: Vec<CastMember>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}
