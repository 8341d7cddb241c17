//! Shared query parameter types for list endpoints.
//!
//! Every value is accepted as a string and coerced leniently: garbage falls
//! back to the default instead of rejecting the request.

use catalog_core::listing::{parse_bool, parse_csv, parse_int, PageRequest, SortDirection};
use catalog_db::repositories::ListOptions;
use serde::Deserialize;
use uuid::Uuid;

use crate::config::ServerConfig;

/// `?search=&page=&per_page=&sort=&dir=&all` shared by every list endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    pub page: Option<String>,
    pub per_page: Option<String>,
    pub sort: Option<String>,
    pub dir: Option<String>,
    /// Present (with any value) to disable pagination.
    pub all: Option<String>,
}

impl ListParams {
    /// Trimmed, non-empty search term.
    pub fn search(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    /// Resolve sort/direction/window against the server configuration.
    pub fn to_options(&self, config: &ServerConfig) -> ListOptions {
        let page = if self.all.is_some() {
            None
        } else {
            Some(PageRequest::new(
                parse_int(self.page.as_deref()),
                parse_int(self.per_page.as_deref()),
                config.default_per_page,
                config.max_per_page,
            ))
        };

        ListOptions {
            sort: self.sort.clone(),
            dir: self
                .dir
                .as_deref()
                .and_then(SortDirection::parse)
                .unwrap_or_default(),
            page,
        }
    }
}

/// `GET /categories` parameters.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryListParams {
    #[serde(flatten)]
    pub list: ListParams,
    pub is_active: Option<String>,
}

impl CategoryListParams {
    pub fn is_active(&self) -> Option<bool> {
        parse_bool(self.is_active.as_deref())
    }
}

/// `GET /genres` parameters.
#[derive(Debug, Default, Deserialize)]
pub struct GenreListParams {
    #[serde(flatten)]
    pub list: ListParams,
    pub is_active: Option<String>,
    /// Comma list of category ids or names.
    pub categories: Option<String>,
}

impl GenreListParams {
    pub fn is_active(&self) -> Option<bool> {
        parse_bool(self.is_active.as_deref())
    }

    /// Entries that parse as UUIDs are rewritten in canonical lowercase form
    /// so they match `id::text`; names pass through untouched.
    pub fn categories(&self) -> Vec<String> {
        self.categories
            .as_deref()
            .map(parse_csv)
            .unwrap_or_default()
            .into_iter()
            .map(|v| match Uuid::parse_str(&v) {
                Ok(id) => id.to_string(),
                Err(_) => v,
            })
            .collect()
    }
}

/// `GET /cast-members` parameters.
#[derive(Debug, Default, Deserialize)]
pub struct CastMemberListParams {
    #[serde(flatten)]
    pub list: ListParams,
    /// Comma list of cast member types (`1`, `2`).
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl CastMemberListParams {
    /// Parsed types; unparseable entries are dropped.
    pub fn kinds(&self) -> Vec<i16> {
        self.kind
            .as_deref()
            .map(parse_csv)
            .unwrap_or_default()
            .iter()
            .filter_map(|v| v.parse().ok())
            .collect()
    }
}

/// `GET /videos` parameters.
#[derive(Debug, Default, Deserialize)]
pub struct VideoListParams {
    #[serde(flatten)]
    pub list: ListParams,
    pub categories: Option<String>,
    pub genres: Option<String>,
    pub cast_members: Option<String>,
}

impl VideoListParams {
    pub fn categories(&self) -> Vec<Uuid> {
        parse_uuid_csv(self.categories.as_deref())
    }

    pub fn genres(&self) -> Vec<Uuid> {
        parse_uuid_csv(self.genres.as_deref())
    }

    pub fn cast_members(&self) -> Vec<Uuid> {
        parse_uuid_csv(self.cast_members.as_deref())
    }
}

/// Parse a comma list of UUIDs, dropping malformed entries.
fn parse_uuid_csv(value: Option<&str>) -> Vec<Uuid> {
    value
        .map(parse_csv)
        .unwrap_or_default()
        .iter()
        .filter_map(|v| Uuid::parse_str(v).ok())
        .collect()
}
