//! List-query rules shared by every paginated catalog endpoint.
//!
//! Lives in `core` so the repository layer, the HTTP handlers and the admin
//! client agree on defaults, clamping and the shape of pagination metadata.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Pagination defaults
// ---------------------------------------------------------------------------

/// Default number of rows per page.
pub const DEFAULT_PER_PAGE: i64 = 15;

/// Maximum number of rows per page.
pub const MAX_PER_PAGE: i64 = 100;

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

/// Sort direction for list endpoints (`?dir=asc|desc`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Parse a direction case-insensitively. Unknown values yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("asc") {
            Some(Self::Asc)
        } else if value.eq_ignore_ascii_case("desc") {
            Some(Self::Desc)
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    /// SQL keyword for an `ORDER BY` clause.
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Resolve a requested sort column against a whitelist.
///
/// Returns the whitelisted spelling so callers can interpolate it into SQL.
pub fn resolve_sort<'a>(requested: Option<&str>, allowed: &'a [&'a str]) -> Option<&'a str> {
    let requested = requested?;
    allowed.iter().copied().find(|column| *column == requested)
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

/// A validated page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: i64,
    pub per_page: i64,
}

impl PageRequest {
    /// Clamp user-provided values: page below 1 becomes 1, `per_page` is
    /// clamped into `[1, max_per_page]` and defaults to `default_per_page`.
    ///
    /// Pages are capped so that `offset()` always fits in an `i64`; any page
    /// past the last one simply yields no rows.
    pub fn new(
        page: Option<i64>,
        per_page: Option<i64>,
        default_per_page: i64,
        max_per_page: i64,
    ) -> Self {
        let per_page = per_page.unwrap_or(default_per_page).clamp(1, max_per_page.max(1));
        let max_page = i64::MAX / per_page;
        Self {
            page: page.unwrap_or(1).clamp(1, max_page),
            per_page,
        }
    }

    /// A single page wide enough to hold `total` rows (used by `?all`).
    pub fn everything(total: i64) -> Self {
        Self {
            page: 1,
            per_page: total.max(1),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

/// Pagination metadata returned alongside every list under `meta`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListMeta {
    pub current_page: i64,
    pub per_page: i64,
    pub total: i64,
    pub last_page: i64,
    /// 1-based index of the first row on this page, `None` when empty.
    pub from: Option<i64>,
    /// 1-based index of the last row on this page, `None` when empty.
    pub to: Option<i64>,
}

impl ListMeta {
    pub fn new(page: &PageRequest, total: i64, returned: usize) -> Self {
        let returned = returned as i64;
        let last_page = ((total + page.per_page - 1) / page.per_page).max(1);
        let (from, to) = if returned == 0 {
            (None, None)
        } else {
            (Some(page.offset() + 1), Some(page.offset() + returned))
        };

        Self {
            current_page: page.page,
            per_page: page.per_page,
            total,
            last_page,
            from,
            to,
        }
    }
}

// ---------------------------------------------------------------------------
// Query-string helpers
// ---------------------------------------------------------------------------

/// Leniently parse an integer query value. Garbage yields `None`.
pub fn parse_int(value: Option<&str>) -> Option<i64> {
    value.and_then(|v| v.trim().parse().ok())
}

/// Leniently parse a boolean query value (`1/0`, `true/false`, `yes/no`).
pub fn parse_bool(value: Option<&str>) -> Option<bool> {
    match value?.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Split a comma-separated list, trimming entries and dropping empties.
pub fn parse_csv(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
