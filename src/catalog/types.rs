//! Catalog record types and the category label table.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Display name used when a record arrives without a `name`.
pub const UNKNOWN_APP: &str = "Unknown App";
/// Display name used when a record arrives without a `company`.
pub const UNKNOWN_COMPANY: &str = "Unknown Company";

// ============================================================================
// Category
// ============================================================================

/// Application category.
///
/// The wire format is a lowercase string. Anything outside the known set
/// decodes to [`Category::Unknown`] instead of failing the record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum Category {
    Game,
    ShortPlay,
    News,
    General,
    #[default]
    Unknown,
}

/// Wire name and display label for every category, in selector order.
const CATEGORY_TABLE: [(Category, &str, &str); 5] = [
    (Category::Game, "game", "Game"),
    (Category::ShortPlay, "short_play", "Short Video"),
    (Category::News, "news", "News"),
    (Category::General, "general", "General"),
    (Category::Unknown, "unknown", "Unknown"),
];

/// Filter positions offered by the category selector. `None` is "All".
pub const CATEGORY_FILTERS: [Option<Category>; 6] = [
    None,
    Some(Category::Game),
    Some(Category::ShortPlay),
    Some(Category::News),
    Some(Category::General),
    Some(Category::Unknown),
];

#[derive(Debug, Error)]
#[error("Unknown category '{0}' (expected one of: all, game, short_play, news, general, unknown)")]
pub struct CategoryParseError(pub String);

impl Category {
    /// Decode a wire value. Unrecognized values map to `Unknown`.
    pub fn from_wire(s: &str) -> Self {
        CATEGORY_TABLE
            .iter()
            .find(|(_, wire, _)| *wire == s)
            .map(|(cat, _, _)| *cat)
            .unwrap_or(Category::Unknown)
    }

    pub fn wire_name(self) -> &'static str {
        self.entry().1
    }

    /// Human-readable label shown on cards and in the selector.
    pub fn label(self) -> &'static str {
        self.entry().2
    }

    fn entry(self) -> &'static (Category, &'static str, &'static str) {
        // Every variant has exactly one row in CATEGORY_TABLE.
        match self {
            Category::Game => &CATEGORY_TABLE[0],
            Category::ShortPlay => &CATEGORY_TABLE[1],
            Category::News => &CATEGORY_TABLE[2],
            Category::General => &CATEGORY_TABLE[3],
            Category::Unknown => &CATEGORY_TABLE[4],
        }
    }

    /// Parse a user-supplied filter value (CLI flag or config).
    ///
    /// Empty and `"all"` mean no category constraint. Matching is
    /// case-insensitive and also accepts display labels ("Short Video").
    pub fn parse_filter(s: &str) -> Result<Option<Category>, CategoryParseError> {
        let needle = s.trim().to_lowercase();
        if needle.is_empty() || needle == "all" {
            return Ok(None);
        }
        CATEGORY_TABLE
            .iter()
            .find(|(_, wire, label)| *wire == needle || label.to_lowercase() == needle)
            .map(|(cat, _, _)| Some(*cat))
            .ok_or_else(|| CategoryParseError(s.to_string()))
    }
}

impl From<Option<String>> for Category {
    fn from(value: Option<String>) -> Self {
        value
            .as_deref()
            .map(Category::from_wire)
            .unwrap_or(Category::Unknown)
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        value.wire_name().to_string()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Label for a filter position, `"All"` for no constraint.
pub fn filter_label(filter: Option<Category>) -> &'static str {
    filter.map(Category::label).unwrap_or("All")
}

// ============================================================================
// AppRecord
// ============================================================================

fn default_name() -> String {
    UNKNOWN_APP.to_string()
}

fn default_company() -> String {
    UNKNOWN_COMPANY.to_string()
}

/// One catalog entry as it appears in the `apps` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppRecord {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_company")]
    pub company: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub icon_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insert_time: Option<String>,
}

/// Fields supplied by the caller when adding a record locally.
///
/// `id` and the timestamps are assigned by the catalog.
#[derive(Debug, Clone, Default)]
pub struct AppDraft {
    pub app_id: Option<String>,
    pub name: String,
    pub company: String,
    pub category: Category,
    pub icon_url: String,
}

/// Top-level document shape, used when serializing a catalog back out.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogDocument {
    #[serde(default)]
    pub apps: Vec<AppRecord>,
}
