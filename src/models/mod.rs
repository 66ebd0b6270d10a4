use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

mod achievement;
mod records;

pub use achievement::Achievement;
pub use records::DailyRecommendationRecord;

/// Category label the catalog API uses for "no filter"
pub const ALL_CATEGORIES: &str = "Все приложения";

/// Opaque, stable identifier of a catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub String);

impl EntryId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EntryId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for EntryId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One item of the browsable catalog
///
/// The engine reads `category`, `rating`, `popularity`, `created_at`,
/// `editors_choice` and `fun_fact`; the remaining fields are display data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub id: EntryId,
    pub name: String,
    pub category: String,
    /// 0.0 to 5.0
    pub rating: f64,
    /// Non-negative, unbounded
    pub popularity: f64,
    pub created_at: Option<DateTime<Utc>>,
    pub editors_choice: bool,
    pub fun_fact: Option<String>,
    pub developer: Option<String>,
    pub description: Option<String>,
    pub icon_link: Option<String>,
}

impl CatalogEntry {
    /// Creates an entry with zero rating/popularity and no optional data
    pub fn new(
        id: impl Into<EntryId>,
        name: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            rating: 0.0,
            popularity: 0.0,
            created_at: None,
            editors_choice: false,
            fun_fact: None,
            developer: None,
            description: None,
            icon_link: None,
        }
    }

    /// Whether the entry carries a fun fact worth featuring
    pub fn has_fun_fact(&self) -> bool {
        self.fun_fact
            .as_deref()
            .is_some_and(|fact| !fact.trim().is_empty())
    }
}

/// Looks up an entry by id
pub fn find_entry<'a>(catalog: &'a [CatalogEntry], id: &EntryId) -> Option<&'a CatalogEntry> {
    catalog.iter().find(|entry| &entry.id == id)
}

/// Full catalog snapshot delivered by a provider
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CatalogSnapshot {
    pub entries: Vec<CatalogEntry>,
    pub categories: Vec<String>,
}

// ============================================================================
// Catalog API Types
// ============================================================================

/// Entry identifier as the catalog API sends it
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ApiId {
    Number(u64),
    Text(String),
}

impl Display for ApiId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiId::Number(id) => write!(f, "{}", id),
            ApiId::Text(id) => write!(f, "{}", id),
        }
    }
}

/// Raw application record from `GET /applications/get_many`
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEntry {
    pub id: ApiId,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub popularity: Option<f64>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub editors_choice: Option<bool>,
    #[serde(default)]
    pub fun_fact: Option<String>,
    #[serde(default)]
    pub developer: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon_link: Option<String>,
}

impl From<ApiEntry> for CatalogEntry {
    fn from(api: ApiEntry) -> Self {
        CatalogEntry {
            id: EntryId(api.id.to_string()),
            name: api.name,
            category: api
                .category
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| "unknown".to_string()),
            rating: api.rating.unwrap_or(0.0),
            popularity: api.popularity.unwrap_or(0.0).max(0.0),
            created_at: api.created_at.as_deref().and_then(parse_timestamp),
            editors_choice: api.editors_choice.unwrap_or(false),
            fun_fact: api.fun_fact.filter(|fact| !fact.trim().is_empty()),
            developer: api.developer,
            description: api.description,
            icon_link: api.icon_link,
        }
    }
}

/// Response body of `GET /categories/get_all`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiCategories {
    #[serde(default)]
    pub categories: Vec<String>,
}

/// Parses the timestamp shapes the catalog API emits
///
/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS[.fff]` (read as UTC) and a
/// bare date (midnight UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
