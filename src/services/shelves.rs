use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{find_entry, CatalogEntry};
use crate::services::history::ViewHistory;

pub const RECENTLY_VIEWED_LIMIT: usize = 6;
pub const SHELF_LIMIT: usize = 8;

/// Sort orders offered for the full catalog listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Popularity,
    Newest,
    Rating,
}

/// Non-personalized rails of the home screen plus the recently viewed one
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Shelves<'a> {
    pub recently_viewed: Vec<&'a CatalogEntry>,
    pub popular: Vec<&'a CatalogEntry>,
    pub new_arrivals: Vec<&'a CatalogEntry>,
    pub editors_choice: Vec<&'a CatalogEntry>,
}

/// History ids that still resolve, most recent first
pub fn recently_viewed<'a>(
    history: &ViewHistory,
    catalog: &'a [CatalogEntry],
    limit: usize,
) -> Vec<&'a CatalogEntry> {
    history
        .iter()
        .filter_map(|id| find_entry(catalog, id))
        .take(limit)
        .collect()
}

pub fn popular(catalog: &[CatalogEntry], limit: usize) -> Vec<&CatalogEntry> {
    sort_catalog(catalog, SortOrder::Popularity)
        .into_iter()
        .take(limit)
        .collect()
}

/// Entries created within the window, newest first
pub fn new_arrivals(
    catalog: &[CatalogEntry],
    now: DateTime<Utc>,
    window: Duration,
    limit: usize,
) -> Vec<&CatalogEntry> {
    sort_catalog(catalog, SortOrder::Newest)
        .into_iter()
        .filter(|entry| entry.created_at.is_some_and(|created| now - created <= window))
        .take(limit)
        .collect()
}

/// Editors' picks in catalog order
pub fn editors_choice(catalog: &[CatalogEntry], limit: usize) -> Vec<&CatalogEntry> {
    catalog
        .iter()
        .filter(|entry| entry.editors_choice)
        .take(limit)
        .collect()
}

/// Stable sort of the whole catalog; undated entries sort last for `Newest`
pub fn sort_catalog(catalog: &[CatalogEntry], order: SortOrder) -> Vec<&CatalogEntry> {
    let mut sorted: Vec<&CatalogEntry> = catalog.iter().collect();
    match order {
        SortOrder::Popularity => sorted.sort_by(|a, b| b.popularity.total_cmp(&a.popularity)),
        SortOrder::Newest => sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortOrder::Rating => sorted.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
    }
    sorted
}
