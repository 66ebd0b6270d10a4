use std::collections::HashSet;

use serde::Serialize;

use crate::models::{CatalogEntry, ALL_CATEGORIES};
use crate::services::affinity::CategoryAffinity;

/// Number of categories listed as the user's favourites
pub const TOP_CATEGORIES_LIMIT: usize = 3;

/// How much of one category (or of the whole catalog) the user has seen
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStats<'a> {
    pub category: String,
    pub total: usize,
    /// Viewed entries, never more than `total`
    pub viewed: usize,
    /// `viewed / total` as a percentage in `[0, 100]`, 0 for an empty category
    pub percent: f64,
    /// Most popular entry, rating breaking ties
    pub top_entry: Option<&'a CatalogEntry>,
}

/// Everything the categories screen shows
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStats<'a> {
    pub overall: CategoryStats<'a>,
    pub categories: Vec<CategoryStats<'a>>,
    /// Most viewed categories, at most [`TOP_CATEGORIES_LIMIT`]
    pub top_categories: Vec<String>,
}

/// Builds per-category coverage for `categories`
///
/// The "all" label is covered by `overall` and skipped in the per-category
/// list. With no labels the categories are taken from the catalog in order of
/// first appearance.
pub fn category_stats<'a>(
    catalog: &'a [CatalogEntry],
    affinity: &CategoryAffinity,
    categories: &[String],
) -> CatalogStats<'a> {
    let total_views: u32 = affinity.category_counts.values().sum();
    let overall = stats_for(ALL_CATEGORIES, catalog.iter(), total_views as usize);

    let labels: Vec<&str> = if categories.is_empty() {
        catalog_categories(catalog)
    } else {
        categories
            .iter()
            .map(String::as_str)
            .filter(|label| *label != ALL_CATEGORIES)
            .collect()
    };

    let categories = labels
        .into_iter()
        .map(|label| {
            stats_for(
                label,
                catalog.iter().filter(|entry| entry.category == label),
                affinity.category(label) as usize,
            )
        })
        .collect();

    CatalogStats {
        overall,
        categories,
        top_categories: top_categories(affinity, TOP_CATEGORIES_LIMIT),
    }
}

/// Categories by view count, most viewed first; equal counts sort by label
pub fn top_categories(affinity: &CategoryAffinity, limit: usize) -> Vec<String> {
    let mut ranked: Vec<(&String, u32)> = affinity
        .category_counts
        .iter()
        .filter(|(_, count)| **count > 0)
        .map(|(category, count)| (category, *count))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    ranked
        .into_iter()
        .take(limit)
        .map(|(category, _)| category.clone())
        .collect()
}

/// Highest popularity, then highest rating; the first such entry wins
pub fn top_entry<'a>(
    entries: impl IntoIterator<Item = &'a CatalogEntry>,
) -> Option<&'a CatalogEntry> {
    entries.into_iter().min_by(|a, b| {
        b.popularity
            .total_cmp(&a.popularity)
            .then_with(|| b.rating.total_cmp(&a.rating))
    })
}

fn catalog_categories(catalog: &[CatalogEntry]) -> Vec<&str> {
    let mut seen = HashSet::new();
    catalog
        .iter()
        .map(|entry| entry.category.as_str())
        .filter(|category| seen.insert(*category))
        .collect()
}

fn stats_for<'a>(
    category: &str,
    entries: impl Iterator<Item = &'a CatalogEntry> + Clone,
    viewed: usize,
) -> CategoryStats<'a> {
    let total = entries.clone().count();
    let viewed = viewed.min(total);
    let percent = if total == 0 {
        0.0
    } else {
        (viewed as f64 / total as f64 * 100.0).min(100.0)
    };

    CategoryStats {
        category: category.to_string(),
        total,
        viewed,
        percent,
        top_entry: top_entry(entries),
    }
}
