use std::collections::{HashMap, HashSet};

use crate::models::{CatalogEntry, EntryId};
use crate::services::history::ViewHistory;

/// Interest derived from the current view history
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryAffinity {
    /// Distinct viewed entries per category
    pub category_counts: HashMap<String, u32>,
    /// Views per entry; always 0 or 1 since the history holds no duplicates
    pub entry_counts: HashMap<EntryId, u32>,
    /// Distinct ids in the history, resolvable or not
    pub distinct_count: usize,
}

impl CategoryAffinity {
    pub fn category(&self, category: &str) -> u32 {
        self.category_counts.get(category).copied().unwrap_or(0)
    }

    pub fn entry(&self, id: &EntryId) -> u32 {
        self.entry_counts.get(id).copied().unwrap_or(0)
    }

    /// Largest per-category count, 0 when nothing resolved
    pub fn max_category_count(&self) -> u32 {
        self.category_counts.values().copied().max().unwrap_or(0)
    }
}

/// Counts distinct recently viewed entries per category and per entry
///
/// Ids that no longer resolve against `catalog` are skipped.
pub fn affinity(history: &ViewHistory, catalog: &[CatalogEntry]) -> CategoryAffinity {
    let by_id: HashMap<&EntryId, &CatalogEntry> =
        catalog.iter().map(|entry| (&entry.id, entry)).collect();

    let mut result = CategoryAffinity::default();
    let mut skipped = 0usize;

    for id in history.iter() {
        match by_id.get(id) {
            Some(entry) => {
                *result
                    .category_counts
                    .entry(entry.category.clone())
                    .or_insert(0) += 1;
                *result.entry_counts.entry(id.clone()).or_insert(0) += 1;
            }
            None => skipped += 1,
        }
    }

    result.distinct_count = history.iter().collect::<HashSet<_>>().len();

    if skipped > 0 {
        tracing::debug!(skipped, "Skipped history ids missing from catalog");
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<CatalogEntry> {
        vec![
            CatalogEntry::new("1", "Bank", "Финансы"),
            CatalogEntry::new("2", "Broker", "Финансы"),
            CatalogEntry::new("3", "Chess", "Игры"),
            CatalogEntry::new("4", "Maps", "Навигация"),
        ]
    }

    fn history(raw: &[&str]) -> ViewHistory {
        ViewHistory::from_ids(raw.iter().map(|id| EntryId::from(*id)))
    }

    #[test]
    fn test_counts_per_category() {
        let result = affinity(&history(&["3", "1", "2"]), &catalog());

        assert_eq!(result.category("Финансы"), 2);
        assert_eq!(result.category("Игры"), 1);
        assert_eq!(result.category("Навигация"), 0);
        assert_eq!(result.max_category_count(), 2);
        assert_eq!(result.distinct_count, 3);
    }

    #[test]
    fn test_entry_counts_are_zero_or_one() {
        let result = affinity(&history(&["1", "3"]), &catalog());

        assert_eq!(result.entry(&EntryId::from("1")), 1);
        assert_eq!(result.entry(&EntryId::from("3")), 1);
        assert_eq!(result.entry(&EntryId::from("2")), 0);
    }

    #[test]
    fn test_unresolvable_ids_are_skipped() {
        let result = affinity(&history(&["gone", "1"]), &catalog());

        assert_eq!(result.category("Финансы"), 1);
        assert_eq!(result.entry(&EntryId::from("gone")), 0);
        assert_eq!(result.category_counts.values().sum::<u32>(), 1);
        // still counted as a distinct view
        assert_eq!(result.distinct_count, 2);
    }

    #[test]
    fn test_empty_history() {
        let result = affinity(&ViewHistory::new(), &catalog());
        assert_eq!(result, CategoryAffinity::default());
        assert_eq!(result.max_category_count(), 0);
    }

    #[test]
    fn test_empty_catalog() {
        let result = affinity(&history(&["1", "2"]), &[]);
        assert!(result.category_counts.is_empty());
        assert_eq!(result.distinct_count, 2);
    }
}
