use std::collections::HashSet;

use serde::Serialize;

use crate::db::{load_json, save_json, KeyValueStore, StoreKey};
use crate::models::EntryId;

/// Maximum number of remembered entries
pub const MAX_HISTORY: usize = 20;

/// Recently opened entries, most recent first
///
/// A recency-ordered set: at most [`MAX_HISTORY`] ids, no duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ViewHistory {
    ids: Vec<EntryId>,
}

impl ViewHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a history from ids in recency order
    ///
    /// Later duplicates are dropped and the result is cut to the bound, so any
    /// input yields a valid history.
    pub fn from_ids(ids: impl IntoIterator<Item = EntryId>) -> Self {
        let mut seen = HashSet::new();
        let ids = ids
            .into_iter()
            .filter(|id| seen.insert(id.clone()))
            .take(MAX_HISTORY)
            .collect();
        Self { ids }
    }

    /// Moves `id` to the front, dropping its previous position and the oldest
    /// entry if the bound is exceeded
    pub fn record_open(&mut self, id: EntryId) -> &[EntryId] {
        self.ids.retain(|existing| existing != &id);
        self.ids.insert(0, id);
        self.ids.truncate(MAX_HISTORY);
        &self.ids
    }

    pub fn ids(&self) -> &[EntryId] {
        &self.ids
    }

    pub fn iter(&self) -> impl Iterator<Item = &EntryId> {
        self.ids.iter()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Most recently opened id
    pub fn latest(&self) -> Option<&EntryId> {
        self.ids.first()
    }

    pub fn contains(&self, id: &EntryId) -> bool {
        self.ids.contains(id)
    }

    /// Reads the persisted history, starting empty if it is absent or malformed
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match load_json::<Vec<EntryId>>(store, &StoreKey::RecentViews) {
            Some(ids) => {
                let stored = ids.len();
                let history = Self::from_ids(ids);
                if history.len() != stored {
                    tracing::warn!(
                        stored,
                        kept = history.len(),
                        "Normalized persisted view history"
                    );
                }
                tracing::debug!(entries = history.len(), "Loaded view history");
                history
            }
            None => Self::new(),
        }
    }

    /// Writes the full sequence; failures are logged, not returned
    pub fn persist(&self, store: &dyn KeyValueStore) {
        save_json(store, &StoreKey::RecentViews, &self.ids);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;

    fn ids(raw: &[&str]) -> Vec<EntryId> {
        raw.iter().map(|id| EntryId::from(*id)).collect()
    }

    #[test]
    fn test_record_open_inserts_at_front() {
        let mut history = ViewHistory::new();
        history.record_open(EntryId::from("a"));
        history.record_open(EntryId::from("b"));
        assert_eq!(history.ids(), ids(&["b", "a"]).as_slice());
        assert_eq!(history.latest(), Some(&EntryId::from("b")));
    }

    #[test]
    fn test_reopening_front_is_noop() {
        let mut history = ViewHistory::from_ids(ids(&["a", "b", "c"]));
        history.record_open(EntryId::from("a"));
        assert_eq!(history.ids(), ids(&["a", "b", "c"]).as_slice());
    }

    #[test]
    fn test_reopening_moves_to_front() {
        let mut history = ViewHistory::from_ids(ids(&["a", "b", "c", "d", "e"]));
        history.record_open(EntryId::from("c"));
        // entries before c shift back by one, entries after c stay put
        assert_eq!(history.ids(), ids(&["c", "a", "b", "d", "e"]).as_slice());
    }

    #[test]
    fn test_bound_and_uniqueness_hold_for_any_sequence() {
        let mut history = ViewHistory::new();
        for n in 0..200u32 {
            let id = EntryId(((n * 7) % 31).to_string());
            history.record_open(id);

            assert!(history.len() <= MAX_HISTORY);
            let unique: HashSet<_> = history.iter().collect();
            assert_eq!(unique.len(), history.len());
        }
        assert_eq!(history.len(), MAX_HISTORY);
    }

    #[test]
    fn test_oldest_entry_drops_off_the_tail() {
        let mut history = ViewHistory::new();
        for n in 0..=MAX_HISTORY {
            history.record_open(EntryId(n.to_string()));
        }
        assert!(!history.contains(&EntryId::from("0")));
        assert!(history.contains(&EntryId::from("1")));
        assert_eq!(history.latest(), Some(&EntryId(MAX_HISTORY.to_string())));
    }

    #[test]
    fn test_from_ids_normalizes() {
        let history = ViewHistory::from_ids(ids(&["a", "b", "a", "c", "b"]));
        assert_eq!(history.ids(), ids(&["a", "b", "c"]).as_slice());
    }

    #[test]
    fn test_load_missing_is_empty() {
        let store = MemoryStore::new();
        assert!(ViewHistory::load(&store).is_empty());
    }

    #[test]
    fn test_load_discards_non_array() {
        let store = MemoryStore::new();
        store
            .set(&StoreKey::RecentViews, r#"{"ids":["a"]}"#.to_string())
            .unwrap();
        assert!(ViewHistory::load(&store).is_empty());
    }

    #[test]
    fn test_load_discards_non_identifier_elements() {
        let store = MemoryStore::new();
        store
            .set(&StoreKey::RecentViews, r#"["a", 5, null]"#.to_string())
            .unwrap();
        assert!(ViewHistory::load(&store).is_empty());
    }

    #[test]
    fn test_load_normalizes_oversized_history() {
        let store = MemoryStore::new();
        let stored: Vec<String> = (0..30).map(|n| (n % 25).to_string()).collect();
        store
            .set(&StoreKey::RecentViews, serde_json::to_string(&stored).unwrap())
            .unwrap();

        let history = ViewHistory::load(&store);
        assert_eq!(history.len(), MAX_HISTORY);
        assert_eq!(history.latest(), Some(&EntryId::from("0")));
    }

    #[test]
    fn test_persist_round_trips_through_load() {
        let store = MemoryStore::new();
        let mut history = ViewHistory::new();
        history.record_open(EntryId::from("x"));
        history.record_open(EntryId::from("y"));
        history.persist(&store);

        assert_eq!(
            store.get(&StoreKey::RecentViews).unwrap().as_deref(),
            Some(r#"["y","x"]"#)
        );
        assert_eq!(ViewHistory::load(&store), history);
    }
}
