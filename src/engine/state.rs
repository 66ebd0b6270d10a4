use crate::models::{find_entry, CatalogEntry, EntryId};
use crate::services::affinity::{affinity, CategoryAffinity};
use crate::services::history::ViewHistory;

/// Everything the derivations read: the catalog snapshot and the view history
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineState {
    pub catalog: Vec<CatalogEntry>,
    pub history: ViewHistory,
}

impl EngineState {
    pub fn new(catalog: Vec<CatalogEntry>, history: ViewHistory) -> Self {
        Self { catalog, history }
    }

    pub fn entry(&self, id: &EntryId) -> Option<&CatalogEntry> {
        find_entry(&self.catalog, id)
    }

    pub fn affinity(&self) -> CategoryAffinity {
        affinity(&self.history, &self.catalog)
    }
}
