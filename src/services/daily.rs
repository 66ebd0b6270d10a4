use chrono::NaiveDate;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::db::{load_json, save_json, KeyValueStore, StoreKey};
use crate::models::{find_entry, CatalogEntry, DailyRecommendationRecord, EntryId};

/// Outcome of a daily selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DailyPick {
    /// Today's persisted pick is still valid
    Kept(DailyRecommendationRecord),
    /// A new pick was drawn and must be persisted
    Fresh(DailyRecommendationRecord),
}

impl DailyPick {
    pub fn record(&self) -> &DailyRecommendationRecord {
        match self {
            DailyPick::Kept(record) | DailyPick::Fresh(record) => record,
        }
    }

    pub fn entry_id(&self) -> &EntryId {
        &self.record().entry_id
    }

    pub fn is_fresh(&self) -> bool {
        matches!(self, DailyPick::Fresh(_))
    }

    pub fn into_record(self) -> DailyRecommendationRecord {
        match self {
            DailyPick::Kept(record) | DailyPick::Fresh(record) => record,
        }
    }
}

/// Picks the recommendation of the day
///
/// A record for `today` whose entry still resolves is returned as is, so
/// repeated calls within a day never change the pick. Otherwise a uniformly
/// random entry is drawn from those with a fun fact, or from the whole
/// catalog when none has one. An empty catalog yields `None`.
pub fn select_for_today<R: Rng + ?Sized>(
    catalog: &[CatalogEntry],
    persisted: Option<&DailyRecommendationRecord>,
    today: NaiveDate,
    rng: &mut R,
) -> Option<DailyPick> {
    if let Some(record) = persisted {
        if record.day == today && find_entry(catalog, &record.entry_id).is_some() {
            return Some(DailyPick::Kept(record.clone()));
        }
    }

    let with_fact: Vec<&CatalogEntry> = catalog.iter().filter(|e| e.has_fun_fact()).collect();
    let candidates: Vec<&CatalogEntry> = if with_fact.is_empty() {
        catalog.iter().collect()
    } else {
        with_fact
    };

    let picked = candidates.choose(rng)?;

    tracing::info!(
        day = %today,
        entry_id = %picked.id,
        candidates = candidates.len(),
        "Selected daily recommendation"
    );

    Some(DailyPick::Fresh(DailyRecommendationRecord::new(
        today,
        picked.id.clone(),
    )))
}

/// Reads the persisted daily record, `None` if absent or malformed
pub fn load_record(store: &dyn KeyValueStore) -> Option<DailyRecommendationRecord> {
    load_json(store, &StoreKey::DailyRecommendation)
}

/// Runs the selector against `persisted` and writes a fresh pick to `store`
///
/// Returns the record in effect for `today`. A failed write is logged and the
/// pick is still returned.
pub fn select_and_persist<R: Rng + ?Sized>(
    catalog: &[CatalogEntry],
    store: &dyn KeyValueStore,
    persisted: Option<&DailyRecommendationRecord>,
    today: NaiveDate,
    rng: &mut R,
) -> Option<DailyRecommendationRecord> {
    let pick = select_for_today(catalog, persisted, today, rng)?;
    if pick.is_fresh() {
        save_json(store, &StoreKey::DailyRecommendation, pick.record());
    }
    Some(pick.into_record())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, d).unwrap()
    }

    fn with_fact(id: &str) -> CatalogEntry {
        let mut entry = CatalogEntry::new(id, id, "Игры");
        entry.fun_fact = Some(format!("{} has a secret level", id));
        entry
    }

    #[test]
    fn test_empty_catalog_has_no_pick() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(select_for_today(&[], None, day(1), &mut rng), None);
    }

    #[test]
    fn test_same_day_is_stable() {
        let catalog: Vec<_> = (0..10).map(|n| with_fact(&n.to_string())).collect();
        let store = MemoryStore::new();

        let mut rng = StdRng::seed_from_u64(1);
        let first = select_and_persist(&catalog, &store, None, day(3), &mut rng);
        let persisted = load_record(&store);
        let second = select_and_persist(
            &catalog,
            &store,
            persisted.as_ref(),
            day(3),
            &mut StdRng::seed_from_u64(99),
        );

        assert!(first.is_some());
        assert_eq!(first, persisted);
        assert_eq!(first, second);
    }

    #[test]
    fn test_kept_record_is_not_fresh() {
        let catalog = vec![with_fact("a"), with_fact("b")];
        let record = DailyRecommendationRecord::new(day(3), EntryId::from("b"));

        let pick = select_for_today(&catalog, Some(&record), day(3), &mut StdRng::seed_from_u64(5));

        assert_eq!(pick, Some(DailyPick::Kept(record)));
    }

    #[test]
    fn test_next_day_picks_again_and_persists() {
        let catalog = vec![with_fact("only")];
        let store = MemoryStore::new();
        save_json(
            &store,
            &StoreKey::DailyRecommendation,
            &DailyRecommendationRecord::new(day(3), EntryId::from("only")),
        );

        let persisted = load_record(&store);
        let picked = select_and_persist(
            &catalog,
            &store,
            persisted.as_ref(),
            day(4),
            &mut StdRng::seed_from_u64(7),
        );

        assert_eq!(picked.map(|r| r.entry_id), Some(EntryId::from("only")));
        assert_eq!(
            load_record(&store),
            Some(DailyRecommendationRecord::new(day(4), EntryId::from("only")))
        );
    }

    #[test]
    fn test_record_for_removed_entry_is_replaced() {
        let catalog = vec![with_fact("new")];
        let record = DailyRecommendationRecord::new(day(3), EntryId::from("removed"));

        let pick = select_for_today(&catalog, Some(&record), day(3), &mut StdRng::seed_from_u64(2))
            .unwrap();

        assert!(pick.is_fresh());
        assert_eq!(pick.entry_id(), &EntryId::from("new"));
    }

    #[test]
    fn test_prefers_entries_with_fun_fact() {
        let mut catalog: Vec<_> = (0..20)
            .map(|n| CatalogEntry::new(n.to_string(), "plain", "Игры"))
            .collect();
        catalog.push(with_fact("fact"));

        for seed in 0..25 {
            let pick = select_for_today(&catalog, None, day(1), &mut StdRng::seed_from_u64(seed))
                .unwrap();
            assert_eq!(pick.entry_id(), &EntryId::from("fact"));
        }
    }

    #[test]
    fn test_falls_back_to_whole_catalog() {
        let catalog = vec![CatalogEntry::new("1", "plain", "Игры")];
        let pick = select_for_today(&catalog, None, day(1), &mut StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(pick.entry_id(), &EntryId::from("1"));
    }

    #[test]
    fn test_malformed_record_is_ignored() {
        let catalog = vec![with_fact("a")];
        let store = MemoryStore::new();
        store
            .set(&StoreKey::DailyRecommendation, r#"["a"]"#.to_string())
            .unwrap();

        let persisted = load_record(&store);
        assert_eq!(persisted, None);
        let mut rng = StdRng::seed_from_u64(4);
        let picked = select_and_persist(&catalog, &store, None, day(9), &mut rng);

        assert_eq!(picked.map(|r| r.entry_id), Some(EntryId::from("a")));
        assert_eq!(load_record(&store).map(|r| r.day), Some(day(9)));
    }
}
