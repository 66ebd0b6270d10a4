use std::sync::Arc;

use rand::Rng;
use serde::Serialize;

use crate::clock::Clock;
use crate::db::{load_json, save_json, KeyValueStore, StoreKey};
use crate::models::{Achievement, CatalogEntry, DailyRecommendationRecord, EntryId};
use crate::services::achievements::{
    default_definitions, evaluate_achievements, AchievementDefinition,
};
use crate::services::affinity::CategoryAffinity;
use crate::services::category_stats::{category_stats, CatalogStats};
use crate::services::daily::{load_record, select_and_persist};
use crate::services::history::ViewHistory;
use crate::services::recommendations::{recommend, RecommendOptions};
use crate::services::shelves::{
    editors_choice, new_arrivals, popular, recently_viewed, sort_catalog, Shelves, SortOrder,
    RECENTLY_VIEWED_LIMIT, SHELF_LIMIT,
};

mod state;

pub use state::EngineState;

/// Tunables of the personalization engine
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    pub recommend: RecommendOptions,
    pub achievements: Vec<AchievementDefinition>,
    pub recently_viewed_limit: usize,
    pub shelf_limit: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            recommend: RecommendOptions::default(),
            achievements: default_definitions("Финансы", "Игры"),
            recently_viewed_limit: RECENTLY_VIEWED_LIMIT,
            shelf_limit: SHELF_LIMIT,
        }
    }
}

/// Everything the home screen renders from the engine
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeView<'a> {
    pub daily_recommendation: Option<&'a CatalogEntry>,
    pub recommendations: Vec<&'a CatalogEntry>,
    pub achievements: Vec<Achievement>,
    #[serde(flatten)]
    pub shelves: Shelves<'a>,
}

/// Owner of the single mutable engine state and its persistence
///
/// All derived values are recomputed from `EngineState`; the affinity index
/// is cached and refreshed whenever the catalog or history changes. Storage
/// failures are logged and never returned: the in-memory copy stays
/// authoritative.
pub struct Personalizer {
    state: EngineState,
    affinity: CategoryAffinity,
    daily: Option<DailyRecommendationRecord>,
    onboarding_seen: bool,
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    settings: EngineSettings,
}

impl Personalizer {
    /// Loads persisted history, daily record and onboarding flag
    ///
    /// Starts with an empty catalog; call [`Personalizer::set_catalog`] once
    /// the provider delivers one.
    pub fn load(
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        settings: EngineSettings,
    ) -> Self {
        let history = ViewHistory::load(store.as_ref());
        let daily = load_record(store.as_ref());
        let onboarding_seen =
            load_json::<bool>(store.as_ref(), &StoreKey::OnboardingSeen).unwrap_or(false);

        tracing::info!(
            history = history.len(),
            has_daily = daily.is_some(),
            onboarding_seen,
            "Personalizer loaded"
        );

        let state = EngineState::new(Vec::new(), history);
        let affinity = state.affinity();

        Self {
            state,
            affinity,
            daily,
            onboarding_seen,
            store,
            clock,
            settings,
        }
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn catalog(&self) -> &[CatalogEntry] {
        &self.state.catalog
    }

    pub fn history(&self) -> &ViewHistory {
        &self.state.history
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Replaces the catalog snapshot
    pub fn set_catalog(&mut self, catalog: Vec<CatalogEntry>) {
        self.state.catalog = catalog;
        self.affinity = self.state.affinity();
        tracing::debug!(entries = self.state.catalog.len(), "Catalog replaced");
    }

    /// Records that the user opened `id` and persists the new history
    pub fn record_open(&mut self, id: EntryId) -> &ViewHistory {
        tracing::debug!(entry_id = %id, "Entry opened");
        self.state.history.record_open(id);
        self.state.history.persist(self.store.as_ref());
        self.affinity = self.state.affinity();
        &self.state.history
    }

    pub fn affinity(&self) -> &CategoryAffinity {
        &self.affinity
    }

    /// Recommendation of the day, drawn with the thread RNG when needed
    pub fn daily_recommendation(&mut self) -> Option<&CatalogEntry> {
        self.daily_recommendation_with(&mut rand::thread_rng())
    }

    /// Recommendation of the day, drawing from `rng` when a new pick is due
    pub fn daily_recommendation_with<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Option<&CatalogEntry> {
        let today = self.clock.today();
        let record = select_and_persist(
            &self.state.catalog,
            self.store.as_ref(),
            self.daily.as_ref(),
            today,
            rng,
        )?;

        let entry_id = record.entry_id.clone();
        self.daily = Some(record);

        self.state.entry(&entry_id)
    }

    /// "Recommended for you" list
    pub fn recommendations(&self) -> Vec<&CatalogEntry> {
        recommend(
            &self.state.catalog,
            &self.state.history,
            &self.affinity,
            self.clock.now(),
            &self.settings.recommend,
        )
    }

    pub fn achievements(&self) -> Vec<Achievement> {
        evaluate_achievements(&self.settings.achievements, &self.affinity)
    }

    pub fn shelves(&self) -> Shelves<'_> {
        let catalog = &self.state.catalog;
        let limit = self.settings.shelf_limit;
        Shelves {
            recently_viewed: recently_viewed(
                &self.state.history,
                catalog,
                self.settings.recently_viewed_limit,
            ),
            popular: popular(catalog, limit),
            new_arrivals: new_arrivals(
                catalog,
                self.clock.now(),
                self.settings.recommend.weights.new_window(),
                limit,
            ),
            editors_choice: editors_choice(catalog, limit),
        }
    }

    /// Coverage per category label, plus the overall and favourite categories
    pub fn category_stats(&self, categories: &[String]) -> CatalogStats<'_> {
        category_stats(&self.state.catalog, &self.affinity, categories)
    }

    pub fn sorted_catalog(&self, order: SortOrder) -> Vec<&CatalogEntry> {
        sort_catalog(&self.state.catalog, order)
    }

    /// Assembles the full home screen
    pub fn home_view(&mut self) -> HomeView<'_> {
        let daily_id = self.daily_recommendation().map(|entry| entry.id.clone());
        HomeView {
            daily_recommendation: daily_id.and_then(|id| self.state.entry(&id)),
            recommendations: self.recommendations(),
            achievements: self.achievements(),
            shelves: self.shelves(),
        }
    }

    pub fn onboarding_seen(&self) -> bool {
        self.onboarding_seen
    }

    pub fn mark_onboarding_seen(&mut self) {
        if self.onboarding_seen {
            return;
        }
        self.onboarding_seen = true;
        save_json(self.store.as_ref(), &StoreKey::OnboardingSeen, &true);
    }
}
