use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use crate::models::{find_entry, CatalogEntry};
use crate::services::affinity::CategoryAffinity;
use crate::services::history::ViewHistory;

/// Weights and bonuses of the "recommended for you" score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub category_interest: f64,
    pub popularity: f64,
    pub rating: f64,
    pub editors_choice_bonus: f64,
    pub new_entry_bonus: f64,
    /// Entries created at most this many days ago get `new_entry_bonus`
    pub new_window_days: i64,
    pub repeat_penalty_step: f64,
    pub repeat_penalty_cap: f64,
    /// Bonus for sharing the category of the most recently opened entry
    pub same_category_bonus: f64,
    pub recently_opened_penalty: f64,
    /// How many of the latest history ids `recently_opened_penalty` covers
    pub recently_opened_window: usize,
}

impl ScoringWeights {
    /// Maximum age of a new entry, saturating for out-of-range day counts
    pub fn new_window(&self) -> Duration {
        let days = self.new_window_days;
        Duration::try_days(days).unwrap_or(if days < 0 { Duration::MIN } else { Duration::MAX })
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            category_interest: 0.45,
            popularity: 0.20,
            rating: 0.25,
            editors_choice_bonus: 0.15,
            new_entry_bonus: 0.10,
            new_window_days: 60,
            repeat_penalty_step: 0.05,
            repeat_penalty_cap: 0.15,
            same_category_bonus: 0.05,
            recently_opened_penalty: 0.10,
            recently_opened_window: 3,
        }
    }
}

/// Size and diversity limits of a recommendation list
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecommendOptions {
    pub limit: usize,
    pub per_category_cap: usize,
    pub weights: ScoringWeights,
}

impl Default for RecommendOptions {
    fn default() -> Self {
        Self {
            limit: 6,
            per_category_cap: 3,
            weights: ScoringWeights::default(),
        }
    }
}

/// A candidate and its score
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredEntry<'a> {
    pub entry: &'a CatalogEntry,
    pub score: f64,
}

/// Inputs shared by every candidate of one scoring pass
struct ScoringContext<'a> {
    weights: &'a ScoringWeights,
    affinity: &'a CategoryAffinity,
    history: &'a ViewHistory,
    now: DateTime<Utc>,
    new_window: Duration,
    max_category_count: f64,
    max_popularity: f64,
    latest_category: Option<&'a str>,
}

impl<'a> ScoringContext<'a> {
    fn new(
        catalog: &'a [CatalogEntry],
        history: &'a ViewHistory,
        affinity: &'a CategoryAffinity,
        now: DateTime<Utc>,
        weights: &'a ScoringWeights,
    ) -> Self {
        let max_popularity = catalog
            .iter()
            .map(|entry| entry.popularity)
            .fold(0.0_f64, f64::max);

        let latest_category = history
            .latest()
            .and_then(|id| find_entry(catalog, id))
            .map(|entry| entry.category.as_str());

        Self {
            weights,
            affinity,
            history,
            now,
            new_window: weights.new_window(),
            max_category_count: f64::from(affinity.max_category_count()).max(1.0),
            max_popularity: max_popularity.max(1.0),
            latest_category,
        }
    }

    fn score(&self, entry: &CatalogEntry) -> f64 {
        let w = self.weights;

        let category_interest =
            f64::from(self.affinity.category(&entry.category)) / self.max_category_count;
        let popularity_score = entry.popularity / self.max_popularity;
        let rating_score = entry.rating / 5.0;

        let mut score = w.category_interest * category_interest
            + w.popularity * popularity_score
            + w.rating * rating_score;

        if entry.editors_choice {
            score += w.editors_choice_bonus;
        }

        if let Some(created_at) = entry.created_at {
            if self.now - created_at <= self.new_window {
                score += w.new_entry_bonus;
            }
        }

        // Zero for every candidate, as is the recently-opened penalty below:
        // candidates are never in the history.
        let views = f64::from(self.affinity.entry(&entry.id));
        if views > 0.0 {
            score -= w.repeat_penalty_cap.min(w.repeat_penalty_step * views);
        }

        if self.latest_category == Some(entry.category.as_str()) {
            score += w.same_category_bonus;
        }

        let recently_opened = self
            .history
            .iter()
            .take(w.recently_opened_window)
            .any(|id| id == &entry.id);
        if recently_opened {
            score -= w.recently_opened_penalty;
        }

        score
    }
}

/// Scores every entry not yet in the history, best first
///
/// Ties keep catalog order.
pub fn score_candidates<'a>(
    catalog: &'a [CatalogEntry],
    history: &ViewHistory,
    affinity: &CategoryAffinity,
    now: DateTime<Utc>,
    weights: &ScoringWeights,
) -> Vec<ScoredEntry<'a>> {
    let context = ScoringContext::new(catalog, history, affinity, now, weights);

    let mut scored: Vec<ScoredEntry<'a>> = catalog
        .iter()
        .filter(|entry| !history.contains(&entry.id))
        .map(|entry| ScoredEntry {
            entry,
            score: context.score(entry),
        })
        .collect();

    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored
}

/// Takes entries in order, skipping any whose category already filled its cap
pub fn apply_diversity_cap<'a>(
    ranked: impl IntoIterator<Item = &'a CatalogEntry>,
    limit: usize,
    per_category_cap: usize,
) -> Vec<&'a CatalogEntry> {
    let mut result = Vec::with_capacity(limit);
    let mut per_category: HashMap<&str, usize> = HashMap::new();

    for entry in ranked {
        if result.len() >= limit {
            break;
        }
        let taken = per_category.entry(entry.category.as_str()).or_insert(0);
        if *taken >= per_category_cap {
            continue;
        }
        *taken += 1;
        result.push(entry);
    }

    result
}

/// Builds the "recommended for you" list
///
/// With no history this is the best-rated entries (popularity breaks ties).
/// Otherwise unseen entries are ranked by the weighted score. Either way at
/// most `per_category_cap` entries share a category, so the list can be
/// shorter than `limit`.
pub fn recommend<'a>(
    catalog: &'a [CatalogEntry],
    history: &ViewHistory,
    affinity: &CategoryAffinity,
    now: DateTime<Utc>,
    options: &RecommendOptions,
) -> Vec<&'a CatalogEntry> {
    if catalog.is_empty() {
        return Vec::new();
    }

    if history.is_empty() {
        let mut ranked: Vec<&CatalogEntry> = catalog.iter().collect();
        ranked.sort_by(|a, b| {
            b.rating
                .total_cmp(&a.rating)
                .then_with(|| b.popularity.total_cmp(&a.popularity))
        });
        return apply_diversity_cap(ranked, options.limit, options.per_category_cap);
    }

    let scored = score_candidates(catalog, history, affinity, now, &options.weights);

    tracing::debug!(
        candidates = scored.len(),
        history = history.len(),
        "Scored recommendation candidates"
    );

    apply_diversity_cap(
        scored.into_iter().map(|s| s.entry),
        options.limit,
        options.per_category_cap,
    )
}
