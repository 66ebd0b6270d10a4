use serde::Deserialize;

use crate::engine::EngineSettings;
use crate::services::achievements::default_definitions;
use crate::services::recommendations::{RecommendOptions, ScoringWeights};

/// Largest accepted `NEW_WINDOW_DAYS`
const MAX_NEW_WINDOW_DAYS: i64 = 3650;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Catalog API base URL
    #[serde(default = "default_catalog_api_url")]
    pub catalog_api_url: String,

    /// Catalog API request timeout in seconds
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    /// Directory holding the persisted key-value records
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Number of "recommended for you" entries
    #[serde(default = "default_recommendation_limit")]
    pub recommendation_limit: usize,

    /// Maximum entries from one category in the recommendation list
    #[serde(default = "default_per_category_cap")]
    pub per_category_cap: usize,

    /// How many days an entry counts as new
    #[serde(default = "default_new_window_days")]
    pub new_window_days: i64,

    #[serde(default = "default_weight_category_interest")]
    pub weight_category_interest: f64,

    #[serde(default = "default_weight_popularity")]
    pub weight_popularity: f64,

    #[serde(default = "default_weight_rating")]
    pub weight_rating: f64,

    #[serde(default = "default_bonus_editors_choice")]
    pub bonus_editors_choice: f64,

    #[serde(default = "default_bonus_new")]
    pub bonus_new: f64,

    #[serde(default = "default_bonus_same_category")]
    pub bonus_same_category: f64,

    #[serde(default = "default_penalty_recently_opened")]
    pub penalty_recently_opened: f64,

    /// Category tracked by the first category achievement
    #[serde(default = "default_explorer_category")]
    pub explorer_category: String,

    /// Category tracked by the second category achievement
    #[serde(default = "default_guru_category")]
    pub guru_category: String,
}

fn default_catalog_api_url() -> String {
    "http://localhost:8000/api/v1".to_string()
}

fn default_http_timeout_secs() -> u64 {
    10
}

fn default_data_dir() -> String {
    ".catalog-engine".to_string()
}

fn default_recommendation_limit() -> usize {
    6
}

fn default_per_category_cap() -> usize {
    3
}

fn default_new_window_days() -> i64 {
    60
}

fn default_weight_category_interest() -> f64 {
    ScoringWeights::default().category_interest
}

fn default_weight_popularity() -> f64 {
    ScoringWeights::default().popularity
}

fn default_weight_rating() -> f64 {
    ScoringWeights::default().rating
}

fn default_bonus_editors_choice() -> f64 {
    ScoringWeights::default().editors_choice_bonus
}

fn default_bonus_new() -> f64 {
    ScoringWeights::default().new_entry_bonus
}

fn default_bonus_same_category() -> f64 {
    ScoringWeights::default().same_category_bonus
}

fn default_penalty_recently_opened() -> f64 {
    ScoringWeights::default().recently_opened_penalty
}

fn default_explorer_category() -> String {
    "Финансы".to_string()
}

fn default_guru_category() -> String {
    "Игры".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_api_url: default_catalog_api_url(),
            http_timeout_secs: default_http_timeout_secs(),
            data_dir: default_data_dir(),
            recommendation_limit: default_recommendation_limit(),
            per_category_cap: default_per_category_cap(),
            new_window_days: default_new_window_days(),
            weight_category_interest: default_weight_category_interest(),
            weight_popularity: default_weight_popularity(),
            weight_rating: default_weight_rating(),
            bonus_editors_choice: default_bonus_editors_choice(),
            bonus_new: default_bonus_new(),
            bonus_same_category: default_bonus_same_category(),
            penalty_recently_opened: default_penalty_recently_opened(),
            explorer_category: default_explorer_category(),
            guru_category: default_guru_category(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Scoring weights with any environment overrides applied
    pub fn scoring_weights(&self) -> ScoringWeights {
        ScoringWeights {
            category_interest: self.weight_category_interest,
            popularity: self.weight_popularity,
            rating: self.weight_rating,
            editors_choice_bonus: self.bonus_editors_choice,
            new_entry_bonus: self.bonus_new,
            same_category_bonus: self.bonus_same_category,
            recently_opened_penalty: self.penalty_recently_opened,
            new_window_days: self.new_window_days.clamp(0, MAX_NEW_WINDOW_DAYS),
            ..ScoringWeights::default()
        }
    }

    /// Builds the engine settings this configuration describes
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            recommend: RecommendOptions {
                limit: self.recommendation_limit,
                per_category_cap: self.per_category_cap,
                weights: self.scoring_weights(),
            },
            achievements: default_definitions(&self.explorer_category, &self.guru_category),
            ..EngineSettings::default()
        }
    }
}
