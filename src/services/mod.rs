pub mod achievements;
pub mod affinity;
pub mod category_stats;
pub mod daily;
pub mod history;
pub mod providers;
pub mod recommendations;
pub mod shelves;

pub use affinity::{affinity, CategoryAffinity};
pub use category_stats::{category_stats, CatalogStats, CategoryStats};
pub use daily::{select_for_today, DailyPick};
pub use history::{ViewHistory, MAX_HISTORY};
pub use recommendations::{recommend, RecommendOptions, ScoringWeights};
