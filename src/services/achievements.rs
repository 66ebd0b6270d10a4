use crate::models::Achievement;
use crate::services::affinity::CategoryAffinity;

/// Quantity an achievement tracks
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Metric {
    /// Distinct viewed entries in one category
    CategoryViews(String),
    /// Distinct viewed entries overall
    DistinctViews,
}

impl Metric {
    fn measure(&self, affinity: &CategoryAffinity) -> u32 {
        match self {
            Metric::CategoryViews(category) => affinity.category(category),
            Metric::DistinctViews => u32::try_from(affinity.distinct_count).unwrap_or(u32::MAX),
        }
    }
}

/// A threshold-based achievement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AchievementDefinition {
    pub id: String,
    pub title: String,
    pub metric: Metric,
    pub threshold: u32,
}

impl AchievementDefinition {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        metric: Metric,
        threshold: u32,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            metric,
            threshold,
        }
    }

    pub fn evaluate(&self, affinity: &CategoryAffinity) -> Achievement {
        let metric = self.metric.measure(affinity);
        let (unlocked, progress) = if self.threshold == 0 {
            (true, 1.0)
        } else {
            (
                metric >= self.threshold,
                (f64::from(metric) / f64::from(self.threshold)).min(1.0),
            )
        };

        Achievement {
            id: self.id.clone(),
            title: self.title.clone(),
            unlock_threshold: self.threshold,
            unlocked,
            progress,
        }
    }
}

pub const CATEGORY_THRESHOLD: u32 = 3;
pub const ENGAGEMENT_THRESHOLD: u32 = 10;

/// The built-in set: two category achievements and one for overall views
///
/// The finance and games categories keep their established ids and titles;
/// any other category gets ids derived from its label.
pub fn default_definitions(
    explorer_category: &str,
    guru_category: &str,
) -> Vec<AchievementDefinition> {
    let (explorer_id, explorer_title) = match explorer_category {
        "Финансы" => ("finance-explorer".to_string(), "Исследователь финансов".to_string()),
        other => (
            format!("{}-explorer", slug(other)),
            format!("Исследователь: {}", other),
        ),
    };
    let (guru_id, guru_title) = match guru_category {
        "Игры" => ("games-guru".to_string(), "Гуру игр".to_string()),
        other => (format!("{}-guru", slug(other)), format!("Гуру: {}", other)),
    };

    vec![
        AchievementDefinition::new(
            explorer_id,
            explorer_title,
            Metric::CategoryViews(explorer_category.to_string()),
            CATEGORY_THRESHOLD,
        ),
        AchievementDefinition::new(
            guru_id,
            guru_title,
            Metric::CategoryViews(guru_category.to_string()),
            CATEGORY_THRESHOLD,
        ),
        AchievementDefinition::new(
            format!("apps-{}", ENGAGEMENT_THRESHOLD),
            format!("Посмотрел {} приложений", ENGAGEMENT_THRESHOLD),
            Metric::DistinctViews,
            ENGAGEMENT_THRESHOLD,
        ),
    ]
}

fn slug(label: &str) -> String {
    label
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Evaluates each definition independently, in declaration order
pub fn evaluate_achievements(
    definitions: &[AchievementDefinition],
    affinity: &CategoryAffinity,
) -> Vec<Achievement> {
    definitions.iter().map(|d| d.evaluate(affinity)).collect()
}
