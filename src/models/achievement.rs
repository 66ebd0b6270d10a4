use serde::{Deserialize, Serialize};

/// Evaluated state of one achievement
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub id: String,
    pub title: String,
    pub unlock_threshold: u32,
    pub unlocked: bool,
    /// Fraction of the threshold reached, clamped to `[0, 1]`
    pub progress: f64,
}
