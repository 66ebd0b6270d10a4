use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::EntryId;

/// Persisted pick of the day, stored as `{ "day": "YYYY-MM-DD", "entryId": ... }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRecommendationRecord {
    pub day: NaiveDate,
    pub entry_id: EntryId,
}

impl DailyRecommendationRecord {
    pub fn new(day: NaiveDate, entry_id: EntryId) -> Self {
        Self { day, entry_id }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_wire_format() {
        let record = DailyRecommendationRecord::new(
            NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            EntryId::from("7"),
        );
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"day":"2026-03-14","entryId":"7"}"#);
    }

    #[test]
    fn test_record_rejects_bad_day() {
        let parsed: Result<DailyRecommendationRecord, _> =
            serde_json::from_str(r#"{"day":"14.03.2026","entryId":"7"}"#);
        assert!(parsed.is_err());
    }
}
