//! Built-in demo rows for first-time visitors.

use crate::migrate::{add_days, RawRecord, DEADLINE_OFFSET_DAYS};
use chrono::{Duration, NaiveDate};
use rolodex_core::{TrackedOpportunity, TrackingStatus};
use serde_json::{json, Value};
use std::collections::BTreeMap;

pub const EQUITY_RESEARCH_ROW_ID: &str = "jpm-er-sa";

pub fn default_deadlines() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("Goldman Sachs".to_string(), "2025-09-01".to_string()),
        ("Morgan Stanley".to_string(), "2025-08-25".to_string()),
    ])
}

/// Seed collection in stored form; it goes through migration like any
/// other stored content, so the blank deadline below gets defaulted.
pub fn default_collection(today: NaiveDate) -> Vec<RawRecord> {
    let today_iso = iso(today);
    let week_ago = iso(today - Duration::days(7));
    [
        json!({
            "id": "gs-ib-sa",
            "name": "Goldman Sachs",
            "label": "Investment Banking Summer Analyst",
            "location": "New York, NY",
            "createdOn": today_iso,
            "status": TrackingStatus::NotApplied.as_str(),
            "flagged": true,
            "deadline": "2025-09-01"
        }),
        json!({
            "id": "ms-ib-sa",
            "name": "Morgan Stanley",
            "label": "Investment Banking Summer Analyst",
            "location": "San Francisco, CA",
            "createdOn": week_ago,
            "status": TrackingStatus::Phone.as_str(),
            "flagged": false,
            "deadline": "2025-08-25"
        }),
        json!({
            "id": EQUITY_RESEARCH_ROW_ID,
            "name": "J.P. Morgan",
            "label": "Equity Research Summer Analyst",
            "location": "New York, NY",
            "createdOn": today_iso,
            "status": TrackingStatus::NotApplied.as_str(),
            "flagged": false,
            "deadline": ""
        }),
    ]
    .into_iter()
    .filter_map(|value| match value {
        Value::Object(map) => Some(map),
        _ => None,
    })
    .collect()
}

/// Row added to collections saved before it was introduced.
pub fn equity_research_row(today: NaiveDate) -> TrackedOpportunity {
    let today_iso = iso(today);
    TrackedOpportunity {
        id: EQUITY_RESEARCH_ROW_ID.to_string(),
        name: "J.P. Morgan".to_string(),
        label: "Equity Research Summer Analyst".to_string(),
        location: Some("New York, NY".to_string()),
        deadline: add_days(&today_iso, DEADLINE_OFFSET_DAYS, today),
        created_on: today_iso,
        status: TrackingStatus::NotApplied,
        flagged: false,
        next_step_on: None,
    }
}

fn iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrate::{migrate, MigrationDefaults};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 15).expect("valid date")
    }

    #[test]
    fn seed_migrates_with_defaulted_deadline() {
        let defaults = MigrationDefaults::new(today()).with_deadlines(default_deadlines());
        let rows = migrate(&default_collection(today()), &defaults);
        assert_eq!(
            rows.iter().map(|row| row.id.as_str()).collect::<Vec<_>>(),
            vec!["gs-ib-sa", "ms-ib-sa", EQUITY_RESEARCH_ROW_ID]
        );
        assert_eq!(rows[1].created_on, "2026-01-08");
        assert_eq!(rows[1].status, TrackingStatus::Phone);
        assert_eq!(rows[2].deadline, "2026-02-05");
    }

    #[test]
    fn backfill_row_deadline_is_three_weeks_out() {
        let row = equity_research_row(today());
        assert_eq!(row.created_on, "2026-01-15");
        assert_eq!(row.deadline, "2026-02-05");
    }
}
