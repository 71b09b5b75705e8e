//! Normalizes whatever shape a stored tracker row has into the current
//! [`TrackedOpportunity`] schema.
//!
//! Extraction is total: every field has its own default, unknown keys are
//! dropped, and no input can make migration fail. Running it over its own
//! output is a no-op because every default it fills in is written back.

use chrono::{Duration, NaiveDate};
use rolodex_core::{parse_iso_date, TrackedOpportunity, TrackingStatus};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use uuid::Uuid;

pub type RawRecord = Map<String, Value>;

pub const DEADLINE_OFFSET_DAYS: i64 = 21;

const ID_KEYS: &[&str] = &["id"];
const NAME_KEYS: &[&str] = &["name", "company"];
const LABEL_KEYS: &[&str] = &["label", "role"];
const LOCATION_KEYS: &[&str] = &["location"];
const CREATED_ON_KEYS: &[&str] = &["createdOn", "appliedOn"];
// The current field wins when a row carries both.
const STATUS_KEYS: &[&str] = &["status", "tracking"];
const FLAGGED_KEYS: &[&str] = &["flagged", "priority"];
const DEADLINE_KEYS: &[&str] = &["deadline"];
const NEXT_STEP_KEYS: &[&str] = &["nextStepOn", "nextStepDate"];

#[derive(Debug, Clone)]
pub struct MigrationDefaults {
    pub today: NaiveDate,
    /// Deadline to use for a row without one, keyed by organization name.
    pub deadlines: BTreeMap<String, String>,
}

impl MigrationDefaults {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            deadlines: BTreeMap::new(),
        }
    }

    pub fn with_deadlines(mut self, deadlines: BTreeMap<String, String>) -> Self {
        self.deadlines = deadlines;
        self
    }

    fn today_iso(&self) -> String {
        iso(self.today)
    }
}

pub fn migrate(raw: &[RawRecord], defaults: &MigrationDefaults) -> Vec<TrackedOpportunity> {
    raw.iter()
        .map(|record| migrate_record(record, defaults))
        .collect()
}

pub fn migrate_record(raw: &RawRecord, defaults: &MigrationDefaults) -> TrackedOpportunity {
    let id = non_empty_text(raw, ID_KEYS).unwrap_or_else(|| Uuid::new_v4().to_string());
    let name = text(raw, NAME_KEYS).unwrap_or_default();
    let label = text(raw, LABEL_KEYS).unwrap_or_default();
    let created_on = text(raw, CREATED_ON_KEYS).unwrap_or_else(|| defaults.today_iso());
    let status = text(raw, STATUS_KEYS)
        .map(|value| TrackingStatus::from_legacy(&value))
        .unwrap_or_default();
    let flagged = first_present(raw, FLAGGED_KEYS).map_or(false, truthy);
    let deadline = non_empty_text(raw, DEADLINE_KEYS)
        .or_else(|| defaults.deadlines.get(&name).cloned())
        .unwrap_or_else(|| add_days(&created_on, DEADLINE_OFFSET_DAYS, defaults.today));

    TrackedOpportunity {
        id,
        location: non_empty_text(raw, LOCATION_KEYS),
        next_step_on: non_empty_text(raw, NEXT_STEP_KEYS),
        name,
        label,
        created_on,
        status,
        flagged,
        deadline,
    }
}

/// Parses stored content as a list of raw records. Elements that are not
/// objects become empty records so they still migrate to a (defaulted) row.
pub fn raw_records_from_json(content: &str) -> Result<Vec<RawRecord>, serde_json::Error> {
    let items: Vec<Value> = serde_json::from_str(content)?;
    Ok(items
        .into_iter()
        .map(|item| match item {
            Value::Object(map) => map,
            _ => RawRecord::new(),
        })
        .collect())
}

pub fn to_raw_records(collection: &[TrackedOpportunity]) -> Vec<RawRecord> {
    collection
        .iter()
        .filter_map(|row| match serde_json::to_value(row) {
            Ok(Value::Object(map)) => Some(map),
            _ => None,
        })
        .collect()
}

/// `date + days`, falling back to `today + days` when `date` does not parse.
pub fn add_days(date: &str, days: i64, today: NaiveDate) -> String {
    let base = parse_iso_date(date).unwrap_or(today);
    iso(base + Duration::days(days))
}

fn iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn first_present<'a>(raw: &'a RawRecord, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| raw.get(*key))
        .find(|value| !value.is_null())
}

fn text(raw: &RawRecord, keys: &[&str]) -> Option<String> {
    first_present(raw, keys).and_then(scalar_text)
}

fn non_empty_text(raw: &RawRecord, keys: &[&str]) -> Option<String> {
    text(raw, keys).filter(|value| !value.trim().is_empty())
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(false, |f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
