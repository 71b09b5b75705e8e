use chrono::NaiveDate;
use rolodex_core::TrackingStatus;
use rolodex_storage::{
    FileStore, KeyValueStore, Tracker, TrackerStore, DEFAULT_STORAGE_KEY,
};
use serde_json::Value;
use tempfile::TempDir;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

#[test]
fn edits_survive_across_sessions_on_disk() {
    let dir = TempDir::new().expect("temp dir");

    let mut first = Tracker::start(TrackerStore::new(FileStore::new(dir.path()), day(2026, 5, 1)));
    assert!(first.set_status("gs-ib-sa", TrackingStatus::Phone));
    let first_rows = first.into_rows();

    // A later session on another day must not re-derive stored dates.
    let second = Tracker::start(TrackerStore::new(FileStore::new(dir.path()), day(2026, 6, 9)));
    assert_eq!(second.rows(), first_rows.as_slice());
    assert_eq!(second.rows()[0].status, TrackingStatus::Phone);
}

#[test]
fn legacy_site_content_is_migrated_and_rewritten() {
    let dir = TempDir::new().expect("temp dir");
    let backend = FileStore::new(dir.path());
    let legacy = r#"[
        {"id":"gs-ib-sa","company":"Goldman Sachs","role":"IB SA","appliedOn":"2025-07-01","status":"Applied","priority":true},
        {"id":"ms-ib-sa","company":"Morgan Stanley","role":"IB SA","appliedOn":"2025-07-02","tracking":"Superday","priority":false,"deadline":"2025-08-25","nextStepDate":"2025-08-10"},
        {"company":"Evercore","role":"M&A SA","appliedOn":"2025-07-03"}
    ]"#;
    backend.set(DEFAULT_STORAGE_KEY, legacy).expect("seed legacy content");

    let tracker = Tracker::start(TrackerStore::new(&backend, day(2026, 5, 1)));
    let rows = tracker.rows();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0].status, TrackingStatus::NotApplied);
    assert_eq!(rows[0].deadline, "2025-09-01");
    assert!(rows[0].flagged);
    assert_eq!(rows[1].status, TrackingStatus::Superday);
    assert_eq!(rows[1].next_step_on.as_deref(), Some("2025-08-10"));
    assert_eq!(rows[2].deadline, "2025-07-24");
    assert_eq!(rows[3].id, "jpm-er-sa");

    let stored = backend
        .get(DEFAULT_STORAGE_KEY)
        .expect("read back")
        .expect("content present");
    let stored: Value = serde_json::from_str(&stored).expect("stored json");
    let first = &stored[0];
    assert_eq!(first["name"], "Goldman Sachs");
    assert!(first.get("company").is_none());
    assert_eq!(stored[2]["id"], Value::String(rows[2].id.clone()));
}

#[test]
fn load_never_fails_on_arbitrary_content() {
    let samples = [
        "",
        "null",
        "[]",
        "[{}]",
        "[[], \"x\", 1.5, true, null]",
        "[{\"id\": {\"nested\": 1}, \"status\": [\"Phone\"], \"flagged\": \"\"}]",
        "{\"tasks\": []}",
        "\u{0}\u{1}",
    ];
    for content in samples {
        let dir = TempDir::new().expect("temp dir");
        let backend = FileStore::new(dir.path());
        backend.set(DEFAULT_STORAGE_KEY, content).expect("write sample");
        let rows = TrackerStore::new(&backend, day(2026, 5, 1)).load();
        for row in &rows {
            assert!(!row.id.is_empty(), "content {content:?}");
            assert!(!row.created_on.is_empty(), "content {content:?}");
            assert!(!row.deadline.is_empty(), "content {content:?}");
        }
    }
}
