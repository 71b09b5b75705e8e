use crate::backend::KeyValueStore;
use crate::collection::{ensure_seed_row, update};
use crate::migrate::{self, MigrationDefaults, RawRecord};
use crate::seed;
use crate::StorageError;
use chrono::NaiveDate;
use rolodex_core::{OpportunityPatch, TrackedOpportunity, TrackingStatus};
use std::collections::BTreeMap;
use tracing::{debug, warn};

pub const DEFAULT_STORAGE_KEY: &str = "applicationTracker";

/// Bridges the tracker collection to durable storage.
///
/// Reads never fail: missing, unreadable or malformed content falls back to
/// the seed collection. Writes are best effort: a failed write is logged and
/// the caller keeps its in-memory collection.
pub struct TrackerStore<S> {
    backend: S,
    key: String,
    defaults: MigrationDefaults,
    seed: Vec<RawRecord>,
    backfill: Vec<TrackedOpportunity>,
}

impl<S: KeyValueStore> TrackerStore<S> {
    pub fn new(backend: S, today: NaiveDate) -> Self {
        Self {
            backend,
            key: DEFAULT_STORAGE_KEY.to_string(),
            defaults: MigrationDefaults::new(today).with_deadlines(seed::default_deadlines()),
            seed: seed::default_collection(today),
            backfill: vec![seed::equity_research_row(today)],
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Adds or overrides entries in the per-name deadline table.
    pub fn with_default_deadlines(mut self, deadlines: BTreeMap<String, String>) -> Self {
        self.defaults.deadlines.extend(deadlines);
        self
    }

    pub fn with_seed(mut self, seed: Vec<RawRecord>) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_backfill(mut self, backfill: Vec<TrackedOpportunity>) -> Self {
        self.backfill = backfill;
        self
    }

    pub fn backfill_rows(&self) -> &[TrackedOpportunity] {
        &self.backfill
    }

    pub fn load(&self) -> Vec<TrackedOpportunity> {
        let raw = match self.backend.get(&self.key) {
            Ok(Some(content)) => match migrate::raw_records_from_json(&content) {
                Ok(raw) => raw,
                Err(err) => {
                    warn!(event = "tracker_malformed", key = %self.key, error = %err);
                    self.seed.clone()
                }
            },
            Ok(None) => {
                debug!(event = "tracker_seeded", key = %self.key);
                self.seed.clone()
            }
            Err(err) => {
                warn!(event = "tracker_read_failed", key = %self.key, error = %err);
                self.seed.clone()
            }
        };
        let rows = self.migrate(&raw);
        debug!(event = "tracker_loaded", key = %self.key, rows = rows.len());
        rows
    }

    pub fn migrate(&self, raw: &[RawRecord]) -> Vec<TrackedOpportunity> {
        migrate::migrate(raw, &self.defaults)
    }

    /// Writes the full collection, replacing whatever was stored. Failures
    /// are logged and otherwise ignored.
    pub fn persist(&self, collection: &[TrackedOpportunity]) {
        if let Err(err) = self.try_persist(collection) {
            warn!(event = "tracker_persist_failed", key = %self.key, error = %err);
        }
    }

    pub fn try_persist(&self, collection: &[TrackedOpportunity]) -> Result<(), StorageError> {
        let payload = serde_json::to_string(collection)?;
        self.backend.set(&self.key, &payload)
    }

    pub fn clear(&self) {
        if let Err(err) = self.backend.remove(&self.key) {
            warn!(event = "tracker_clear_failed", key = %self.key, error = %err);
        }
    }
}

/// One session over the tracker: owns the authoritative collection and
/// writes it back after every edit.
pub struct Tracker<S> {
    store: TrackerStore<S>,
    rows: Vec<TrackedOpportunity>,
}

impl<S: KeyValueStore> Tracker<S> {
    /// Loads, backfills newly introduced seed rows, and re-persists so the
    /// next session reads already-migrated content.
    pub fn start(store: TrackerStore<S>) -> Self {
        let rows = Self::bootstrap(&store);
        Self { store, rows }
    }

    fn bootstrap(store: &TrackerStore<S>) -> Vec<TrackedOpportunity> {
        let rows = store
            .backfill_rows()
            .iter()
            .fold(store.load(), |rows, seed_row| ensure_seed_row(rows, seed_row));
        store.persist(&rows);
        rows
    }

    pub fn rows(&self) -> &[TrackedOpportunity] {
        &self.rows
    }

    pub fn get(&self, id: &str) -> Option<&TrackedOpportunity> {
        self.rows.iter().find(|row| row.id == id)
    }

    pub fn store(&self) -> &TrackerStore<S> {
        &self.store
    }

    /// Merges `patch` into the row with `id`. Returns false, leaving the
    /// collection untouched, when no row has that id.
    pub fn apply(&mut self, id: &str, patch: &OpportunityPatch) -> bool {
        if self.get(id).is_none() {
            debug!(event = "tracker_update_unknown_id", id);
            return false;
        }
        self.rows = update(&self.rows, id, patch);
        self.store.persist(&self.rows);
        true
    }

    pub fn set_status(&mut self, id: &str, status: TrackingStatus) -> bool {
        self.apply(id, &OpportunityPatch::status(status))
    }

    /// Drops the stored collection and starts over from the seed.
    pub fn reset(&mut self) {
        self.store.clear();
        self.rows = Self::bootstrap(&self.store);
    }

    pub fn into_rows(self) -> Vec<TrackedOpportunity> {
        self.rows
    }
}
