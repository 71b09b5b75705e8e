use std::path::PathBuf;
use thiserror::Error;

pub mod backend;
pub mod collection;
pub mod migrate;
pub mod seed;
pub mod tracker;

pub use backend::{FileStore, KeyValueStore, MemoryStore};
pub use collection::{ensure_seed_row, update};
pub use migrate::{migrate, MigrationDefaults, RawRecord};
pub use tracker::{Tracker, TrackerStore, DEFAULT_STORAGE_KEY};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("invalid storage key {0:?}")]
    InvalidKey(String),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StorageError::Io {
            path: path.into(),
            source,
        }
    }
}
