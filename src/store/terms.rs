use std::path::PathBuf;

use chrono::Utc;
use serde_json::Value;

use super::json_store::{JsonStore, LoadOutcome, StoreError};
use super::migrate::migrate_terms;
use super::models::TermRecord;

/// The terms collection: a [`JsonStore`] that modernizes legacy-shaped
/// records on every load.
pub struct TermStore {
    store: JsonStore,
}

impl TermStore {
    pub fn open(
        path: impl Into<PathBuf>,
        backups_dir: impl Into<PathBuf>,
        max_backups: usize,
    ) -> Result<Self, StoreError> {
        Ok(Self {
            store: JsonStore::open(path, backups_dir, max_backups)?,
        })
    }

    pub fn load(&self) -> Vec<TermRecord> {
        self.load_outcome().into_records()
    }

    /// Load and migrate the collection. If migration altered any record the
    /// migrated form is persisted back eagerly, best-effort: a write failure
    /// here is logged and swallowed so the caller still sees the data.
    pub fn load_outcome(&self) -> LoadOutcome<TermRecord> {
        let raw: Vec<Value> = match self.store.load_outcome() {
            LoadOutcome::Loaded(raw) => raw,
            LoadOutcome::Missing => return LoadOutcome::Missing,
            LoadOutcome::Corrupt => return LoadOutcome::Corrupt,
        };

        let result = match migrate_terms(&raw, Utc::now()) {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(
                    path = %self.store.path().display(),
                    error = %e,
                    "Terms collection contains uninterpretable records"
                );
                return LoadOutcome::Corrupt;
            }
        };

        if result.changed {
            self.persist_migrated(&result.records);
        }
        LoadOutcome::Loaded(result.records)
    }

    pub fn save(&self, records: &[TermRecord]) -> Result<(), StoreError> {
        self.store.save(records)
    }

    fn persist_migrated(&self, records: &[TermRecord]) {
        let persisted = serde_json::to_string_pretty(records)
            .map_err(StoreError::from)
            .and_then(|json| self.store.write_atomic(&json));
        if let Err(e) = persisted {
            tracing::warn!(
                path = %self.store.path().display(),
                error = %e,
                "Failed to persist migrated terms"
            );
        }
    }
}
