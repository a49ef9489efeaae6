use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<tempfile::PersistError> for StoreError {
    fn from(e: tempfile::PersistError) -> Self {
        // Dropping e.file removes the temporary file.
        StoreError::Io(e.error)
    }
}

/// Result of loading a collection, distinguishing the two empty cases.
///
/// Both `Missing` and `Corrupt` present as an empty collection through
/// [`LoadOutcome::into_records`]; neither is surfaced as a hard failure.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome<T> {
    /// The backing file existed and parsed as a record array.
    Loaded(Vec<T>),
    /// The backing file has not been created yet.
    Missing,
    /// The backing file exists but could not be read or parsed.
    Corrupt,
}

impl<T> LoadOutcome<T> {
    pub fn into_records(self) -> Vec<T> {
        match self {
            LoadOutcome::Loaded(records) => records,
            LoadOutcome::Missing | LoadOutcome::Corrupt => Vec::new(),
        }
    }
}

/// A named collection of records persisted as a single JSON array file.
///
/// Every save rewrites the whole file: a timestamped backup of the previous
/// contents first (best-effort), then a write-to-temp-and-rename so a reader
/// never observes a half-written file. Collections are assumed small enough
/// for full-file read/write on every operation.
pub struct JsonStore {
    path: PathBuf,
    backups_dir: PathBuf,
    max_backups: usize,
}

impl JsonStore {
    /// Open a store over the given backing file, creating its parent
    /// directory if needed. The file itself is created on first save.
    pub fn open(
        path: impl Into<PathBuf>,
        backups_dir: impl Into<PathBuf>,
        max_backups: usize,
    ) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(Self {
            path,
            backups_dir: backups_dir.into(),
            max_backups,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the collection, reporting an empty sequence when the file is
    /// missing or unreadable. See [`LoadOutcome`] for the distinction.
    pub fn load<T: DeserializeOwned>(&self) -> Vec<T> {
        self.load_outcome().into_records()
    }

    pub fn load_outcome<T: DeserializeOwned>(&self) -> LoadOutcome<T> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return LoadOutcome::Missing,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to read collection");
                return LoadOutcome::Corrupt;
            }
        };

        // An empty or whitespace-only file is an empty collection.
        if text.trim().is_empty() {
            return LoadOutcome::Loaded(Vec::new());
        }

        match serde_json::from_str(&text) {
            Ok(records) => LoadOutcome::Loaded(records),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to parse collection");
                LoadOutcome::Corrupt
            }
        }
    }

    /// Replace the collection wholesale. Backs up the current file, then
    /// atomically writes the new contents. A backup failure never blocks the
    /// write; a write failure is surfaced to the caller.
    pub fn save<T: Serialize>(&self, records: &[T]) -> Result<(), StoreError> {
        self.backup();
        let json = serde_json::to_string_pretty(records)?;
        self.write_atomic(&json)
    }

    /// Write content to a temporary file in the target's directory, then
    /// rename over the target. The same-directory temp guarantees the rename
    /// is a same-filesystem atomic replace. On failure the temporary file is
    /// removed and the error returned.
    pub(crate) fn write_atomic(&self, content: &str) -> Result<(), StoreError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.persist(&self.path)?;
        Ok(())
    }

    /// Copy the current file into the backup directory under a timestamped
    /// name, then prune the oldest backups beyond the retention cap.
    /// Failures are logged and swallowed.
    fn backup(&self) {
        if !self.path.exists() {
            return;
        }
        if let Err(e) = self.try_backup() {
            tracing::warn!(path = %self.path.display(), error = %e, "Backup failed");
        }
    }

    fn try_backup(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.backups_dir)?;

        let stem = self
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let suffix = self
            .path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();

        let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
        let backup_name = format!("{stem}_{timestamp}{suffix}");
        fs::copy(&self.path, self.backups_dir.join(&backup_name))?;

        // The timestamp format sorts chronologically, so sorting by name
        // puts the oldest backups first.
        let prefix = format!("{stem}_");
        let mut backups: Vec<PathBuf> = fs::read_dir(&self.backups_dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|p| {
                p.file_name()
                    .map(|n| {
                        let name = n.to_string_lossy();
                        name.starts_with(&prefix) && name.ends_with(&suffix)
                    })
                    .unwrap_or(false)
            })
            .collect();
        backups.sort();

        if backups.len() > self.max_backups {
            let excess = backups.len() - self.max_backups;
            for old in &backups[..excess] {
                if let Err(e) = fs::remove_file(old) {
                    tracing::warn!(path = %old.display(), error = %e, "Failed to prune backup");
                }
            }
        }
        Ok(())
    }
}
