//! Storage layer for punch.
//!
//! Persists the timesheet as a single JSON array in the file named by the
//! `data_file` setting. Each element is an object with optional `start` and
//! `end` (integer epoch seconds) and `message` keys, in creation order.
//!
//! # Atomic Saves
//!
//! Every save rewrites the whole file. The new content is written to a
//! temporary file in the same directory, synced, and renamed over the old
//! file, so readers only ever see the old or the new timesheet. If anything
//! fails before the rename, the temporary file is removed when it is dropped.
//!
//! # Locking
//!
//! [`JsonStore::lock`] takes an advisory exclusive lock on a sibling
//! `<data_file>.lock` file. Holding it across load and save keeps two
//! overlapping invocations from interleaving.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use punch_core::{EntryStore, Timesheet, TimesheetError};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The data file exists but could not be read.
    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The data file is not a JSON array of entries.
    #[error("failed to parse {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// The data file parsed but breaks a timesheet invariant.
    #[error("invalid timesheet in {path}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: TimesheetError,
    },
    /// Writing the temporary file failed.
    #[error("failed to write {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Renaming the temporary file over the data file failed.
    #[error("failed to replace {path}")]
    Persist {
        path: PathBuf,
        #[source]
        source: tempfile::PersistError,
    },
    /// The lock file could not be created or locked.
    #[error("failed to lock {path}")]
    Lock {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A timesheet stored as a JSON file.
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

/// Exclusive lock on a store, released on drop.
#[derive(Debug)]
pub struct StoreLock {
    file: File,
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            tracing::warn!(error = %e, "failed to release store lock");
        }
    }
}

impl JsonStore {
    /// Creates a store backed by the file at `path`. Nothing is read until [`load`](EntryStore::load).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the sibling lock file.
    pub fn lock_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".lock");
        self.path.with_file_name(name)
    }

    /// Blocks until an exclusive lock on the store is held.
    pub fn lock(&self) -> Result<StoreLock, StoreError> {
        let path = self.lock_path();
        let lock_err = |source| StoreError::Lock {
            path: path.clone(),
            source,
        };
        if let Some(parent) = non_empty_parent(&path) {
            fs::create_dir_all(parent).map_err(lock_err)?;
        }
        let file = File::create(&path).map_err(lock_err)?;
        file.lock_exclusive().map_err(lock_err)?;
        tracing::debug!(path = %path.display(), "acquired store lock");
        Ok(StoreLock { file })
    }

    fn write_err(&self, source: std::io::Error) -> StoreError {
        StoreError::Write {
            path: self.path.clone(),
            source,
        }
    }
}

impl EntryStore for JsonStore {
    type Error = StoreError;

    fn load(&self) -> Result<Timesheet, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no data file yet, starting empty");
                return Ok(Timesheet::new());
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        // A pre-created empty data file holds no entries.
        if content.trim().is_empty() {
            return Ok(Timesheet::new());
        }

        let timesheet: Timesheet =
            serde_json::from_str(&content).map_err(|source| StoreError::Parse {
                path: self.path.clone(),
                source,
            })?;
        timesheet.validate().map_err(|source| StoreError::Invalid {
            path: self.path.clone(),
            source,
        })?;

        tracing::debug!(path = %self.path.display(), entries = timesheet.len(), "loaded timesheet");
        Ok(timesheet)
    }

    fn save(&self, timesheet: &Timesheet) -> Result<(), StoreError> {
        let dir = non_empty_parent(&self.path).unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir).map_err(|e| self.write_err(e))?;

        let temp = NamedTempFile::new_in(dir).map_err(|e| self.write_err(e))?;
        {
            let mut writer = BufWriter::new(temp.as_file());
            serde_json::to_writer(&mut writer, timesheet)
                .map_err(|e| self.write_err(e.into()))?;
            writer.flush().map_err(|e| self.write_err(e))?;
        }
        temp.as_file().sync_all().map_err(|e| self.write_err(e))?;

        temp.persist(&self.path)
            .map_err(|source| StoreError::Persist {
                path: self.path.clone(),
                source,
            })?;

        tracing::debug!(path = %self.path.display(), entries = timesheet.len(), "saved timesheet");
        Ok(())
    }
}

/// The parent directory, or `None` for bare file names.
fn non_empty_parent(path: &Path) -> Option<&Path> {
    path.parent().filter(|p| !p.as_os_str().is_empty())
}
