//! Durable occupancy record.
//!
//! Only the occupied count is data-of-record. It is stored as a single
//! JSON object (`{"occupied": 3}`) and every save replaces the whole
//! record. The gate state is deliberately not stored.
//!
//! Loading is self-healing: a missing record is created with a count of
//! zero, and a record that cannot be read or parsed is overwritten with
//! zero. Neither case is an error for the caller.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Errors that can occur when reading or writing the occupancy record.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The record exists but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// Path that was being read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The record could not be written or moved into place.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        /// Path that was being written.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The record content is not a valid occupancy object.
    #[error("malformed occupancy record: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Persistence seam for the occupied count.
///
/// Implementations are called with the facility lock held, so they are
/// never invoked concurrently by the facility.
pub trait OccupancyStore: Send + Sync {
    /// Return the persisted count, repairing the record to zero when it
    /// is missing or unreadable.
    fn load(&self) -> u32;

    /// Replace the persisted record with `occupied`.
    fn save(&self, occupied: u32) -> Result<(), StoreError>;
}

/// On-disk layout of the occupancy record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct OccupancyRecord {
    occupied: u32,
}

/// [`OccupancyStore`] backed by a single JSON file.
///
/// Saves write a sibling `<name>.tmp` file and rename it over the record,
/// so a reader never observes a partially written object.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Create a store for the record at `path`. Nothing is touched on disk
    /// until [`OccupancyStore::load`] or [`OccupancyStore::save`] is called.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing record.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn read_record(&self) -> Result<Option<OccupancyRecord>, StoreError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        let record = serde_json::from_str(&contents)?;
        Ok(Some(record))
    }

    fn reset(&self) {
        if let Err(e) = self.save(0) {
            warn!(error = %e, "Failed to initialize occupancy record, continuing in memory");
        }
    }
}

impl OccupancyStore for JsonFileStore {
    fn load(&self) -> u32 {
        match self.read_record() {
            Ok(Some(record)) => {
                info!(path = %self.path.display(), occupied = record.occupied, "Occupancy record loaded");
                record.occupied
            }
            Ok(None) => {
                info!(path = %self.path.display(), "No occupancy record found, starting at 0");
                self.reset();
                0
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Occupancy record unusable, resetting to 0");
                self.reset();
                0
            }
        }
    }

    fn save(&self, occupied: u32) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(&OccupancyRecord { occupied })?;
        let tmp = self.temp_path();

        std::fs::write(&tmp, json).map_err(|source| StoreError::Write {
            path: tmp.clone(),
            source,
        })?;
        std::fs::rename(&tmp, &self.path).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;

        Ok(())
    }
}
