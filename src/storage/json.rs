//! JSON file-based session storage.
//!
//! This module provides a small, human-readable storage implementation using
//! JSON serialization. It uses atomic file writes (write-to-temp + rename) so the
//! session file is never left half-written.

use crate::domain::error::{MyflixError, Result};
use crate::storage::backend::SessionStorage;
use crate::storage::models::{SessionRecord, Slot};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// JSON storage container format.
///
/// Top-level structure serialized to disk. The version allows later migrations.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StorageData {
    version: u32,

    #[serde(default)]
    session: SessionRecord,
}

impl Default for StorageData {
    fn default() -> Self {
        Self {
            version: 1,
            session: SessionRecord::default(),
        }
    }
}

/// JSON file storage backend.
///
/// The record is kept in memory and persisted on every modification.
///
/// # File Format
///
/// ```json
/// {
///   "version": 1,
///   "session": {
///     "token": "eyJhbGciOi...",
///     "user": "alice",
///     "updated_at": 1760000000
///   }
/// }
/// ```
#[derive(Debug)]
pub struct JsonStorage {
    file_path: PathBuf,
    data: StorageData,
    dirty: bool,
}

impl JsonStorage {
    /// Creates or opens a JSON storage file.
    ///
    /// Parent directories are created automatically. A file that exists but
    /// cannot be parsed is treated as empty, since a lost slot only means
    /// "logged out".
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created or the file
    /// exists but cannot be read.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use myflix::storage::JsonStorage;
    /// use std::path::PathBuf;
    ///
    /// let storage = JsonStorage::new(PathBuf::from("/tmp/myflix/session.json"))?;
    /// # Ok::<(), myflix::MyflixError>(())
    /// ```
    pub fn new(file_path: PathBuf) -> Result<Self> {
        tracing::debug!(path = ?file_path, "initializing JSON session storage");

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = if file_path.exists() {
            Self::load_from_file(&file_path)?
        } else {
            tracing::debug!("initializing new empty session storage");
            StorageData::default()
        };

        Ok(Self {
            file_path,
            data,
            dirty: false,
        })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn load_from_file(path: &Path) -> Result<StorageData> {
        let contents = std::fs::read_to_string(path)?;

        match serde_json::from_str::<StorageData>(&contents) {
            Ok(data) => {
                tracing::debug!(
                    version = data.version,
                    has_token = data.session.token.is_some(),
                    has_user = data.session.user.is_some(),
                    "loaded session data"
                );
                Ok(data)
            }
            Err(e) => {
                tracing::warn!(error = %e, "session file unreadable, starting logged out");
                Ok(StorageData::default())
            }
        }
    }

    /// Saves storage data to disk using atomic write.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization, the temporary write, or the rename fails.
    fn save_to_file(&mut self) -> Result<()> {
        if !self.dirty {
            tracing::trace!("skipping save, no changes");
            return Ok(());
        }

        let json = serde_json::to_string_pretty(&self.data)
            .map_err(|e| MyflixError::Storage(format!("failed to serialize JSON: {e}")))?;

        let tmp_path = self.file_path.with_extension("tmp");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.file_path)?;

        self.dirty = false;
        tracing::debug!(path = ?self.file_path, "session storage saved");
        Ok(())
    }
}

impl SessionStorage for JsonStorage {
    fn read(&self, slot: Slot) -> Result<Option<String>> {
        Ok(self.data.session.get(slot).map(str::to_string))
    }

    fn write(&mut self, slot: Slot, value: &str) -> Result<()> {
        let _span = tracing::debug_span!("json_write_slot", slot = slot.key()).entered();

        self.data.session.set(slot, Some(value.to_string()));
        self.dirty = true;
        self.save_to_file()
    }

    fn remove(&mut self, slot: Slot) -> Result<()> {
        let _span = tracing::debug_span!("json_remove_slot", slot = slot.key()).entered();

        if self.data.session.get(slot).is_none() {
            return Ok(());
        }
        self.data.session.set(slot, None);
        self.dirty = true;
        self.save_to_file()
    }
}

impl Drop for JsonStorage {
    fn drop(&mut self) {
        if self.dirty {
            tracing::debug!("saving dirty session data on drop");
            if let Err(e) = self.save_to_file() {
                tracing::error!(error = %e, "failed to save session on drop");
            }
        }
    }
}
