//! Durable project store
//!
//! One JSON object per registry file, keyed by project name. Every
//! mutation runs load-modify-write under an exclusive file lock, and the
//! write goes to a temp file renamed over the original so no partial
//! write is ever observable.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs4::fs_std::FileExt;
use tracing::debug;

use crate::error::{Error, Result};
use crate::types::{LifecycleState, ProjectRecord, RecordedFailure, ResourceHandles};

/// Handle to a registry file
#[derive(Debug, Clone)]
pub struct ProjectStore {
    path: PathBuf,
}

type Records = BTreeMap<String, ProjectRecord>;

impl ProjectStore {
    /// Open a store at the given path; the file is created on first write
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Register a new project
    ///
    /// Fails with `DuplicateProject` if a record already exists under the
    /// name, whatever its lifecycle state; a half-deleted project must be
    /// cleaned up before its name is reused.
    pub fn register(
        &self,
        name: &str,
        stack: &str,
        handles: ResourceHandles,
    ) -> Result<ProjectRecord> {
        self.mutate(|records| {
            if records.contains_key(name) {
                return Err(Error::duplicate(name));
            }
            let record = ProjectRecord::new(name, stack, handles);
            records.insert(name.to_string(), record.clone());
            Ok(record)
        })
    }

    /// Find records whose name contains the pattern (ACTIVE and DELETING)
    ///
    /// An empty pattern matches everything, which is how verb-only
    /// commands ("deploy", "delete project") enumerate their candidates.
    pub fn find(&self, name_pattern: &str) -> Result<Vec<ProjectRecord>> {
        let records = self.load()?;
        Ok(records
            .into_values()
            .filter(|r| r.name.contains(name_pattern))
            .collect())
    }

    /// Get a single record by exact name
    pub fn get(&self, name: &str) -> Result<Option<ProjectRecord>> {
        Ok(self.load()?.remove(name))
    }

    /// List every record
    pub fn list(&self) -> Result<Vec<ProjectRecord>> {
        Ok(self.load()?.into_values().collect())
    }

    /// Apply a mutation to an ACTIVE record
    ///
    /// Fails with `NotFound` if no ACTIVE record matches. The mutation
    /// closure receives the record; `updated_at` is touched afterwards.
    pub fn update<F>(&self, name: &str, mutation: F) -> Result<ProjectRecord>
    where
        F: FnOnce(&mut ProjectRecord),
    {
        self.mutate(|records| {
            let record = records
                .get_mut(name)
                .filter(|r| r.state == LifecycleState::Active)
                .ok_or_else(|| Error::not_found(name))?;
            mutation(record);
            record.updated_at = chrono::Utc::now();
            Ok(record.clone())
        })
    }

    /// Append handles to a record (never overwrites existing handles)
    pub fn append_handles(&self, name: &str, handles: &ResourceHandles) -> Result<ProjectRecord> {
        self.update(name, |record| record.handles.merge(handles))
    }

    /// Transition a record to DELETING ahead of a delete dispatch
    pub fn mark_deleting(&self, name: &str) -> Result<()> {
        self.mutate(|records| {
            let record = records.get_mut(name).ok_or_else(|| Error::not_found(name))?;
            record.state = LifecycleState::Deleting;
            record.updated_at = chrono::Utc::now();
            Ok(())
        })
    }

    /// Remove a record entirely (successful delete)
    pub fn remove(&self, name: &str) -> Result<()> {
        self.mutate(|records| {
            records.remove(name).ok_or_else(|| Error::not_found(name))?;
            Ok(())
        })
    }

    /// Record a handler failure and return the record to ACTIVE for retry
    pub fn mark_failed(&self, name: &str, reason: &str) -> Result<()> {
        self.mutate(|records| {
            let record = records.get_mut(name).ok_or_else(|| Error::not_found(name))?;
            record.state = LifecycleState::Active;
            record.last_failure = Some(RecordedFailure {
                message: reason.to_string(),
                at: chrono::Utc::now(),
            });
            record.in_flight = None;
            record.updated_at = chrono::Utc::now();
            Ok(())
        })
    }

    /// Persist the in-flight marker before a mutating handler runs
    ///
    /// A record loaded with the marker still set was interrupted
    /// mid-transition and must not be treated as cleanly ACTIVE.
    pub fn begin_action(&self, name: &str, action: &str) -> Result<()> {
        self.mutate(|records| {
            let record = records.get_mut(name).ok_or_else(|| Error::not_found(name))?;
            record.in_flight = Some(action.to_string());
            Ok(())
        })
    }

    /// Clear the in-flight marker once the dispatcher has finished
    pub fn finish_action(&self, name: &str) -> Result<()> {
        self.mutate(|records| {
            if let Some(record) = records.get_mut(name) {
                record.in_flight = None;
            }
            Ok(())
        })
    }

    // ------------------------------------------------------------------
    // persistence
    // ------------------------------------------------------------------

    /// Read all records; a missing file is an empty registry
    fn load(&self) -> Result<Records> {
        if !self.path.exists() {
            return Ok(Records::new());
        }

        let contents = fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(Records::new());
        }

        serde_json::from_str(&contents)
            .map_err(|e| Error::corrupt(self.path.display().to_string(), e.to_string()))
    }

    /// Load-modify-write under an exclusive lock
    fn mutate<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Records) -> Result<T>,
    {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        // The lock lives on a sibling file so the registry itself can be
        // atomically replaced while the lock is held.
        let lock_path = self.path.with_extension("lock");
        let lock_file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)?;
        lock_file.lock_exclusive().map_err(Error::Lock)?;

        let result = (|| {
            let mut records = self.load()?;
            let value = f(&mut records)?;
            self.write_atomic(&records)?;
            Ok(value)
        })();

        // Lock released on drop; an unlock error is not worth surfacing
        let _ = FileExt::unlock(&lock_file);
        result
    }

    /// Serialize to a temp file and rename it over the registry
    fn write_atomic(&self, records: &Records) -> Result<()> {
        let temp_path = self.path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(records)
            .map_err(|e| Error::corrupt(self.path.display().to_string(), e.to_string()))?;

        let mut temp_file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&temp_path)?;
        temp_file.write_all(json.as_bytes())?;
        temp_file.sync_all()?;
        drop(temp_file);

        fs::rename(&temp_path, &self.path)?;
        debug!(path = %self.path.display(), count = records.len(), "registry written");
        Ok(())
    }
}
