//! History service: single entry point coordinating both backends.
//!
//! Owns the consistency policy between the relational store and the mirror
//! log. The store is written first and is the source of truth; a mirror
//! append only happens after a committed insert, and a mirror failure is
//! reported as a warning rather than rolled back.
//!
//! Mirror appends are serialized through a mutex because the log's
//! read-modify-write cycle would otherwise lose updates under concurrent
//! `record_exchange` calls from parallel request threads.

use super::mirror::MirrorLog;
use super::models::{EntrySummary, HistoryEntry, HistoryError};
use super::store::{HistoryStore, DEFAULT_BROWSE_LIMIT};
use crate::config::StorageConfig;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Presentation-layer notifications emitted by the history service.
///
/// All methods default to no-ops so listeners only implement what they
/// display. Listener callbacks run on the thread that performed the
/// operation.
pub trait HistoryListener: Send + Sync {
    /// A new entry was durably recorded.
    fn history_changed(&self) {}

    /// An import finished; `count` is the number of objects read from the
    /// file, which can exceed the number successfully stored.
    fn import_complete(&self, count: usize) {
        let _ = count;
    }

    /// An export finished with `count` entries written.
    fn export_complete(&self, count: usize) {
        let _ = count;
    }
}

/// Coordinates the relational store and the mirror log, and exposes the
/// history API to the rest of the tool.
pub struct HistoryService {
    store: HistoryStore,
    mirror: Mutex<MirrorLog>,
    listeners: Mutex<Vec<Arc<dyn HistoryListener>>>,
}

impl HistoryService {
    /// Opens both backends per the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the relational store cannot be opened. The mirror
    /// log file is only touched on the first write.
    pub fn new(config: &StorageConfig) -> Result<Self, HistoryError> {
        Ok(Self {
            store: HistoryStore::open(&config.db_path)?,
            mirror: Mutex::new(MirrorLog::new(&config.mirror_path)),
            listeners: Mutex::new(Vec::new()),
        })
    }

    /// Registers a presentation listener.
    pub fn add_listener(&self, listener: Arc<dyn HistoryListener>) {
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.push(listener);
        }
    }

    /// Direct access to the relational store (tests and tooling).
    pub fn store(&self) -> &HistoryStore {
        &self.store
    }

    /// Records a completed exchange in both backends.
    ///
    /// The relational store is written first. If that write fails the whole
    /// operation fails and the mirror log is left untouched. If the store
    /// write succeeds but the mirror append fails, the entry is still
    /// durably recorded: the failure is logged as a warning and the call
    /// reports success.
    ///
    /// # Returns
    ///
    /// The id the relational store assigned to the entry.
    ///
    /// # Errors
    ///
    /// Returns `HistoryError::Storage` if the relational store write fails.
    pub fn record_exchange(&self, entry: &HistoryEntry) -> Result<i64, HistoryError> {
        let id = self.store.insert(entry)?;

        // Hold the lock across the whole read-modify-write cycle.
        match self.mirror.lock() {
            Ok(mirror) => {
                if let Err(err) = mirror.append(entry) {
                    log::warn!("entry {} recorded but mirror append failed: {}", id, err);
                }
            }
            Err(poisoned) => {
                log::warn!(
                    "entry {} recorded but mirror lock was poisoned: {}",
                    id,
                    poisoned
                );
            }
        }

        self.notify(|l| l.history_changed());
        Ok(id)
    }

    /// Lists recent entries as summaries, most recent first.
    ///
    /// # Arguments
    ///
    /// * `limit` - Maximum number of summaries; see
    ///   [`DEFAULT_BROWSE_LIMIT`] for the conventional default.
    pub fn browse(&self, limit: usize) -> Result<Vec<EntrySummary>, HistoryError> {
        self.store.list_recent(limit)
    }

    /// Lists recent entries with the default limit.
    pub fn browse_recent(&self) -> Result<Vec<EntrySummary>, HistoryError> {
        self.store.list_recent(DEFAULT_BROWSE_LIMIT)
    }

    /// Fetches a full entry by id; `Ok(None)` when the id does not exist.
    pub fn fetch(&self, id: i64) -> Result<Option<HistoryEntry>, HistoryError> {
        self.store.get_by_id(id)
    }

    /// Imports entries from a JSON array file.
    ///
    /// Each imported object goes through [`record_exchange`], so imported
    /// entries land in both backends and receive fresh ids.
    ///
    /// The returned count is the number of objects read from the file, not
    /// the number successfully stored: an object that fails entry
    /// deserialization or storage is logged and skipped without affecting
    /// the count. Callers that need the distinction must compare against
    /// the store's row count.
    ///
    /// # Errors
    ///
    /// Returns `HistoryError::Import` if the file cannot be read or its
    /// top-level JSON is not an array. Nothing is recorded in that case.
    ///
    /// [`record_exchange`]: HistoryService::record_exchange
    pub fn import_from(&self, path: impl AsRef<Path>) -> Result<usize, HistoryError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .map_err(|err| HistoryError::Import(format!("read {}: {}", path.display(), err)))?;
        let objects: Vec<serde_json::Value> = serde_json::from_str(&raw)
            .map_err(|err| HistoryError::Import(format!("parse {}: {}", path.display(), err)))?;

        // Only the top level is all-or-nothing; each object stands alone.
        let count = objects.len();
        for (index, object) in objects.into_iter().enumerate() {
            let entry = match serde_json::from_value::<HistoryEntry>(object) {
                Ok(entry) => entry,
                Err(err) => {
                    log::warn!(
                        "skipping malformed import entry {} from {}: {}",
                        index,
                        path.display(),
                        err
                    );
                    continue;
                }
            };
            if let Err(err) = self.record_exchange(&entry) {
                log::warn!("skipping import entry {} from {}: {}", index, path.display(), err);
            }
        }

        self.notify(|l| l.import_complete(count));
        Ok(count)
    }

    /// Exports the full history to a JSON array file.
    ///
    /// The array is written to a temporary file in the destination directory
    /// and renamed into place, so a failed export never truncates an
    /// existing file at the destination.
    ///
    /// # Returns
    ///
    /// The number of entries exported.
    ///
    /// # Errors
    ///
    /// Returns `HistoryError::Export` on any read, serialization, or write
    /// failure. Existing history is never modified by an export.
    pub fn export_to(&self, path: impl AsRef<Path>) -> Result<usize, HistoryError> {
        let path = path.as_ref();
        let entries = self
            .store
            .list_all()
            .map_err(|err| HistoryError::Export(format!("read history: {}", err)))?;
        let json = serde_json::to_string_pretty(&entries)
            .map_err(|err| HistoryError::Export(format!("serialize history: {}", err)))?;

        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, json)
            .map_err(|err| HistoryError::Export(format!("write {}: {}", tmp_path.display(), err)))?;
        fs::rename(&tmp_path, path)
            .map_err(|err| HistoryError::Export(format!("replace {}: {}", path.display(), err)))?;

        let count = entries.len();
        self.notify(|l| l.export_complete(count));
        Ok(count)
    }

    fn notify(&self, f: impl Fn(&dyn HistoryListener)) {
        if let Ok(listeners) = self.listeners.lock() {
            for listener in listeners.iter() {
                f(listener.as_ref());
            }
        }
    }
}
