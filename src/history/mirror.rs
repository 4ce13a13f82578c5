//! Mirror log: a redundant flat-file copy of the history.
//!
//! The log is a single pretty-printed JSON array of entries without ids,
//! which doubles as the export format and as a human-readable recovery
//! source. Appending is a read-modify-write of the whole array; the cost is
//! O(total entries) per write, which is acceptable for a manual testing tool.
//!
//! Callers that can race must serialize appends externally (the history
//! service holds a mutex around this type), otherwise two concurrent
//! rewrites can lose an update.

use super::models::{HistoryEntry, HistoryError};
use std::fs;
use std::path::{Path, PathBuf};

/// Append-oriented flat-file record of all history entries.
#[derive(Debug, Clone)]
pub struct MirrorLog {
    path: PathBuf,
}

impl MirrorLog {
    /// Creates a mirror log handle for the given path.
    ///
    /// The file is not created until the first append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path to the underlying log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends an entry by rewriting the whole log.
    ///
    /// The current content is loaded first; an absent or corrupt file is
    /// treated as an empty log, never as a fatal error, so one bad write can
    /// never wedge the mirror permanently. The rewrite goes through a
    /// temporary file followed by a rename.
    ///
    /// # Errors
    ///
    /// Returns `HistoryError::MirrorWrite` if the rewritten log cannot be
    /// serialized or written.
    pub fn append(&self, entry: &HistoryEntry) -> Result<(), HistoryError> {
        let mut entries = self.read_entries();
        entries.push(entry.clone());
        self.rewrite(&entries)
    }

    /// Loads the current log content.
    ///
    /// # Returns
    ///
    /// All entries in the log, or an empty vector if the file is absent or
    /// its content cannot be parsed (a warning is logged for corrupt
    /// content).
    pub fn read_entries(&self) -> Vec<HistoryEntry> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(_) => return Vec::new(),
        };

        match serde_json::from_str::<Vec<HistoryEntry>>(&raw) {
            Ok(entries) => entries,
            Err(err) => {
                log::warn!(
                    "mirror log {} is unreadable, treating as empty: {}",
                    self.path.display(),
                    err
                );
                Vec::new()
            }
        }
    }

    fn rewrite(&self, entries: &[HistoryEntry]) -> Result<(), HistoryError> {
        let json = serde_json::to_string_pretty(entries)
            .map_err(|err| HistoryError::MirrorWrite(format!("serialize mirror log: {}", err)))?;

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json).map_err(|err| {
            HistoryError::MirrorWrite(format!("write {}: {}", tmp_path.display(), err))
        })?;
        fs::rename(&tmp_path, &self.path).map_err(|err| {
            HistoryError::MirrorWrite(format!("replace {}: {}", self.path.display(), err))
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DispatchOutcome, HttpMethod, RequestSpec};
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn test_entry(url: &str) -> HistoryEntry {
        HistoryEntry::from_exchange(
            RequestSpec::new(HttpMethod::GET, url),
            DispatchOutcome {
                status: 200,
                headers: HashMap::new(),
                body: "ok".to_string(),
                elapsed_ms: 3.0,
            },
        )
    }

    #[test]
    fn test_read_absent_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let mirror = MirrorLog::new(dir.path().join("history.json"));
        assert!(mirror.read_entries().is_empty());
    }

    #[test]
    fn test_append_accumulates_entries() {
        let dir = TempDir::new().unwrap();
        let mirror = MirrorLog::new(dir.path().join("history.json"));

        mirror.append(&test_entry("https://example.com/1")).unwrap();
        mirror.append(&test_entry("https://example.com/2")).unwrap();

        let entries = mirror.read_entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].url, "https://example.com/1");
        assert_eq!(entries[1].url, "https://example.com/2");
    }

    #[test]
    fn test_log_is_a_json_array_without_ids() {
        let dir = TempDir::new().unwrap();
        let mirror = MirrorLog::new(dir.path().join("history.json"));
        let mut entry = test_entry("https://example.com");
        entry.id = Some(42);

        mirror.append(&entry).unwrap();

        let raw = fs::read_to_string(mirror.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let array = value.as_array().unwrap();
        assert_eq!(array.len(), 1);
        assert!(array[0].get("id").is_none());
        assert_eq!(array[0]["url"], "https://example.com");
    }

    #[test]
    fn test_corrupt_log_treated_as_empty_and_append_recovers() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.json");
        fs::write(&path, "[{\"method\": \"GET\", truncated garbage").unwrap();

        let mirror = MirrorLog::new(&path);
        assert!(mirror.read_entries().is_empty());

        mirror.append(&test_entry("https://example.com/after")).unwrap();
        let entries = mirror.read_entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].url, "https://example.com/after");
    }
}
