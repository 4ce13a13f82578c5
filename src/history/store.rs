//! Relational store for request history.
//!
//! Source of truth for persisted entries: a single SQLite table with
//! autoincrementing ids, queryable by recency and by id. Header mappings are
//! stored as JSON text via the entry codec.
//!
//! A connection is opened per operation. WAL journal mode plus a busy
//! timeout lets concurrent writers from parallel request threads serialize
//! at the database level without a process-wide lock.

use super::codec;
use super::models::{EntrySummary, HistoryEntry, HistoryError};
use crate::models::HttpMethod;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OpenFlags};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default number of summaries returned by a recency listing.
pub const DEFAULT_BROWSE_LIMIT: usize = 100;

/// Durable, queryable storage of history entries.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    db_path: PathBuf,
}

impl HistoryStore {
    /// Opens (or creates) the history database at the given path.
    ///
    /// Parent directories are created if missing and the schema is applied
    /// idempotently, so this is safe to call on every startup.
    ///
    /// # Errors
    ///
    /// Returns `HistoryError::Io` if the parent directory cannot be created,
    /// or `HistoryError::Storage` if the database cannot be opened.
    pub fn open(db_path: impl Into<PathBuf>) -> Result<Self, HistoryError> {
        let db_path = db_path.into();
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let store = Self { db_path };
        store.ensure_schema()?;
        Ok(store)
    }

    /// Path to the underlying database file.
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Idempotently creates the history table if it is absent.
    pub fn ensure_schema(&self) -> Result<(), HistoryError> {
        let conn = self.connect()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS history (
              id INTEGER PRIMARY KEY AUTOINCREMENT,
              method TEXT NOT NULL,
              url TEXT NOT NULL,
              headers TEXT NOT NULL,
              body TEXT NOT NULL,
              response_status INTEGER NOT NULL,
              response_headers TEXT NOT NULL,
              response_body TEXT NOT NULL,
              time_ms REAL NOT NULL,
              timestamp TEXT NOT NULL
            );
            "#,
        )?;
        Ok(())
    }

    /// Appends a new entry and returns its assigned id.
    ///
    /// Header mappings are encoded to JSON text via the codec. The entry's
    /// own `id` field is ignored; ids are always assigned by the database.
    ///
    /// # Errors
    ///
    /// Returns `HistoryError::Storage` if the write cannot be committed.
    pub fn insert(&self, entry: &HistoryEntry) -> Result<i64, HistoryError> {
        let conn = self.connect()?;
        conn.execute(
            r#"
            INSERT INTO history (
              method, url, headers, body,
              response_status, response_headers, response_body,
              time_ms, timestamp
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                entry.method.as_str(),
                entry.url,
                codec::encode_headers(&entry.headers),
                entry.body,
                i64::from(entry.response_status),
                codec::encode_headers(&entry.response_headers),
                entry.response_body,
                entry.time_ms,
                entry
                    .timestamp
                    .to_rfc3339_opts(chrono::SecondsFormat::AutoSi, true),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Lists the most recent entries as lightweight summaries.
    ///
    /// # Arguments
    ///
    /// * `limit` - Maximum number of summaries to return; 0 yields an empty
    ///   list. Callers without an opinion should pass [`DEFAULT_BROWSE_LIMIT`].
    ///
    /// # Returns
    ///
    /// Up to `limit` summaries ordered by descending id (most recent first).
    pub fn list_recent(&self, limit: usize) -> Result<Vec<EntrySummary>, HistoryError> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, method, url, response_status, timestamp
            FROM history
            ORDER BY id DESC
            LIMIT ?1
            "#,
        )?;

        let mut rows = stmt.query(params![limit as i64])?;
        let mut summaries = Vec::new();
        while let Some(row) = rows.next()? {
            summaries.push(EntrySummary {
                id: row.get(0)?,
                method: read_method(row.get::<_, String>(1)?)?,
                url: row.get(2)?,
                response_status: read_status(row.get::<_, i64>(3)?),
                timestamp: read_timestamp(&row.get::<_, String>(4)?)?,
            });
        }
        Ok(summaries)
    }

    /// Looks up a full entry by id.
    ///
    /// # Returns
    ///
    /// `Ok(None)` when the id does not exist; a missing entry is not an
    /// error. Header columns that fail to parse decode to empty mappings.
    pub fn get_by_id(&self, id: i64) -> Result<Option<HistoryEntry>, HistoryError> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, method, url, headers, body,
                   response_status, response_headers, response_body,
                   time_ms, timestamp
            FROM history
            WHERE id = ?1
            "#,
        )?;

        let mut rows = stmt.query(params![id])?;
        match rows.next()? {
            Some(row) => Ok(Some(read_entry(row)?)),
            None => Ok(None),
        }
    }

    /// Returns every entry in insertion order.
    ///
    /// Used by export; at the tool's scale a full dump is cheap.
    pub fn list_all(&self) -> Result<Vec<HistoryEntry>, HistoryError> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, method, url, headers, body,
                   response_status, response_headers, response_body,
                   time_ms, timestamp
            FROM history
            ORDER BY id ASC
            "#,
        )?;

        let mut rows = stmt.query([])?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            entries.push(read_entry(row)?);
        }
        Ok(entries)
    }

    /// Counts stored entries without materializing them.
    pub fn count(&self) -> Result<usize, HistoryError> {
        let conn = self.connect()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM history", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Removes every entry from the store.
    pub fn clear(&self) -> Result<(), HistoryError> {
        let conn = self.connect()?;
        conn.execute("DELETE FROM history", [])?;
        Ok(())
    }

    fn connect(&self) -> Result<Connection, HistoryError> {
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(&self.db_path, flags)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.busy_timeout(Duration::from_secs(5))?;
        Ok(conn)
    }
}

fn read_entry(row: &rusqlite::Row<'_>) -> Result<HistoryEntry, HistoryError> {
    Ok(HistoryEntry {
        id: Some(row.get(0)?),
        method: read_method(row.get::<_, String>(1)?)?,
        url: row.get(2)?,
        headers: codec::decode_headers(&row.get::<_, String>(3)?),
        body: row.get(4)?,
        response_status: read_status(row.get::<_, i64>(5)?),
        response_headers: codec::decode_headers(&row.get::<_, String>(6)?),
        response_body: row.get(7)?,
        time_ms: row.get(8)?,
        timestamp: read_timestamp(&row.get::<_, String>(9)?)?,
    })
}

fn read_method(text: String) -> Result<HttpMethod, HistoryError> {
    HttpMethod::from_str(&text).ok_or_else(|| {
        HistoryError::Storage(rusqlite::Error::InvalidColumnType(
            1,
            format!("unknown HTTP method `{}`", text),
            rusqlite::types::Type::Text,
        ))
    })
}

fn read_status(raw: i64) -> u16 {
    u16::try_from(raw).unwrap_or_else(|_| {
        log::warn!("stored response_status {} is out of range, reading as 0", raw);
        0
    })
}

fn read_timestamp(text: &str) -> Result<DateTime<Utc>, HistoryError> {
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|err| {
            HistoryError::Storage(rusqlite::Error::InvalidColumnType(
                9,
                format!("unparseable timestamp `{}`: {}", text, err),
                rusqlite::types::Type::Text,
            ))
        })
}
