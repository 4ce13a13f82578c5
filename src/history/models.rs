//! Data models for request history.
//!
//! This module defines the unit of record for the history layer (a complete
//! request/response exchange), its lightweight list projection, and the
//! error taxonomy for history operations.

use crate::models::{DispatchOutcome, HttpMethod, RequestSpec};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A single entry in the request history.
///
/// Represents one complete request/response exchange. An entry is constructed
/// in full only after the response is known, and is immutable after creation.
///
/// The JSON representation matches the import/export file format: all fields
/// except `id`, which is assigned by the relational store and stripped from
/// the flat-file formats.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Identifier assigned by the relational store.
    ///
    /// `None` until the entry has been persisted. Never serialized: the
    /// mirror log and export format carry entries without ids, and import
    /// assigns fresh ones.
    #[serde(skip)]
    pub id: Option<i64>,

    /// HTTP method of the request.
    pub method: HttpMethod,

    /// Target URL of the request.
    pub url: String,

    /// Request headers as key-value pairs.
    pub headers: HashMap<String, String>,

    /// Raw request body (may be empty).
    pub body: String,

    /// HTTP status code of the response.
    pub response_status: u16,

    /// Response headers as key-value pairs.
    pub response_headers: HashMap<String, String>,

    /// Raw response body.
    pub response_body: String,

    /// Elapsed time of the exchange in fractional milliseconds.
    pub time_ms: f64,

    /// When the exchange completed, in UTC.
    ///
    /// Serialized as ISO-8601 with a trailing `Z`.
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    /// Builds a history entry from a dispatched request and its outcome.
    ///
    /// The timestamp is taken at construction time.
    ///
    /// # Arguments
    ///
    /// * `spec` - The request that was sent
    /// * `outcome` - The response the dispatcher returned
    pub fn from_exchange(spec: RequestSpec, outcome: DispatchOutcome) -> Self {
        Self {
            id: None,
            method: spec.method,
            url: spec.url,
            headers: spec.headers,
            body: spec.body,
            response_status: outcome.status,
            response_headers: outcome.headers,
            response_body: outcome.body,
            time_ms: outcome.elapsed_ms,
            timestamp: Utc::now(),
        }
    }
}

/// Lightweight projection of a [`HistoryEntry`] for list views.
///
/// Carries no headers or bodies, so recency listings stay cheap regardless
/// of response sizes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntrySummary {
    /// Identifier assigned by the relational store.
    pub id: i64,

    /// HTTP method of the request.
    pub method: HttpMethod,

    /// Target URL of the request.
    pub url: String,

    /// HTTP status code of the response.
    pub response_status: u16,

    /// When the exchange completed, in UTC.
    pub timestamp: DateTime<Utc>,
}

/// Errors that can occur during history operations.
#[derive(Debug)]
pub enum HistoryError {
    /// The relational store is unavailable or a write could not be committed.
    Storage(rusqlite::Error),

    /// File I/O failed outside the relational store.
    Io(std::io::Error),

    /// Serialization or deserialization of an entry failed.
    Serialization(serde_json::Error),

    /// The mirror log could not be written.
    ///
    /// Non-fatal: the relational store is the source of truth, so a mirror
    /// write failure never rolls back a committed entry.
    MirrorWrite(String),

    /// An import file could not be read or its top-level JSON is malformed.
    Import(String),

    /// An export could not be completed. Pre-existing history is untouched.
    Export(String),
}

impl fmt::Display for HistoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryError::Storage(err) => write!(f, "History storage error: {}", err),
            HistoryError::Io(err) => write!(f, "History I/O error: {}", err),
            HistoryError::Serialization(err) => {
                write!(f, "History serialization error: {}", err)
            }
            HistoryError::MirrorWrite(msg) => write!(f, "Mirror log write failed: {}", msg),
            HistoryError::Import(msg) => write!(f, "History import failed: {}", msg),
            HistoryError::Export(msg) => write!(f, "History export failed: {}", msg),
        }
    }
}

impl std::error::Error for HistoryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HistoryError::Storage(err) => Some(err),
            HistoryError::Io(err) => Some(err),
            HistoryError::Serialization(err) => Some(err),
            HistoryError::MirrorWrite(_) | HistoryError::Import(_) | HistoryError::Export(_) => {
                None
            }
        }
    }
}

impl From<rusqlite::Error> for HistoryError {
    fn from(err: rusqlite::Error) -> Self {
        HistoryError::Storage(err)
    }
}

impl From<std::io::Error> for HistoryError {
    fn from(err: std::io::Error) -> Self {
        HistoryError::Io(err)
    }
}

impl From<serde_json::Error> for HistoryError {
    fn from(err: serde_json::Error) -> Self {
        HistoryError::Serialization(err)
    }
}
