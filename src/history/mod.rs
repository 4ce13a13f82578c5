//! Request history persistence and synchronization.
//!
//! This module is the core of the tool: every completed request/response
//! exchange is recorded in two backends, a SQLite table (source of truth,
//! queryable by recency and id) and a mirrored JSON flat file (redundant
//! export/recovery copy). The history service coordinates both and owns the
//! consistency policy between them.
//!
//! # Example
//!
//! ```ignore
//! use api_tester::config::StorageConfig;
//! use api_tester::history::HistoryService;
//!
//! let service = HistoryService::new(&StorageConfig::default_paths()?)?;
//! let id = service.record_exchange(&entry)?;
//! let recent = service.browse_recent()?;
//! ```

pub mod codec;
pub mod mirror;
pub mod models;
pub mod service;
pub mod store;

// Re-export commonly used types
pub use codec::{decode_headers, encode_headers, is_valid_url, parse_header_input};
pub use mirror::MirrorLog;
pub use models::{EntrySummary, HistoryEntry, HistoryError};
pub use service::{HistoryListener, HistoryService};
pub use store::{HistoryStore, DEFAULT_BROWSE_LIMIT};
