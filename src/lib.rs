//! Core library for a desktop API testing tool.
//!
//! This crate implements the persistence and dispatch core behind a tool for
//! manually composing HTTP requests and inspecting responses. The
//! presentation surface is thin glue on top of it; everything with real
//! invariants lives here.
//!
//! # Architecture
//!
//! - **models**: Request/response data structures shared across the crate
//! - **config**: Explicit storage configuration (database and mirror paths)
//! - **history**: Dual-backed history persistence: codec, relational store,
//!   mirror log, and the coordinating service
//! - **executor**: Blocking HTTP dispatch with timing
//!
//! # Consistency model
//!
//! Every completed exchange is written to the SQLite store first and then
//! appended to a mirrored JSON flat file. The store is the source of truth:
//! a store failure aborts the recording with the mirror untouched, while a
//! mirror failure after a committed insert is reported as a non-fatal
//! warning. Mirror appends are serialized so the flat file's whole-array
//! rewrite cannot lose updates under concurrent requests.
//!
//! # Usage
//!
//! ```ignore
//! use api_tester::config::StorageConfig;
//! use api_tester::executor::{self, DEFAULT_TIMEOUT_SECS};
//! use api_tester::history::HistoryService;
//! use api_tester::models::{HttpMethod, RequestSpec};
//!
//! let service = HistoryService::new(&StorageConfig::default_paths()?)?;
//! let spec = RequestSpec::new(HttpMethod::GET, "https://api.example.com/users");
//! let entry = executor::execute_exchange(&service, spec, DEFAULT_TIMEOUT_SECS)?;
//! println!("{} in {:.1} ms", entry.response_status, entry.time_ms);
//! ```

pub mod config;
pub mod executor;
pub mod history;
pub mod models;

pub use config::StorageConfig;
pub use history::{EntrySummary, HistoryEntry, HistoryError, HistoryListener, HistoryService};
pub use models::{DispatchOutcome, HttpMethod, RequestSpec};
