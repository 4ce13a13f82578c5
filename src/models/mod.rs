//! Core data models for HTTP requests and responses.

pub mod request;
pub mod response;

pub use request::{HttpMethod, RequestSpec};
pub use response::DispatchOutcome;
