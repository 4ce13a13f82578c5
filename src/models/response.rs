//! HTTP response data models.
//!
//! This module defines the outcome the dispatcher hands back after executing
//! a request: status, headers, body text, and the measured elapsed time.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The result of a dispatched HTTP request.
///
/// Produced by the executor once the full response has been read. Together
/// with the originating [`RequestSpec`](crate::models::RequestSpec) this is
/// everything needed to build a history entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchOutcome {
    /// HTTP status code of the response.
    pub status: u16,

    /// Response headers as key-value pairs.
    ///
    /// Header values that are not valid UTF-8 are dropped.
    pub headers: HashMap<String, String>,

    /// Response body decoded as text.
    pub body: String,

    /// Wall-clock time for the whole exchange, in fractional milliseconds.
    ///
    /// Measured from just before the request is sent until the body has been
    /// fully read. Always non-negative.
    pub elapsed_ms: f64,
}

impl DispatchOutcome {
    /// Returns true if the status code indicates success (2xx).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_success() {
        let mut outcome = DispatchOutcome {
            status: 200,
            headers: HashMap::new(),
            body: String::new(),
            elapsed_ms: 12.5,
        };
        assert!(outcome.is_success());

        outcome.status = 299;
        assert!(outcome.is_success());

        outcome.status = 301;
        assert!(!outcome.is_success());

        outcome.status = 404;
        assert!(!outcome.is_success());
    }
}
