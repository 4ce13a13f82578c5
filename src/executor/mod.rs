//! Request dispatcher.
//!
//! Executes a composed request with a blocking HTTP client and measures the
//! elapsed wall time. The tool runs each dispatch on its own short-lived
//! background thread so the foreground interaction context never blocks on
//! the network; the call itself is synchronous with a hard timeout.

pub mod error;

pub use error::RequestError;

use crate::history::{HistoryEntry, HistoryService};
use crate::models::{DispatchOutcome, HttpMethod, RequestSpec};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Default request timeout in seconds.
///
/// The timeout is the only bound on request duration; there is no explicit
/// cancellation of an in-flight request.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Executes an HTTP request and returns its outcome.
///
/// The URL is parse-validated before anything is sent; schemes other than
/// http and https are rejected. Elapsed time covers the span from just
/// before the request is sent until the response body has been fully read.
///
/// # Arguments
///
/// * `spec` - The request to execute
/// * `timeout_secs` - Hard timeout for the whole exchange
///
/// # Errors
///
/// Returns `RequestError::InvalidUrl` for unparseable or non-http(s) URLs,
/// `RequestError::Timeout` when the timeout elapses, and
/// `RequestError::NetworkError` for connection-level failures.
pub fn dispatch(spec: &RequestSpec, timeout_secs: u64) -> Result<DispatchOutcome, RequestError> {
    let parsed = url::Url::parse(spec.url.trim())?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(RequestError::InvalidUrl(format!(
            "unsupported scheme `{}`",
            parsed.scheme()
        )));
    }

    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| RequestError::BuildError(e.to_string()))?;

    let method = match spec.method {
        HttpMethod::GET => reqwest::Method::GET,
        HttpMethod::POST => reqwest::Method::POST,
        HttpMethod::PUT => reqwest::Method::PUT,
        HttpMethod::DELETE => reqwest::Method::DELETE,
        HttpMethod::PATCH => reqwest::Method::PATCH,
    };

    let mut req_builder = client.request(method, parsed);
    for (name, value) in &spec.headers {
        req_builder = req_builder.header(name, value);
    }
    if !spec.body.is_empty() {
        req_builder = req_builder.body(spec.body.clone());
    }

    let start = Instant::now();
    let response = req_builder.send()?;

    let status = response.status().as_u16();
    let mut headers = HashMap::new();
    for (name, value) in response.headers() {
        if let Ok(value_str) = value.to_str() {
            headers.insert(name.as_str().to_string(), value_str.to_string());
        }
    }

    let body = response.text()?;
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

    Ok(DispatchOutcome {
        status,
        headers,
        body,
        elapsed_ms,
    })
}

/// Executes a request and records the completed exchange in history.
///
/// This is the per-request lifecycle the tool runs on a background thread:
/// dispatch, build the entry, persist. A persistence failure does not
/// discard the response; the in-memory entry is still returned so the
/// operator sees the result, and the storage loss is logged as a warning
/// (with `id` left unset on the returned entry).
///
/// # Errors
///
/// Returns a `RequestError` only when the dispatch itself fails; nothing is
/// recorded in that case.
pub fn execute_exchange(
    service: &HistoryService,
    spec: RequestSpec,
    timeout_secs: u64,
) -> Result<HistoryEntry, RequestError> {
    let outcome = dispatch(&spec, timeout_secs)?;
    let mut entry = HistoryEntry::from_exchange(spec, outcome);

    match service.record_exchange(&entry) {
        Ok(id) => entry.id = Some(id),
        Err(err) => {
            log::warn!("exchange completed but could not be recorded: {}", err);
        }
    }

    Ok(entry)
}
