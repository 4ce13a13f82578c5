//! Entry codec: conversions between display and storage representations.
//!
//! Header mappings are stored as JSON object text in both backends. Decoding
//! is deliberately fail-soft: a value that does not parse on read yields an
//! empty mapping rather than an error, so one corrupt column never blocks
//! access to the rest of an entry.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, HashMap};

/// Matches URLs the tool will dispatch: an http or https scheme prefix.
///
/// The scheme token is matched case-sensitively; the rest of the URL is not
/// evaluated here.
static URL_SCHEME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://").expect("URL scheme regex is valid"));

/// Serializes a header mapping to a canonical JSON object string.
///
/// Keys are emitted in sorted order so equal mappings always produce
/// identical storage text.
///
/// # Arguments
///
/// * `headers` - The header mapping to encode
pub fn encode_headers(headers: &HashMap<String, String>) -> String {
    let ordered: BTreeMap<&str, &str> = headers
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    // A string-to-string map cannot fail to serialize.
    serde_json::to_string(&ordered).unwrap_or_else(|_| "{}".to_string())
}

/// Parses JSON object text back into a header mapping.
///
/// # Arguments
///
/// * `text` - Stored JSON object text
///
/// # Returns
///
/// The decoded mapping, or an empty mapping if the text is empty, absent,
/// or fails to parse. Never returns an error.
pub fn decode_headers(text: &str) -> HashMap<String, String> {
    if text.trim().is_empty() {
        return HashMap::new();
    }
    match serde_json::from_str::<HashMap<String, String>>(text) {
        Ok(map) => map,
        Err(err) => {
            log::warn!("discarding unparseable stored headers: {}", err);
            HashMap::new()
        }
    }
}

/// Parses raw operator input into a header mapping.
///
/// Accepts either a JSON object literal or a newline-delimited `Key: Value`
/// list. JSON is tried first; non-string JSON values are stringified. On
/// fallback, a line without a colon is silently skipped, keys and values are
/// trimmed, and the last occurrence of a duplicate key wins.
///
/// # Arguments
///
/// * `raw` - Raw header text as typed by the operator
///
/// # Returns
///
/// The parsed mapping; empty input yields an empty mapping.
pub fn parse_header_input(raw: &str) -> HashMap<String, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return HashMap::new();
    }

    if let Ok(serde_json::Value::Object(obj)) = serde_json::from_str::<serde_json::Value>(raw) {
        return obj
            .into_iter()
            .map(|(k, v)| {
                let value = match v {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                };
                (k, value)
            })
            .collect();
    }

    let mut headers = HashMap::new();
    for line in raw.lines() {
        if let Some((key, value)) = line.split_once(':') {
            headers.insert(key.trim().to_string(), value.trim().to_string());
        }
    }
    headers
}

/// Checks whether a string is a dispatchable URL.
///
/// # Arguments
///
/// * `s` - Candidate URL; surrounding whitespace is ignored
///
/// # Returns
///
/// `true` iff the trimmed string begins with `http://` or `https://`.
pub fn is_valid_url(s: &str) -> bool {
    URL_SCHEME_RE.is_match(s.trim())
}
