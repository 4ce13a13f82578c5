//! HTTP request data models.
//!
//! This module defines the core data structures for representing the request
//! side of an exchange: the method and the operator-composed request spec.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// HTTP request method.
///
/// Only the methods the tool exposes in its method selector are supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
    /// HTTP GET method - retrieve a resource
    GET,
    /// HTTP POST method - submit data to create a resource
    POST,
    /// HTTP PUT method - replace a resource
    PUT,
    /// HTTP DELETE method - remove a resource
    DELETE,
    /// HTTP PATCH method - partially modify a resource
    PATCH,
}

impl HttpMethod {
    /// Returns the string representation of the HTTP method.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::GET => "GET",
            HttpMethod::POST => "POST",
            HttpMethod::PUT => "PUT",
            HttpMethod::DELETE => "DELETE",
            HttpMethod::PATCH => "PATCH",
        }
    }

    /// Parses a string into an HttpMethod.
    ///
    /// # Arguments
    ///
    /// * `s` - A string slice representing the HTTP method
    ///
    /// # Returns
    ///
    /// `Some(HttpMethod)` if the string is a supported HTTP method, `None` otherwise.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "GET" => Some(HttpMethod::GET),
            "POST" => Some(HttpMethod::POST),
            "PUT" => Some(HttpMethod::PUT),
            "DELETE" => Some(HttpMethod::DELETE),
            "PATCH" => Some(HttpMethod::PATCH),
            _ => None,
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An HTTP request as composed by the operator, ready for dispatch.
///
/// This is the input side of an exchange: everything needed to execute the
/// request, with headers already parsed from the raw header input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestSpec {
    /// HTTP method (GET, POST, PUT, DELETE, PATCH).
    pub method: HttpMethod,

    /// Target URL for the request.
    ///
    /// Expected to pass `codec::is_valid_url` before dispatch; the dispatcher
    /// additionally parse-validates it.
    pub url: String,

    /// Request headers as key-value pairs.
    ///
    /// Insertion order is not significant.
    pub headers: HashMap<String, String>,

    /// Raw request body.
    ///
    /// May be empty and is not required to be valid for any content type.
    pub body: String,
}

impl RequestSpec {
    /// Creates a new RequestSpec with no headers and an empty body.
    ///
    /// # Arguments
    ///
    /// * `method` - HTTP method
    /// * `url` - Target URL
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HashMap::new(),
            body: String::new(),
        }
    }

    /// Adds a header to the request.
    ///
    /// # Arguments
    ///
    /// * `name` - Header name
    /// * `value` - Header value
    pub fn add_header(&mut self, name: String, value: String) {
        self.headers.insert(name, value);
    }

    /// Sets the request body.
    pub fn set_body(&mut self, body: String) {
        self.body = body;
    }
}
