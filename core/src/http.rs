//! HTTP request and response descriptors.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The
//! request builder produces `HttpRequest` values without touching the
//! network; a `Transport` implementation turns them into real I/O and hands
//! back an `HttpResponse`. Keeping the boundary as data lets the request
//! pipeline be tested without a server.
//!
//! All fields use owned types (`String`, `Vec`) so descriptors can be moved
//! into a transport future without lifetime concerns.

use std::fmt;

use serde_json::Value;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Head,
    Delete,
}

impl HttpMethod {
    /// Uppercase wire name of the method.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Head => "HEAD",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters attached to a request.
///
/// `Query` carries read parameters in insertion order and is encoded into the
/// URL for GET requests. `Json` carries a write body.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Query(Vec<(String, String)>),
    Json(Value),
}

impl Payload {
    /// Key/value pairs for a query string.
    ///
    /// A JSON object is flattened one level deep: strings are used verbatim,
    /// every other value is rendered as JSON text. Non-object JSON yields no
    /// pairs.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        match self {
            Payload::Query(pairs) => pairs.clone(),
            Payload::Json(Value::Object(map)) => map
                .iter()
                .map(|(k, v)| {
                    let v = match v {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    (k.clone(), v)
                })
                .collect(),
            Payload::Json(_) => Vec::new(),
        }
    }

    /// The payload as a JSON document, for transports that send JSON bodies.
    pub fn to_json(&self) -> Value {
        match self {
            Payload::Json(value) => value.clone(),
            Payload::Query(pairs) => Value::Object(
                pairs
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                    .collect(),
            ),
        }
    }
}

/// An HTTP request described as plain data.
///
/// Built by `RequestBuilder::build`. A `Transport` executes it and returns
/// the corresponding `HttpResponse`.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Payload>,
}

impl HttpRequest {
    /// First header value matching `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// Whether the remote service considers the call successful.
    ///
    /// Only 200, 201 and 204 count; other 2xx codes are errors.
    pub fn is_success(&self) -> bool {
        matches!(self.status, 200 | 201 | 204)
    }

    /// True for 204, whose body must not be parsed.
    pub fn is_no_content(&self) -> bool {
        self.status == 204
    }
}
