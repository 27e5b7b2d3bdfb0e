//! Plain-data request and response types.
//!
//! # Design
//! `Request` is built by the caller and only ever read by the client.
//! `Response` starts empty right before a transfer, is filled by the
//! [`Collector`](crate::collector::Collector) while bytes arrive, and is
//! handed back by value once the transfer completes.
//!
//! Headers are kept as ordered `(name, value)` pairs rather than a map so
//! arrival order and duplicate names survive untouched.

use std::borrow::Cow;
use std::fmt;

/// A header as a `(name, value)` pair.
pub type Header = (String, String);

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An outbound request described as plain data.
///
/// The target address is `url + resource_path`, so `resource_path` usually
/// starts with `/`. `headers` and `payload` are optional: `None` means
/// "send nothing", which is different from an empty list only in intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    pub resource_path: String,
    pub headers: Option<Vec<Header>>,
    pub payload: Option<Vec<u8>>,
}

impl Request {
    pub fn new(method: Method, resource_path: impl Into<String>) -> Self {
        Self {
            method,
            resource_path: resource_path.into(),
            headers: None,
            payload: None,
        }
    }

    pub fn get(resource_path: impl Into<String>) -> Self {
        Self::new(Method::Get, resource_path)
    }

    pub fn post(resource_path: impl Into<String>) -> Self {
        Self::new(Method::Post, resource_path)
    }

    pub fn put(resource_path: impl Into<String>) -> Self {
        Self::new(Method::Put, resource_path)
    }

    /// Append a header, keeping earlier ones (including same-named ones).
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(Vec::new)
            .push((name.into(), value.into()));
        self
    }

    pub fn with_payload(mut self, payload: impl Into<Vec<u8>>) -> Self {
        self.payload = Some(payload.into());
        self
    }
}

/// A response captured from one transfer.
///
/// `status` holds the reason part of the last status line seen (e.g.
/// `"200 OK"`), `version` the protocol token in front of it (e.g.
/// `"HTTP/1.1"`). When the engine follows redirects every hop's headers
/// are kept, in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    pub version: String,
    pub status: String,
    pub headers: Vec<Header>,
    pub body: Vec<u8>,
}

impl Response {
    /// Numeric status code parsed from `status`, if it starts with one.
    pub fn status_code(&self) -> Option<u16> {
        self.status.split_whitespace().next()?.parse().ok()
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status_code(), Some(200..=299))
    }

    /// First header value whose name matches `name`, ignoring ASCII case.
    pub fn header<'a>(&'a self, name: &'a str) -> Option<&'a str> {
        self.header_values(name).next()
    }

    /// Every header value whose name matches `name`, in arrival order.
    pub fn header_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.headers
            .iter()
            .filter(move |(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// The body as text, replacing invalid UTF-8 sequences.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}
