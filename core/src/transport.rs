//! The seam between the client and the engine that moves bytes.
//!
//! # Design
//! A [`Client`](crate::Client) never talks to libcurl directly. It records
//! what the caller asked for in a [`SessionConfig`] and hands the whole
//! record to a [`Transport`] each time it changes. The transport resets
//! its native handle and applies the record from scratch, so nothing set
//! for an earlier request can leak into a later one. The same record lets
//! the client duplicate a session by replaying it onto a fresh transport.

use crate::error::TransportError;
use crate::http::{Header, Method, Request, Response};
use crate::options::ClientOptions;

/// Everything the engine needs to perform one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestConfig {
    pub method: Method,
    /// Full target address: base url followed by the resource path.
    pub url: String,
    pub port: u16,
    pub headers: Option<Vec<Header>>,
    pub payload: Option<Vec<u8>>,
}

impl RequestConfig {
    pub fn new(url: &str, request: &Request, port: u16) -> Self {
        Self {
            method: request.method,
            url: format!("{url}{}", request.resource_path),
            port,
            headers: request.headers.clone(),
            payload: request.payload.clone(),
        }
    }

    /// Headers rendered as `"Name: Value"` lines, in order.
    pub fn header_lines(&self) -> Vec<String> {
        self.headers
            .iter()
            .flatten()
            .map(|(name, value)| format!("{name}: {value}"))
            .collect()
    }
}

/// The configuration recorded on one session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionConfig {
    /// Replaced wholesale by every `set_request`.
    pub request: Option<RequestConfig>,
    pub options: ClientOptions,
}

/// A transport engine session.
///
/// Implementations own one native session and a
/// [`Collector`](crate::Collector) for the response in flight. The body
/// callback contract holds for every implementation: a chunk handler that
/// reports consuming fewer bytes than it was given aborts the transfer.
pub trait Transport: Sized {
    /// Open a new session with engine defaults.
    fn open() -> Result<Self, TransportError>;

    /// Reset the session and apply `config` from a clean slate.
    fn configure(&mut self, config: &SessionConfig) -> Result<(), TransportError>;

    /// Run the configured transfer to completion.
    ///
    /// Binds a fresh response before the transfer starts and returns it
    /// once the engine reports success, whatever the HTTP status.
    fn perform(&mut self) -> Result<Response, TransportError>;
}
