//! Minimal blocking HTTP client over a pluggable transport engine.
//!
//! # Overview
//! A [`Client`] owns one transport session. The caller describes a
//! [`Request`], the client translates it into engine configuration, runs a
//! single synchronous transfer and returns the captured [`Response`]:
//! status line, headers in arrival order, and body bytes.
//!
//! ```no_run
//! use hqrp_client::{Client, Request, DEFAULT_PORT};
//!
//! hqrp_client::init_transport();
//!
//! let mut client = Client::new()?;
//! let response = client
//!     .set_request(
//!         "http://example.com",
//!         &Request::get("/").with_header("Accept", "text/html"),
//!         DEFAULT_PORT,
//!     )?
//!     .execute()?;
//! println!("{} ({} bytes)", response.status, response.body.len());
//! # Ok::<(), hqrp_client::ClientError>(())
//! ```
//!
//! # Design
//! - The default engine is libcurl ([`CurlTransport`]); anything
//!   implementing [`Transport`] can stand in for it.
//! - Header and body capture are pure functions over the response being
//!   built ([`collect_header_line`], [`collect_body_chunk`]).
//! - HTTP error statuses are data. Only engine failures are errors.
//! - Not thread-safe to share: use one `Client` per thread.

pub mod client;
pub mod collector;
pub mod engine;
pub mod error;
pub mod http;
pub mod options;
pub mod transport;

pub use client::{Client, DEFAULT_PORT};
pub use collector::{collect_body_chunk, collect_header_line, Collector};
pub use engine::CurlTransport;
pub use error::{ClientError, TransportError};
pub use http::{Header, Method, Request, Response};
pub use options::ClientOptions;
pub use transport::{RequestConfig, SessionConfig, Transport};

/// Process-wide libcurl initialization.
///
/// Call once at process start, before spawning threads. Repeated calls are
/// no-ops. libcurl global cleanup is left to process exit.
pub fn init_transport() {
    curl::init();
}
