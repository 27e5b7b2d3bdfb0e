//! Error types for the HTTP client.
//!
//! # Design
//! `UninitializedClient` is raised before any engine interaction, so it
//! never carries engine detail. Everything the engine reports lands in a
//! [`TransportError`] that keeps the engine's numeric code and message,
//! split by the phase it happened in. HTTP error statuses are not errors:
//! they come back as ordinary [`Response`](crate::Response) values.

use std::fmt;

/// Errors returned by [`Client`](crate::Client) operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The client holds no session handle.
    #[error("client has no session handle; call Client::init first")]
    UninitializedClient,

    /// A session handle could not be opened.
    #[error("failed to open session: {0}")]
    Init(#[source] TransportError),

    /// The engine rejected a configuration option.
    #[error("failed to configure session: {0}")]
    Configure(#[source] TransportError),

    /// The transfer itself failed (DNS, connect, TLS, protocol).
    #[error("transfer failed: {0}")]
    Transfer(#[source] TransportError),

    /// [`ClientOptions`](crate::ClientOptions) could not be parsed.
    #[error("invalid client options: {0}")]
    InvalidOptions(#[from] serde_json::Error),
}

impl ClientError {
    /// The engine error behind this failure, if any.
    pub fn transport(&self) -> Option<&TransportError> {
        match self {
            ClientError::Init(err) | ClientError::Configure(err) | ClientError::Transfer(err) => {
                Some(err)
            }
            ClientError::UninitializedClient | ClientError::InvalidOptions(_) => None,
        }
    }
}

/// A failure reported by the transport engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError {
    code: i64,
    description: String,
    detail: Option<String>,
}

impl TransportError {
    pub fn new(code: i64, description: impl Into<String>) -> Self {
        Self {
            code,
            description: description.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Engine-specific numeric code (a `CURLcode` for the curl engine).
    pub fn code(&self) -> i64 {
        self.code
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Extra context the engine attached, such as the failing host.
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.description, self.code)?;
        if let Some(detail) = &self.detail {
            write!(f, ": {detail}")?;
        }
        Ok(())
    }
}

impl std::error::Error for TransportError {}

impl From<curl::Error> for TransportError {
    fn from(err: curl::Error) -> Self {
        let mapped = TransportError::new(i64::from(err.code()), err.description());
        match err.extra_description() {
            Some(extra) => mapped.with_detail(extra),
            None => mapped,
        }
    }
}
