//! Pass-through engine options that outlive individual requests.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// Session-wide options. Unlike the request, these survive `set_request`.
///
/// Deserializes from JSON with every field optional:
///
/// ```
/// let options = hqrp_client::ClientOptions::from_json(
///     r#"{"verbose": true, "timeout_ms": 2500}"#,
/// )?;
/// assert!(options.verbose);
/// # Ok::<(), hqrp_client::ClientError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientOptions {
    /// Emit the engine's protocol trace (routed into `tracing`).
    pub verbose: bool,
    /// Trusted CA directory. Setting it turns on peer and host verification.
    pub capath: Option<PathBuf>,
    /// CA bundle file used whenever verification is on.
    pub certificate: Option<PathBuf>,
    /// Whole-transfer timeout.
    pub timeout_ms: Option<u64>,
    pub connect_timeout_ms: Option<u64>,
    pub follow_redirects: bool,
}

impl ClientOptions {
    pub fn from_json(raw: &str) -> Result<Self, ClientError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_ms.map(Duration::from_millis)
    }
}
