//! Session ownership, request configuration and blocking execution.
//!
//! # Design
//! A `Client` owns at most one session handle. With no handle it refuses
//! every call with [`ClientError::UninitializedClient`] before touching
//! the engine. Every configuring call records into the handle's
//! [`SessionConfig`] and re-applies the full record, so the engine always
//! holds exactly what the record says.
//!
//! Copying and moving map onto `Clone` and [`Client::take`]: a clone opens
//! its own session and replays the record onto it, a take moves the
//! handle out and leaves the source empty.

use std::path::Path;
use std::time::Duration;

use tracing::{debug, warn};

use crate::engine::CurlTransport;
use crate::error::{ClientError, TransportError};
use crate::http::{Request, Response};
use crate::options::ClientOptions;
use crate::transport::{RequestConfig, SessionConfig, Transport};

/// Port used when the caller has no better idea.
pub const DEFAULT_PORT: u16 = 80;

/// Blocking HTTP client over a single transport session.
#[derive(Debug)]
pub struct Client<T: Transport = CurlTransport> {
    handle: Option<Handle<T>>,
}

#[derive(Debug)]
struct Handle<T> {
    transport: T,
    config: SessionConfig,
}

impl<T: Transport> Handle<T> {
    fn open() -> Result<Self, TransportError> {
        Ok(Self {
            transport: T::open()?,
            config: SessionConfig::default(),
        })
    }

    /// A new session carrying the same configuration, or `None` on failure.
    fn duplicate(&self) -> Option<Self> {
        let mut transport = match T::open() {
            Ok(transport) => transport,
            Err(err) => {
                warn!(%err, "failed to open session for duplicate");
                return None;
            }
        };
        if let Err(err) = transport.configure(&self.config) {
            warn!(%err, "failed to replay configuration onto duplicate");
            return None;
        }
        Some(Self {
            transport,
            config: self.config.clone(),
        })
    }

    fn reconfigure(&mut self) -> Result<(), ClientError> {
        self.transport
            .configure(&self.config)
            .map_err(ClientError::Configure)
    }
}

impl<T: Transport> Default for Client<T> {
    fn default() -> Self {
        Self { handle: None }
    }
}

impl<T: Transport> Clone for Client<T> {
    fn clone(&self) -> Self {
        Self {
            handle: self.handle.as_ref().and_then(Handle::duplicate),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.handle = None;
        self.handle = source.handle.as_ref().and_then(Handle::duplicate);
    }
}

impl Client {
    /// An initialized client over libcurl.
    pub fn new() -> Result<Self, ClientError> {
        Self::open()
    }
}

impl<T: Transport> Client<T> {
    /// An initialized client over transport `T`.
    pub fn open() -> Result<Self, ClientError> {
        let handle = Handle::open().map_err(ClientError::Init)?;
        Ok(Self {
            handle: Some(handle),
        })
    }

    /// A client with no session handle.
    pub fn uninitialized() -> Self {
        Self::default()
    }

    /// Open a new session, releasing any existing one first.
    ///
    /// Returns whether a session is now held. On failure the client is
    /// left uninitialized.
    pub fn init(&mut self) -> bool {
        self.handle = None;
        match Handle::open() {
            Ok(handle) => {
                self.handle = Some(handle);
                true
            }
            Err(err) => {
                warn!(%err, "failed to open session");
                false
            }
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.handle.is_some()
    }

    /// Move the session out, leaving `self` uninitialized.
    pub fn take(&mut self) -> Self {
        Self {
            handle: self.handle.take(),
        }
    }

    /// The configuration recorded on the session, if there is one.
    pub fn config(&self) -> Option<&SessionConfig> {
        self.handle.as_ref().map(|handle| &handle.config)
    }

    /// Configure the next transfer from a clean slate.
    ///
    /// Targets `url` followed by `request.resource_path` on `port`.
    /// Everything set by a previous `set_request` is dropped; session
    /// options such as [`verbose`](Self::verbose) are kept.
    pub fn set_request(
        &mut self,
        url: &str,
        request: &Request,
        port: u16,
    ) -> Result<&mut Self, ClientError> {
        let request = RequestConfig::new(url, request, port);
        debug!(method = %request.method, url = %request.url, port, "configuring request");
        self.update(|config| config.request = Some(request))
    }

    /// Enable the engine's protocol trace.
    pub fn verbose(&mut self) -> Result<&mut Self, ClientError> {
        self.update(|config| config.options.verbose = true)
    }

    /// Verify peer and host against the CA directory at `path`.
    pub fn with_capath(&mut self, path: impl AsRef<Path>) -> Result<&mut Self, ClientError> {
        let path = path.as_ref().to_path_buf();
        self.update(|config| config.options.capath = Some(path))
    }

    /// CA bundle file used when verification is enabled.
    pub fn with_certificate(&mut self, path: impl AsRef<Path>) -> Result<&mut Self, ClientError> {
        let path = path.as_ref().to_path_buf();
        self.update(|config| config.options.certificate = Some(path))
    }

    pub fn with_timeout(&mut self, timeout: Duration) -> Result<&mut Self, ClientError> {
        let millis = duration_millis(timeout);
        self.update(|config| config.options.timeout_ms = Some(millis))
    }

    pub fn with_connect_timeout(&mut self, timeout: Duration) -> Result<&mut Self, ClientError> {
        let millis = duration_millis(timeout);
        self.update(|config| config.options.connect_timeout_ms = Some(millis))
    }

    pub fn follow_redirects(&mut self, follow: bool) -> Result<&mut Self, ClientError> {
        self.update(|config| config.options.follow_redirects = follow)
    }

    /// Replace every session option at once.
    pub fn with_options(&mut self, options: ClientOptions) -> Result<&mut Self, ClientError> {
        self.update(|config| config.options = options)
    }

    /// Perform the configured transfer, blocking until it finishes.
    ///
    /// Any completed exchange is `Ok`, HTTP error statuses included. Failures
    /// below HTTP come back as [`ClientError::Transfer`].
    pub fn execute(&mut self) -> Result<Response, ClientError> {
        let handle = self
            .handle
            .as_mut()
            .ok_or(ClientError::UninitializedClient)?;

        match handle.transport.perform() {
            Ok(response) => {
                debug!(
                    status = %response.status,
                    headers = response.headers.len(),
                    body = response.body.len(),
                    "transfer complete"
                );
                Ok(response)
            }
            Err(err) => {
                warn!(%err, "transfer failed");
                Err(ClientError::Transfer(err))
            }
        }
    }

    fn update(
        &mut self,
        apply: impl FnOnce(&mut SessionConfig),
    ) -> Result<&mut Self, ClientError> {
        let handle = self
            .handle
            .as_mut()
            .ok_or(ClientError::UninitializedClient)?;
        apply(&mut handle.config);
        handle.reconfigure()?;
        Ok(self)
    }
}

fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
