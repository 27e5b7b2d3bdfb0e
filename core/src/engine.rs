//! libcurl-backed transport.
//!
//! # Design
//! One `Easy2` handle per session. Its handler owns the [`Collector`] for
//! the response in flight plus the upload buffer `PUT` payloads are read
//! from. `configure` calls `curl_easy_reset` first, which drops every
//! option but keeps the handler callbacks installed (the curl crate
//! reinstalls them), then applies the recorded [`SessionConfig`].
//!
//! The handle keeps exactly one header `List` alive: installing a new one
//! drops the previous list.

use std::fmt;
use std::io::{Cursor, Read, Seek, SeekFrom};

use curl::easy::{Easy2, Handler, InfoType, List, ReadError, SeekResult, WriteError};
use tracing::{debug, trace};

use crate::collector::Collector;
use crate::error::TransportError;
use crate::http::{Method, Response};
use crate::options::ClientOptions;
use crate::transport::{RequestConfig, SessionConfig, Transport};

/// [`Transport`] over a libcurl easy handle.
pub struct CurlTransport {
    easy: Easy2<CurlHandler>,
}

impl fmt::Debug for CurlTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CurlTransport").finish_non_exhaustive()
    }
}

#[derive(Debug, Default)]
struct CurlHandler {
    collector: Collector,
    upload: Cursor<Vec<u8>>,
}

impl Handler for CurlHandler {
    fn write(&mut self, data: &[u8]) -> Result<usize, WriteError> {
        Ok(self.collector.body_chunk(data))
    }

    fn header(&mut self, data: &[u8]) -> bool {
        self.collector.header_line(data);
        true
    }

    fn read(&mut self, into: &mut [u8]) -> Result<usize, ReadError> {
        self.upload.read(into).map_err(|_| ReadError::Abort)
    }

    // libcurl rewinds the upload when a redirect makes it resend the body.
    fn seek(&mut self, whence: SeekFrom) -> SeekResult {
        match self.upload.seek(whence) {
            Ok(_) => SeekResult::Ok,
            Err(_) => SeekResult::Fail,
        }
    }

    fn debug(&mut self, kind: InfoType, data: &[u8]) {
        let text = String::from_utf8_lossy(data);
        let text = text.trim_end();
        match kind {
            InfoType::Text => debug!(target: "hqrp_client::wire", "* {text}"),
            InfoType::HeaderIn => trace!(target: "hqrp_client::wire", "< {text}"),
            InfoType::HeaderOut => trace!(target: "hqrp_client::wire", "> {text}"),
            InfoType::DataIn => trace!(target: "hqrp_client::wire", len = data.len(), "received data"),
            InfoType::DataOut => trace!(target: "hqrp_client::wire", len = data.len(), "sent data"),
            _ => {}
        }
    }
}

impl CurlTransport {
    fn apply_options(&mut self, options: &ClientOptions) -> Result<(), curl::Error> {
        self.easy.verbose(options.verbose)?;
        if let Some(path) = &options.capath {
            self.easy.ssl_verify_peer(true)?;
            self.easy.ssl_verify_host(true)?;
            self.easy.capath(path)?;
        }
        if let Some(path) = &options.certificate {
            self.easy.cainfo(path)?;
        }
        if let Some(timeout) = options.timeout() {
            self.easy.timeout(timeout)?;
        }
        if let Some(timeout) = options.connect_timeout() {
            self.easy.connect_timeout(timeout)?;
        }
        self.easy.follow_location(options.follow_redirects)?;
        Ok(())
    }

    fn apply_request(&mut self, request: &RequestConfig) -> Result<(), curl::Error> {
        match request.method {
            Method::Get => self.easy.get(true)?,
            Method::Post => self.easy.post(true)?,
            Method::Put => self.easy.upload(true)?,
        }

        self.easy.url(&request.url)?;
        self.easy.port(request.port)?;

        if request.headers.is_some() {
            let mut list = List::new();
            for line in request.header_lines() {
                list.append(&line)?;
            }
            self.easy.http_headers(list)?;
        }

        match (request.method, &request.payload) {
            (Method::Put, Some(payload)) => {
                self.easy.in_filesize(payload.len() as u64)?;
                self.easy.get_mut().upload = Cursor::new(payload.clone());
            }
            (Method::Put, None) => self.easy.in_filesize(0)?,
            (method, Some(payload)) => {
                self.easy.post_field_size(payload.len() as u64)?;
                self.easy.post_fields_copy(payload)?;
                // Post fields imply POST; keep the verb that was asked for.
                if method == Method::Get {
                    self.easy.custom_request(method.as_str())?;
                }
            }
            // Setting a post field size nulls POSTFIELDS, which turns a GET
            // into a POST. The reset already cleared any earlier payload.
            (Method::Get, None) => {}
            (Method::Post, None) => self.easy.post_field_size(0)?,
        }
        Ok(())
    }
}

impl Transport for CurlTransport {
    fn open() -> Result<Self, TransportError> {
        debug!("opening curl session");
        Ok(Self {
            easy: Easy2::new(CurlHandler::default()),
        })
    }

    fn configure(&mut self, config: &SessionConfig) -> Result<(), TransportError> {
        self.easy.reset();
        self.easy.get_mut().upload = Cursor::default();

        self.apply_options(&config.options)?;
        if let Some(request) = &config.request {
            self.apply_request(request)?;
        }
        Ok(())
    }

    fn perform(&mut self) -> Result<Response, TransportError> {
        self.easy.get_mut().collector.begin();
        let outcome = self.easy.perform();

        let handler = self.easy.get_mut();
        let response = handler.collector.finish();
        handler.upload.set_position(0);

        outcome?;
        Ok(response)
    }
}
