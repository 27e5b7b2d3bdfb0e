//! Streaming capture of a response.
//!
//! # Design
//! The transport engine reports a transfer as two streams: raw header lines
//! (status lines and the blank terminator included) and raw body chunks.
//! [`collect_header_line`] and [`collect_body_chunk`] fold those streams
//! into a [`Response`]. Neither touches anything but the response it is
//! given, so both are tested here without any network.

use crate::http::Response;

/// Fold one raw header line into `response`.
///
/// The line is classified by its first space or tab:
/// - none at all (the `"\r\n"` terminator, malformed lines): ignored;
/// - preceded by `:`: a header, appended as `(name, trimmed value)`;
/// - otherwise: a status line, replacing `version` and `status`.
pub fn collect_header_line(response: &mut Response, line: &[u8]) {
    let line = String::from_utf8_lossy(line);
    let Some(space) = line.find([' ', '\t']) else {
        return;
    };

    if line[..space].ends_with(':') {
        // The character before `space` is `:`, so a colon exists.
        let Some((name, value)) = line.split_once(':') else {
            return;
        };
        let value = value.split('\r').next().unwrap_or_default().trim();
        response.headers.push((name.to_string(), value.to_string()));
    } else {
        let status_line = line.split(['\r', '\n']).next().unwrap_or_default();
        // The space may sit past a stray CR, leaving no protocol token.
        match status_line.split_once([' ', '\t']) {
            Some((version, status)) => {
                response.version = version.to_string();
                response.status = status.trim_start_matches([' ', '\t']).to_string();
            }
            None => {
                response.version = String::new();
                response.status = status_line.to_string();
            }
        }
    }
}

/// Append one body chunk to `response`, returning the bytes consumed.
///
/// The engine aborts the transfer if the returned count differs from
/// `chunk.len()`.
pub fn collect_body_chunk(response: &mut Response, chunk: &[u8]) -> usize {
    response.body.extend_from_slice(chunk);
    chunk.len()
}

/// Owns the response under construction during one transfer.
#[derive(Debug, Default)]
pub struct Collector {
    response: Response,
}

impl Collector {
    /// Bind a fresh, empty response. Called right before a transfer starts.
    pub fn begin(&mut self) {
        self.response = Response::default();
    }

    pub fn header_line(&mut self, line: &[u8]) {
        collect_header_line(&mut self.response, line);
    }

    pub fn body_chunk(&mut self, chunk: &[u8]) -> usize {
        collect_body_chunk(&mut self.response, chunk)
    }

    /// Hand out the collected response, leaving an empty one behind.
    pub fn finish(&mut self) -> Response {
        std::mem::take(&mut self.response)
    }
}
