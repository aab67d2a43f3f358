//! HTTP request decoder module
//!
//! This module turns a growing byte buffer into a [`Request`] using a small,
//! line-oriented state machine. Bytes may arrive in fragments of any size: each
//! parse step either consumes a complete unit (request line, header line, body
//! bytes) or consumes nothing and waits for more input.
//!
//! # States
//!
//! ```text
//! Initialized -> ParsingHeaders -> ParsingBody -> Done
//! ```
//!
//! - `Initialized`: waiting for the request line
//! - `ParsingHeaders`: one header line per step until the blank line
//! - `ParsingBody`: accumulating exactly `Content-Length` bytes, if declared
//! - `Done`: terminal, the request has been produced
//!
//! # Example
//!
//! ```
//! use bytes::BytesMut;
//! use raw_http::codec::RequestDecoder;
//! use tokio_util::codec::Decoder;
//!
//! let mut decoder = RequestDecoder::new();
//! let mut buffer = BytesMut::from("GET /a HTTP/1.1\r\nHost: x\r\n\r\n");
//! let request = decoder.decode(&mut buffer).unwrap().unwrap();
//!
//! assert_eq!(request.target(), "/a");
//! assert_eq!(request.headers().get("host"), Some("x"));
//! ```

use std::mem;

use bytes::{Buf, BytesMut};
use tokio_util::codec::Decoder;
use tracing::trace;

use crate::ensure;
use crate::protocol::{Headers, Method, ParseError, Request, RequestLine};
use crate::utils::{CRLF, find_crlf};

/// Default limit for the request line plus the header section, in bytes.
pub const DEFAULT_MAX_HEADER_BYTES: usize = 8 * 1024;

/// The only protocol version accepted in the request line.
const SUPPORTED_VERSION: &str = "1.1";

/// Where the decoder is within the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    Initialized,
    ParsingHeaders,
    ParsingBody,
    Done,
}

/// An incremental decoder for one HTTP/1.1 request.
///
/// The decoder owns the pieces of the request while it is being parsed and
/// hands out a complete [`Request`] once it reaches [`ParserState::Done`].
/// After that it is spent: further decoding is an error.
#[derive(Debug)]
pub struct RequestDecoder {
    state: ParserState,
    max_header_bytes: usize,
    header_bytes: usize,
    request_line: Option<RequestLine>,
    headers: Headers,
    body: BytesMut,
}

impl RequestDecoder {
    /// Creates a new `RequestDecoder` instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a decoder that rejects requests whose request line and header
    /// section together exceed `max_header_bytes`.
    pub fn with_max_header_bytes(max_header_bytes: usize) -> Self {
        Self {
            state: ParserState::Initialized,
            max_header_bytes,
            header_bytes: 0,
            request_line: None,
            headers: Headers::new(),
            body: BytesMut::new(),
        }
    }

    pub fn state(&self) -> ParserState {
        self.state
    }

    /// Runs parse steps over `src` until a step needs more input, the request
    /// is done, or an error occurs.
    ///
    /// # Returns
    ///
    /// The number of bytes of `src` consumed. The caller must drop them before
    /// calling again with more input.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a step, or
    /// [`ParseError::TooLargeHeader`] if the unfinished header section already
    /// exceeds the limit.
    pub fn parse(&mut self, src: &[u8]) -> Result<usize, ParseError> {
        let mut parsed = 0;

        while self.state != ParserState::Done {
            let n = self.parse_step(&src[parsed..])?;
            if n == 0 {
                break;
            }
            parsed += n;
        }

        // an unterminated line still counts against the header limit
        if matches!(self.state, ParserState::Initialized | ParserState::ParsingHeaders) {
            let pending = self.header_bytes + (src.len() - parsed);
            ensure!(pending <= self.max_header_bytes, ParseError::too_large_header(pending, self.max_header_bytes));
        }

        Ok(parsed)
    }

    /// Performs a single state transition against the start of `src`.
    ///
    /// # Returns
    ///
    /// The number of bytes consumed, zero meaning more input is needed (or,
    /// in `ParsingBody` without a declared length, that the body is empty).
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if:
    /// - The request line is malformed, or uses an unsupported method or version
    /// - A header line is malformed
    /// - `Content-Length` is not a base-10 integer or the body exceeds it
    /// - The decoder is already [`ParserState::Done`]
    pub fn parse_step(&mut self, src: &[u8]) -> Result<usize, ParseError> {
        match self.state {
            ParserState::Initialized => {
                let Some((request_line, n)) = parse_request_line(src)? else {
                    return Ok(0);
                };
                self.count_header_bytes(n)?;

                trace!(request_line = %request_line, "parsed request line");
                self.request_line = Some(request_line);
                self.state = ParserState::ParsingHeaders;
                Ok(n)
            }

            ParserState::ParsingHeaders => {
                let (n, done) = self.headers.parse_line(src)?;
                self.count_header_bytes(n)?;

                if done {
                    trace!(header_count = self.headers.len(), header_bytes = self.header_bytes, "parsed header section");
                    self.state = ParserState::ParsingBody;
                }
                Ok(n)
            }

            ParserState::ParsingBody => {
                let Some(content_length) = self.headers.content_length()? else {
                    self.state = ParserState::Done;
                    return Ok(0);
                };

                self.body.extend_from_slice(src);
                ensure!(
                    self.body.len() <= content_length,
                    ParseError::invalid_body(format!("body length {} exceeds content-length {content_length}", self.body.len()))
                );

                if self.body.len() == content_length {
                    trace!(body_size = content_length, "parsed body");
                    self.state = ParserState::Done;
                }
                Ok(src.len())
            }

            ParserState::Done => Err(ParseError::InvalidState),
        }
    }

    fn count_header_bytes(&mut self, n: usize) -> Result<(), ParseError> {
        let total = self.header_bytes + n;
        ensure!(total <= self.max_header_bytes, ParseError::too_large_header(total, self.max_header_bytes));
        self.header_bytes = total;
        Ok(())
    }

    /// Applies the end-of-stream rules: a declared body must be complete,
    /// anything else is accepted as it stands.
    fn finish_at_eof(&mut self) -> Result<(), ParseError> {
        if self.state == ParserState::ParsingBody {
            if let Some(content_length) = self.headers.content_length()? {
                ensure!(
                    self.body.len() >= content_length,
                    ParseError::invalid_body(format!(
                        "body shorter than content-length: {} < {content_length}",
                        self.body.len()
                    ))
                );
            }
        }

        self.state = ParserState::Done;
        Ok(())
    }

    fn take_request(&mut self) -> Result<Request, ParseError> {
        let request_line = self
            .request_line
            .take()
            .ok_or_else(|| ParseError::incomplete_request("stream ended before a complete request line"))?;

        Ok(Request::new(request_line, mem::take(&mut self.headers), self.body.split().freeze()))
    }
}

impl Default for RequestDecoder {
    fn default() -> Self {
        Self::with_max_header_bytes(DEFAULT_MAX_HEADER_BYTES)
    }
}

impl Decoder for RequestDecoder {
    type Item = Request;
    type Error = ParseError;

    /// Attempts to decode an HTTP request from the provided buffer
    ///
    /// Consumed bytes are removed from the front of `src`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(request))`: the request is complete
    /// - `Ok(None)`: need more data to proceed
    /// - `Err(_)`: encountered a parsing error
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        ensure!(self.state != ParserState::Done, ParseError::InvalidState);

        let parsed = self.parse(src)?;
        src.advance(parsed);

        if self.state == ParserState::Done {
            return self.take_request().map(Some);
        }
        Ok(None)
    }

    /// Makes a final parse attempt over the buffered bytes, then validates the
    /// request against the end-of-stream rules.
    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if self.state == ParserState::Done {
            return Ok(None);
        }

        let parsed = self.parse(buf)?;
        buf.advance(parsed);

        if self.state != ParserState::Done {
            self.finish_at_eof()?;
        }
        self.take_request().map(Some)
    }
}

/// Parses `METHOD SP TARGET SP HTTP/1.1 CRLF` from the start of `src`.
///
/// Returns `Ok(None)` if no complete line is buffered yet, otherwise the
/// request line and the number of bytes it occupies including the CRLF.
fn parse_request_line(src: &[u8]) -> Result<Option<(RequestLine, usize)>, ParseError> {
    let Some(line_end) = find_crlf(src) else {
        return Ok(None);
    };

    let line = std::str::from_utf8(&src[..line_end])
        .map_err(|e| ParseError::invalid_request_line(format!("request line is not utf-8: {e}")))?;

    let mut parts = line.split(' ');
    let (Some(method), Some(target), Some(version), None) = (parts.next(), parts.next(), parts.next(), parts.next()) else {
        return Err(ParseError::invalid_request_line(format!("expected 3 space separated parts in {line:?}")));
    };

    let method = method.parse::<Method>()?;
    ensure!(!target.is_empty(), ParseError::invalid_request_line("empty request target"));

    let version = version
        .strip_prefix("HTTP/")
        .ok_or_else(|| ParseError::invalid_request_line(format!("malformed http version {version:?}")))?;
    ensure!(version == SUPPORTED_VERSION, ParseError::InvalidVersion(version.to_owned()));

    Ok(Some((RequestLine::new(method, target, version), line_end + CRLF.len())))
}
