//! HTTP header encoder implementation for serializing header sections
//!
//! This module writes a [`Headers`] collection as `name: value\r\n` lines
//! followed by the blank line that ends the section. The same framing is used
//! for the response header section and for the trailer section that follows a
//! chunked body.

use crate::protocol::{Headers, SendError};

use bytes::{BufMut, BytesMut};
use tokio_util::codec::Encoder;

use crate::utils::CRLF;

/// Encoder for header and trailer sections implementing the [`Encoder`] trait.
///
/// Names are written as stored, which is lower-case. A name or value holding
/// `\r` or `\n` fails with [`SendError::InvalidHeader`] and nothing is encoded.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderEncoder;

impl Encoder<&Headers> for HeaderEncoder {
    type Error = SendError;

    /// Encodes every header line plus the terminating blank line into `dst`.
    fn encode(&mut self, headers: &Headers, dst: &mut BytesMut) -> Result<(), Self::Error> {
        if let Some((name, _)) = headers.iter().find(|(name, value)| has_line_break(name) || has_line_break(value)) {
            return Err(SendError::invalid_header(name.escape_debug()));
        }

        let size = headers.iter().map(|(name, value)| name.len() + value.len() + 4).sum::<usize>() + CRLF.len();
        dst.reserve(size);

        for (name, value) in headers {
            dst.put_slice(name.as_bytes());
            dst.put_slice(b": ");
            dst.put_slice(value.as_bytes());
            dst.put_slice(CRLF);
        }
        dst.put_slice(CRLF);
        Ok(())
    }
}

fn has_line_break(s: &str) -> bool {
    s.bytes().any(|b| b == b'\r' || b == b'\n')
}
