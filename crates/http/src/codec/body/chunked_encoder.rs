//! Encoder for HTTP chunked transfer encoding.
//!
//! Implements the chunk framing of
//! [RFC 7230 Section 4.1](https://tools.ietf.org/html/rfc7230#section-4.1):
//! every chunk is prefixed by its size in lower-case hexadecimal and followed
//! by CRLF. The last-chunk marker is written on its own so trailers can follow
//! it directly.

use crate::protocol::{PayloadItem, SendError};
use bytes::{Buf, BufMut, BytesMut};
use std::io::Write;

use tokio_util::codec::Encoder;

use crate::utils::CRLF;

/// The zero-size chunk that ends a chunked body. The trailer section,
/// including its blank line, is written after it.
const LAST_CHUNK: &[u8] = b"0\r\n";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChunkedEncoder {
    eof: bool,
    send_size: usize,
}

impl ChunkedEncoder {
    pub fn new() -> Self {
        Self { eof: false, send_size: 0 }
    }

    /// Total payload bytes encoded so far, excluding framing.
    pub fn send_size(&self) -> usize {
        self.send_size
    }
}

impl<D: Buf> Encoder<PayloadItem<D>> for ChunkedEncoder {
    type Error = SendError;

    fn encode(&mut self, item: PayloadItem<D>, dst: &mut BytesMut) -> Result<(), Self::Error> {
        if self.eof {
            return Ok(());
        }

        match item {
            PayloadItem::Chunk(mut bytes) => {
                let size = bytes.remaining();
                write!(helper::Writer(dst), "{size:x}\r\n")?;
                dst.reserve(size + CRLF.len());
                while bytes.has_remaining() {
                    let chunk = bytes.chunk();
                    let len = chunk.len();
                    dst.put_slice(chunk);
                    bytes.advance(len);
                }
                dst.put_slice(CRLF);
                self.send_size += size;
                Ok(())
            }
            PayloadItem::Eof => {
                self.eof = true;
                dst.put_slice(LAST_CHUNK);
                Ok(())
            }
        }
    }
}

mod helper {
    use bytes::{BufMut, BytesMut};
    use std::io;

    pub struct Writer<'a>(pub &'a mut BytesMut);

    impl io::Write for Writer<'_> {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.put_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn test_basic_chunk() {
        let mut encoder = ChunkedEncoder::new();
        let mut dst = BytesMut::new();

        encoder.encode(PayloadItem::Chunk(&b"abc"[..]), &mut dst).unwrap();

        assert_eq!(&dst[..], b"3\r\nabc\r\n");
        assert_eq!(encoder.send_size(), 3);
    }

    #[test]
    fn test_size_is_lower_hex() {
        let mut encoder = ChunkedEncoder::new();
        let mut dst = BytesMut::new();

        encoder.encode(PayloadItem::Chunk(Bytes::from(vec![b'x'; 255])), &mut dst).unwrap();

        assert!(dst.starts_with(b"ff\r\n"));
        assert!(dst.ends_with(b"x\r\n"));
        assert_eq!(dst.len(), 4 + 255 + 2);
    }

    #[test]
    fn test_empty_chunk() {
        let mut encoder = ChunkedEncoder::new();
        let mut dst = BytesMut::new();

        encoder.encode(PayloadItem::Chunk(&b""[..]), &mut dst).unwrap();

        assert_eq!(&dst[..], b"0\r\n\r\n");
        assert_eq!(encoder, ChunkedEncoder::new());
    }

    #[test]
    fn test_eof_is_last_chunk_only() {
        let mut encoder = ChunkedEncoder::new();
        let mut dst = BytesMut::new();

        encoder.encode(PayloadItem::Chunk(&b"hello"[..]), &mut dst).unwrap();
        encoder.encode(PayloadItem::<&[u8]>::Eof, &mut dst).unwrap();

        // nothing is written once the last chunk went out
        encoder.encode(PayloadItem::Chunk(&b"late"[..]), &mut dst).unwrap();

        assert_eq!(&dst[..], b"5\r\nhello\r\n0\r\n");
    }
}
