use bytes::{BufMut, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio_util::codec::Decoder;
use tracing::trace;

use crate::codec::RequestDecoder;
use crate::protocol::{ParseError, Request};

/// Initial capacity of the read buffer; it doubles each time it fills up.
pub const DEFAULT_READ_BUFFER_SIZE: usize = 1024;

/// Drives a [`RequestDecoder`] from an async byte stream.
///
/// Every read appends to a buffer of `buffer_size` bytes, the decoder consumes
/// what it can, and the consumed bytes are dropped from the front. When the
/// unconsumed bytes fill the whole buffer its size is doubled, so a long line
/// costs a logarithmic number of reallocations.
#[derive(Debug)]
pub struct RequestReader<R> {
    reader: R,
    decoder: RequestDecoder,
    buffer: BytesMut,
    buffer_size: usize,
}

impl<R> RequestReader<R>
where
    R: AsyncRead + Unpin,
{
    pub fn new(reader: R) -> Self {
        Self::with_decoder(reader, RequestDecoder::new(), DEFAULT_READ_BUFFER_SIZE)
    }

    pub fn with_decoder(reader: R, decoder: RequestDecoder, buffer_size: usize) -> Self {
        let buffer_size = buffer_size.max(1);
        Self { reader, decoder, buffer: BytesMut::with_capacity(buffer_size), buffer_size }
    }

    /// Current size of the read buffer. Starts at the configured size and
    /// doubles every time a read finds it full.
    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Reads until one request is complete or the stream ends.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Io`] if reading fails, and any other
    /// [`ParseError`] if the bytes received do not form a valid request.
    pub async fn read_request(&mut self) -> Result<Request, ParseError> {
        loop {
            if self.buffer.len() >= self.buffer_size {
                self.buffer_size *= 2;
                trace!(buffer_size = self.buffer_size, "grew read buffer");
            }

            let free = self.buffer_size - self.buffer.len();
            self.buffer.reserve(free);
            let n = self.reader.read_buf(&mut (&mut self.buffer).limit(free)).await.map_err(ParseError::io)?;

            if n == 0 {
                trace!(buffered = self.buffer.len(), "stream ended, finishing request");
                return self
                    .decoder
                    .decode_eof(&mut self.buffer)?
                    .ok_or_else(|| ParseError::incomplete_request("request already read from this stream"));
            }

            if let Some(request) = self.decoder.decode(&mut self.buffer)? {
                return Ok(request);
            }
        }
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

/// Reads a single request from `reader` with the default limits.
pub async fn read_request<R>(reader: R) -> Result<Request, ParseError>
where
    R: AsyncRead + Unpin,
{
    RequestReader::new(reader).read_request().await
}
