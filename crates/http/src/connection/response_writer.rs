use bytes::BytesMut;
use http::StatusCode;
use http::header::{CONNECTION, CONTENT_LENGTH, CONTENT_TYPE};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio_util::codec::Encoder;

use crate::codec::{ChunkedEncoder, HeaderEncoder, StatusLineEncoder};
use crate::protocol::{Headers, PayloadItem, SendError};

/// Capacity of the scratch buffer sections are encoded into before writing.
const INIT_BUFFER_SIZE: usize = 4 * 1024;

/// Which section of the response the writer expects next.
///
/// ```text
/// BeforeStatus -> BeforeHeaders -> BeforeBody -+-> Body ---------------------> (complete)
///                                              +-> Chunked -> Trailers -> Done
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriterState {
    BeforeStatus,
    BeforeHeaders,
    BeforeBody,
    /// A fixed body is being written; more body writes may follow.
    Body,
    /// Chunks are being written; more chunks or the last-chunk marker may follow.
    Chunked,
    /// The last-chunk marker went out; only the trailer section may follow.
    Trailers,
    Done,
}

/// Writes one HTTP/1.1 response to `W`, section by section.
///
/// Each call encodes its section, writes it and flushes, so the first I/O
/// error surfaces at the call that caused it. Calls made out of order fail
/// with [`SendError::InvalidState`] without writing anything.
///
/// A fixed-length response is `write_status_line`, `write_headers`, then
/// `write_body`. A chunked response replaces the body with any number of
/// `write_chunked_body` calls, `write_chunked_body_done` and `write_trailers`.
#[derive(Debug)]
pub struct ResponseWriter<W> {
    writer: W,
    buffer: BytesMut,
    state: WriterState,
    chunked_encoder: ChunkedEncoder,
}

impl<W> ResponseWriter<W>
where
    W: AsyncWrite + Unpin,
{
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            buffer: BytesMut::with_capacity(INIT_BUFFER_SIZE),
            state: WriterState::BeforeStatus,
            chunked_encoder: ChunkedEncoder::new(),
        }
    }

    pub fn state(&self) -> WriterState {
        self.state
    }

    /// Returns true once any part of the response has been written.
    pub fn is_started(&self) -> bool {
        self.state != WriterState::BeforeStatus
    }

    pub async fn write_status_line(&mut self, status: StatusCode) -> Result<(), SendError> {
        self.expect("write_status_line", &[WriterState::BeforeStatus])?;

        StatusLineEncoder.encode(status, &mut self.buffer)?;
        self.flush_buffer().await?;

        self.state = WriterState::BeforeHeaders;
        Ok(())
    }

    pub async fn write_headers(&mut self, headers: &Headers) -> Result<(), SendError> {
        self.expect("write_headers", &[WriterState::BeforeHeaders])?;

        HeaderEncoder.encode(headers, &mut self.buffer)?;
        self.flush_buffer().await?;

        self.state = WriterState::BeforeBody;
        Ok(())
    }

    /// Writes `body` verbatim. The caller keeps it consistent with the
    /// `Content-Length` header it sent. May be called repeatedly.
    pub async fn write_body(&mut self, body: &[u8]) -> Result<usize, SendError> {
        self.expect("write_body", &[WriterState::BeforeBody, WriterState::Body])?;

        self.writer.write_all(body).await?;
        self.writer.flush().await?;

        self.state = WriterState::Body;
        Ok(body.len())
    }

    /// Writes `body` as one chunk and returns the number of payload bytes written.
    ///
    /// An empty `body` produces `0\r\n\r\n`.
    pub async fn write_chunked_body(&mut self, body: &[u8]) -> Result<usize, SendError> {
        self.expect("write_chunked_body", &[WriterState::BeforeBody, WriterState::Chunked])?;

        self.chunked_encoder.encode(PayloadItem::Chunk(body), &mut self.buffer)?;
        self.flush_buffer().await?;

        self.state = WriterState::Chunked;
        Ok(body.len())
    }

    /// Writes the `0\r\n` last-chunk marker. The trailer section follows it.
    pub async fn write_chunked_body_done(&mut self) -> Result<(), SendError> {
        self.expect("write_chunked_body_done", &[WriterState::BeforeBody, WriterState::Chunked])?;

        self.chunked_encoder.encode(PayloadItem::<&[u8]>::Eof, &mut self.buffer)?;
        self.flush_buffer().await?;

        self.state = WriterState::Trailers;
        Ok(())
    }

    /// Writes the trailer fields and the blank line that ends a chunked message.
    pub async fn write_trailers(&mut self, trailers: &Headers) -> Result<(), SendError> {
        self.expect("write_trailers", &[WriterState::Trailers])?;

        HeaderEncoder.encode(trailers, &mut self.buffer)?;
        self.flush_buffer().await?;

        self.state = WriterState::Done;
        Ok(())
    }

    /// Total chunk payload bytes written so far.
    pub fn chunked_size(&self) -> usize {
        self.chunked_encoder.send_size()
    }

    /// Returns true once a body has been written or a chunked response has
    /// ended with its trailer section.
    pub fn is_complete(&self) -> bool {
        matches!(self.state, WriterState::Body | WriterState::Done)
    }

    /// Flushes the stream and reports whether the response is complete.
    pub async fn finish(&mut self) -> Result<bool, SendError> {
        self.writer.flush().await?;
        Ok(self.is_complete())
    }

    /// Flushes and shuts down the write side of the stream.
    pub async fn close(&mut self) -> Result<(), SendError> {
        self.writer.flush().await?;
        self.writer.shutdown().await?;
        Ok(())
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn expect(&self, operation: &'static str, allowed: &[WriterState]) -> Result<(), SendError> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(SendError::invalid_state(operation, self.state))
        }
    }

    async fn flush_buffer(&mut self) -> Result<(), SendError> {
        let result = self.writer.write_all(&self.buffer).await;
        self.buffer.clear();
        result?;

        Ok(self.writer.flush().await?)
    }
}

/// The headers every plain response starts from: `content-length`,
/// `connection: close` and `content-type: text/plain`.
///
/// Handlers adjust the result, e.g. `replace` the content type or swap the
/// length for `transfer-encoding: chunked`.
pub fn default_headers(content_length: usize) -> Headers {
    let mut headers = Headers::new();
    headers.set(CONTENT_LENGTH.as_str(), &content_length.to_string());
    headers.set(CONNECTION.as_str(), "close");
    headers.set(CONTENT_TYPE.as_str(), mime::TEXT_PLAIN.as_ref());
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixed_length_response() {
        let mut writer = ResponseWriter::new(Vec::new());
        let body = b"Hello World!";

        writer.write_status_line(StatusCode::OK).await.unwrap();
        writer.write_headers(&default_headers(body.len())).await.unwrap();
        assert!(!writer.finish().await.unwrap());
        assert_eq!(writer.write_body(body).await.unwrap(), 12);
        assert_eq!(writer.state(), WriterState::Body);
        assert!(writer.finish().await.unwrap());

        let expected = "HTTP/1.1 200 OK\r\n\
            content-length: 12\r\n\
            connection: close\r\n\
            content-type: text/plain\r\n\
            \r\n\
            Hello World!";
        assert_eq!(String::from_utf8(writer.into_inner()).unwrap(), expected);
    }

    #[tokio::test]
    async fn body_in_pieces() {
        let mut writer = ResponseWriter::new(Vec::new());
        writer.write_status_line(StatusCode::OK).await.unwrap();
        writer.write_headers(&default_headers(6)).await.unwrap();
        writer.write_body(b"abc").await.unwrap();
        writer.write_body(b"def").await.unwrap();

        assert!(writer.into_inner().ends_with(b"\r\n\r\nabcdef"));
    }

    #[tokio::test]
    async fn chunked_response_with_trailers() {
        let mut writer = ResponseWriter::new(Vec::new());

        let mut headers = default_headers(0);
        headers.remove("content-length");
        headers.set("Transfer-Encoding", "chunked");
        headers.set("Trailer", "X-Content-Length");

        writer.write_status_line(StatusCode::OK).await.unwrap();
        writer.write_headers(&headers).await.unwrap();
        assert_eq!(writer.write_chunked_body(b"hello ").await.unwrap(), 6);
        assert_eq!(writer.write_chunked_body(b"world").await.unwrap(), 5);
        writer.write_chunked_body_done().await.unwrap();
        assert_eq!(writer.state(), WriterState::Trailers);

        let mut trailers = Headers::new();
        trailers.set("X-Content-Length", &writer.chunked_size().to_string());
        assert!(!writer.is_complete());
        writer.write_trailers(&trailers).await.unwrap();
        assert_eq!(writer.state(), WriterState::Done);
        assert!(writer.is_complete());

        let expected = "HTTP/1.1 200 OK\r\n\
            connection: close\r\n\
            content-type: text/plain\r\n\
            transfer-encoding: chunked\r\n\
            trailer: X-Content-Length\r\n\
            \r\n\
            6\r\nhello \r\n\
            5\r\nworld\r\n\
            0\r\n\
            x-content-length: 11\r\n\
            \r\n";
        assert_eq!(String::from_utf8(writer.into_inner()).unwrap(), expected);
    }

    #[tokio::test]
    async fn chunk_framing() {
        let mut writer = ResponseWriter::new(Vec::new());
        writer.write_status_line(StatusCode::OK).await.unwrap();
        writer.write_headers(&Headers::new()).await.unwrap();
        let prefix = writer.get_mut().len();

        writer.write_chunked_body(b"abc").await.unwrap();
        assert_eq!(&writer.get_mut()[prefix..], b"3\r\nabc\r\n");

        let prefix = writer.get_mut().len();
        assert_eq!(writer.write_chunked_body(b"").await.unwrap(), 0);
        assert_eq!(&writer.get_mut()[prefix..], b"0\r\n\r\n");

        let prefix = writer.get_mut().len();
        writer.write_chunked_body_done().await.unwrap();
        assert_eq!(&writer.get_mut()[prefix..], b"0\r\n");
    }

    #[tokio::test]
    async fn unknown_status_has_empty_reason() {
        let mut writer = ResponseWriter::new(Vec::new());
        writer.write_status_line(StatusCode::IM_A_TEAPOT).await.unwrap();

        assert_eq!(writer.into_inner(), b"HTTP/1.1 418 \r\n");
    }

    #[tokio::test]
    async fn out_of_order_calls_are_rejected() {
        let mut writer = ResponseWriter::new(Vec::new());

        let result = writer.write_headers(&Headers::new()).await;
        assert!(matches!(result, Err(SendError::InvalidState { operation: "write_headers", state: WriterState::BeforeStatus })));
        assert!(writer.write_body(b"x").await.is_err());
        assert!(writer.write_chunked_body(b"x").await.is_err());
        assert!(writer.get_mut().is_empty());

        writer.write_status_line(StatusCode::OK).await.unwrap();
        assert!(writer.write_status_line(StatusCode::OK).await.is_err());
        assert!(writer.write_trailers(&Headers::new()).await.is_err());

        writer.write_headers(&Headers::new()).await.unwrap();
        writer.write_body(b"x").await.unwrap();
        assert!(writer.write_chunked_body(b"y").await.is_err());
        assert!(writer.write_chunked_body_done().await.is_err());

        assert_eq!(writer.into_inner(), b"HTTP/1.1 200 OK\r\n\r\nx");
    }

    #[tokio::test]
    async fn no_body_after_chunks() {
        let mut writer = ResponseWriter::new(Vec::new());
        writer.write_status_line(StatusCode::OK).await.unwrap();
        writer.write_headers(&Headers::new()).await.unwrap();
        writer.write_chunked_body(b"a").await.unwrap();

        assert!(writer.write_body(b"b").await.is_err());
        assert!(writer.write_trailers(&Headers::new()).await.is_err());

        writer.write_chunked_body_done().await.unwrap();
        assert!(writer.write_chunked_body(b"c").await.is_err());
    }

    #[tokio::test]
    async fn trailer_with_line_break_is_not_written() {
        let mut writer = ResponseWriter::new(Vec::new());
        writer.write_status_line(StatusCode::OK).await.unwrap();
        writer.write_headers(&Headers::new()).await.unwrap();
        writer.write_chunked_body_done().await.unwrap();
        let prefix = writer.get_mut().len();

        let mut trailers = Headers::new();
        trailers.set("X-Checksum", "abc\r\n\r\nHTTP/1.1 200 OK");
        let result = writer.write_trailers(&trailers).await;

        assert!(matches!(result, Err(SendError::InvalidHeader { .. })));
        assert_eq!(writer.state(), WriterState::Trailers);
        assert_eq!(writer.get_mut().len(), prefix);

        writer.write_trailers(&Headers::new()).await.unwrap();
        assert!(writer.get_mut().ends_with(b"0\r\n\r\n"));
    }

    #[test]
    fn default_headers_values() {
        let headers = default_headers(42);

        assert_eq!(headers.get("Content-Length"), Some("42"));
        assert_eq!(headers.get("Connection"), Some("close"));
        assert_eq!(headers.get("Content-Type"), Some("text/plain"));
        assert_eq!(headers.len(), 3);
    }
}
