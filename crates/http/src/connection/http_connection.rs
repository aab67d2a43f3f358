use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{error, info, warn};

use crate::codec::RequestDecoder;
use crate::connection::{ConnectionConfig, RequestReader, ResponseWriter};
use crate::handler::{Handler, HandlerError};
use crate::protocol::HttpError;

/// An HTTP connection that serves exactly one request
///
/// `HttpConnection` binds a [`RequestReader`] to the read half of a stream and a
/// [`ResponseWriter`] to the write half:
/// - A request that fails to parse is answered with `400 Bad Request`
/// - A parsed request is passed to the handler, which writes the response
/// - A [`HandlerError`] is answered with its own status and message
///
/// The connection is closed afterwards in every case; there is no keep-alive.
///
/// # Type Parameters
///
/// * `R`: The async readable stream type
/// * `W`: The async writable stream type
#[derive(Debug)]
pub struct HttpConnection<R, W> {
    reader: RequestReader<R>,
    writer: ResponseWriter<W>,
}

impl<R, W> HttpConnection<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self::with_config(reader, writer, ConnectionConfig::default())
    }

    pub fn with_config(reader: R, writer: W, config: ConnectionConfig) -> Self {
        let decoder = RequestDecoder::with_max_header_bytes(config.max_header_bytes());
        Self {
            reader: RequestReader::with_decoder(reader, decoder, config.read_buffer_size()),
            writer: ResponseWriter::new(writer),
        }
    }

    /// Reads one request, answers it and closes the write side.
    ///
    /// # Errors
    ///
    /// - [`HttpError::RequestError`] if the request could not be read or
    ///   parsed; for parse failures a `400` response has already been sent
    /// - [`HttpError::ResponseError`] if writing a response failed
    pub async fn process<H>(mut self, handler: Arc<H>) -> Result<(), HttpError>
    where
        H: Handler + Sync,
    {
        let request = match self.reader.read_request().await {
            Ok(request) => request,
            Err(e) if e.is_io() => {
                error!(cause = %e, "can't read request, connection shutdown");
                return Err(e.into());
            }
            Err(e) => {
                warn!(cause = %e, "malformed request, sending bad request response");
                HandlerError::from(&e).write_to(&mut self.writer).await?;
                self.writer.close().await?;
                return Err(e.into());
            }
        };

        info!(method = %request.method(), path = request.target(), "received request");

        match handler.call(&mut self.writer, &request).await {
            Ok(()) => {
                if !self.writer.finish().await? {
                    warn!(writer_state = ?self.writer.state(), "handler returned before completing the response");
                }
            }
            Err(handler_error) if !self.writer.is_started() => {
                warn!(status = %handler_error.status(), message = handler_error.message(), "handler returned error");
                handler_error.write_to(&mut self.writer).await?;
            }
            Err(handler_error) => {
                // the status line is already out, an error response would corrupt the stream
                error!(
                    cause = %handler_error,
                    writer_state = ?self.writer.state(),
                    "handler failed after starting the response, connection shutdown"
                );
            }
        }

        self.writer.close().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crate::connection::default_headers;
    use crate::protocol::{ParseError, Request};
    use http::StatusCode;

    struct Echo;

    #[async_trait]
    impl Handler for Echo {
        async fn call<W>(&self, writer: &mut ResponseWriter<W>, request: &Request) -> Result<(), HandlerError>
        where
            W: AsyncWrite + Unpin + Send,
        {
            match request.target() {
                "/fail" => Err(HandlerError::internal_server_error("Okay, you know what? This one is on me.")),
                "/half" => {
                    writer.write_status_line(StatusCode::OK).await?;
                    Err(HandlerError::internal_server_error("gave up"))
                }
                "/unfinished" => {
                    writer.write_status_line(StatusCode::OK).await?;
                    Ok(())
                }
                _ => {
                    writer.write_status_line(StatusCode::OK).await?;
                    writer.write_headers(&default_headers(request.body().len())).await?;
                    writer.write_body(request.body()).await?;
                    Ok(())
                }
            }
        }
    }

    async fn serve(input: &[u8]) -> (Result<(), HttpError>, String) {
        let mut output = Vec::new();
        let result = HttpConnection::new(input, &mut output).process(Arc::new(Echo)).await;
        (result, String::from_utf8(output).unwrap())
    }

    #[tokio::test]
    async fn handler_writes_response() {
        let (result, output) = serve(b"POST /echo HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello").await;

        assert!(result.is_ok());
        assert_eq!(
            output,
            "HTTP/1.1 200 OK\r\ncontent-length: 5\r\nconnection: close\r\ncontent-type: text/plain\r\n\r\nhello"
        );
    }

    #[tokio::test]
    async fn parse_error_gets_bad_request() {
        let (result, output) = serve(b"GET / HTTP/1.0\r\n\r\n").await;

        assert!(matches!(result, Err(HttpError::RequestError { source: ParseError::InvalidVersion(_) })));
        assert!(output.starts_with("HTTP/1.1 400 Bad Request\r\n"));
        assert!(output.ends_with("\r\n\r\nmessage: unsupported http version: 1.0"));
    }

    #[tokio::test]
    async fn truncated_body_gets_bad_request() {
        let (result, output) = serve(b"POST /b HTTP/1.1\r\nContent-Length: 4\r\n\r\nabc").await;

        assert!(result.is_err());
        assert!(output.starts_with("HTTP/1.1 400 Bad Request\r\n"));
        assert!(output.contains("message: invalid body: body shorter than content-length"));
    }

    #[tokio::test]
    async fn handler_error_gets_its_status() {
        let (result, output) = serve(b"GET /fail HTTP/1.1\r\n\r\n").await;

        assert!(result.is_ok());
        assert_eq!(
            output,
            "HTTP/1.1 500 Internal Server Error\r\ncontent-length: 48\r\nconnection: close\r\ncontent-type: text/plain\r\n\r\n\
             message: Okay, you know what? This one is on me."
        );
    }

    #[tokio::test]
    async fn handler_error_after_start_writes_nothing_more() {
        let (result, output) = serve(b"GET /half HTTP/1.1\r\n\r\n").await;

        assert!(result.is_ok());
        assert_eq!(output, "HTTP/1.1 200 OK\r\n");
    }

    #[tokio::test]
    async fn unfinished_response_is_left_as_written() {
        let (result, output) = serve(b"GET /unfinished HTTP/1.1\r\n\r\n").await;

        assert!(result.is_ok());
        assert_eq!(output, "HTTP/1.1 200 OK\r\n");
    }
}
