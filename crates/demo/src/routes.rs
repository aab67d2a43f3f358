//! Routes of the demo server.
//!
//! - `/yourproblem`: `400` with an HTML page
//! - `/myproblem`: `500` with an HTML page
//! - `/stream/<n>`: `n` JSON lines, chunked, with SHA-256 and length trailers
//! - anything else: `200` with an HTML page

use std::collections::BTreeMap;

use async_trait::async_trait;
use http::StatusCode;
use http::header::{CONTENT_LENGTH, CONTENT_TYPE, TRAILER, TRANSFER_ENCODING};
use raw_http::connection::{ResponseWriter, default_headers};
use raw_http::handler::{Handler, HandlerError};
use raw_http::protocol::{Headers, Request};
use serde::Serialize;
use sha2::{Digest, Sha256};
use tokio::io::AsyncWrite;
use tracing::info;

/// Upper bound for `/stream/<n>`.
pub const MAX_STREAM_LINES: usize = 100;

const STREAM_PREFIX: &str = "/stream/";

const BAD_REQUEST_PAGE: &str = r"<html>
  <head>
    <title>400 Bad Request</title>
  </head>
  <body>
    <h1>Bad Request</h1>
    <p>Your request honestly kinda sucked.</p>
  </body>
</html>";

const INTERNAL_SERVER_ERROR_PAGE: &str = r"<html>
  <head>
    <title>500 Internal Server Error</title>
  </head>
  <body>
    <h1>Internal Server Error</h1>
    <p>Okay, you know what? This one is on me.</p>
  </body>
</html>";

const OK_PAGE: &str = r"<html>
  <head>
    <title>200 OK</title>
  </head>
  <body>
    <h1>Success!</h1>
    <p>Your request was an absolute banger.</p>
  </body>
</html>";

#[derive(Debug, Clone, Copy, Default)]
pub struct DemoHandler;

#[async_trait]
impl Handler for DemoHandler {
    async fn call<W>(&self, writer: &mut ResponseWriter<W>, request: &Request) -> Result<(), HandlerError>
    where
        W: AsyncWrite + Unpin + Send,
    {
        let target = request.target();

        if let Some(lines) = target.strip_prefix(STREAM_PREFIX) {
            let lines = parse_stream_lines(lines)?;
            return write_stream(writer, request, lines).await;
        }

        let (status, page) = match target {
            "/yourproblem" => (StatusCode::BAD_REQUEST, BAD_REQUEST_PAGE),
            "/myproblem" => (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_SERVER_ERROR_PAGE),
            _ => (StatusCode::OK, OK_PAGE),
        };
        write_html(writer, status, page).await
    }
}

async fn write_html<W>(writer: &mut ResponseWriter<W>, status: StatusCode, page: &str) -> Result<(), HandlerError>
where
    W: AsyncWrite + Unpin + Send,
{
    let mut headers = default_headers(page.len());
    headers.replace(CONTENT_TYPE.as_str(), mime::TEXT_HTML.as_ref());

    writer.write_status_line(status).await?;
    writer.write_headers(&headers).await?;
    writer.write_body(page.as_bytes()).await?;
    Ok(())
}

fn parse_stream_lines(raw: &str) -> Result<usize, HandlerError> {
    match raw.parse::<usize>() {
        Ok(lines) if (1..=MAX_STREAM_LINES).contains(&lines) => Ok(lines),
        _ => Err(HandlerError::bad_request(format!("stream length must be between 1 and {MAX_STREAM_LINES}, got {raw:?}"))),
    }
}

/// One line of the `/stream/<n>` body.
#[derive(Debug, Serialize)]
struct StreamLine<'a> {
    id: usize,
    url: &'a str,
    method: &'static str,
    headers: BTreeMap<&'a str, &'a str>,
}

async fn write_stream<W>(writer: &mut ResponseWriter<W>, request: &Request, lines: usize) -> Result<(), HandlerError>
where
    W: AsyncWrite + Unpin + Send,
{
    let mut headers = default_headers(0);
    headers.remove(CONTENT_LENGTH.as_str());
    headers.replace(CONTENT_TYPE.as_str(), mime::APPLICATION_JSON.as_ref());
    headers.set(TRANSFER_ENCODING.as_str(), "chunked");
    headers.set(TRAILER.as_str(), "X-Content-SHA256, X-Content-Length");

    // serialize before the status line goes out so a failure is still reportable
    let request_headers = request.headers().iter().collect::<BTreeMap<_, _>>();
    let mut chunks = Vec::with_capacity(lines);
    for id in 0..lines {
        let line = StreamLine { id, url: request.target(), method: request.method().as_str(), headers: request_headers.clone() };
        let mut chunk = serde_json::to_vec(&line).map_err(|e| HandlerError::internal_server_error(e.to_string()))?;
        chunk.push(b'\n');
        chunks.push(chunk);
    }

    writer.write_status_line(StatusCode::OK).await?;
    writer.write_headers(&headers).await?;

    let mut hasher = Sha256::new();
    for chunk in &chunks {
        writer.write_chunked_body(chunk).await?;
        hasher.update(chunk);
    }
    writer.write_chunked_body_done().await?;

    let mut trailers = Headers::new();
    trailers.set("X-Content-SHA256", &format!("{:x}", hasher.finalize()));
    trailers.set("X-Content-Length", &writer.chunked_size().to_string());
    writer.write_trailers(&trailers).await?;

    info!(lines, body_size = writer.chunked_size(), "streamed response");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use raw_http::protocol::{Method, RequestLine};

    fn request(target: &str) -> Request {
        let mut headers = Headers::new();
        headers.set("Host", "localhost:42069");
        Request::new(RequestLine::new(Method::Get, target, "1.1"), headers, Default::default())
    }

    async fn respond(target: &str) -> Result<String, HandlerError> {
        let mut writer = ResponseWriter::new(Vec::new());
        DemoHandler.call(&mut writer, &request(target)).await?;
        Ok(String::from_utf8(writer.into_inner()).unwrap())
    }

    #[tokio::test]
    async fn success_page() {
        let response = respond("/").await.unwrap();

        assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(response.contains(&format!("content-length: {}\r\n", OK_PAGE.len())));
        assert!(response.contains("content-type: text/html\r\n"));
        assert!(!response.contains("text/plain"));
        assert!(response.ends_with(OK_PAGE));
    }

    #[tokio::test]
    async fn problem_pages() {
        let response = respond("/yourproblem").await.unwrap();
        assert!(response.starts_with("HTTP/1.1 400 Bad Request\r\n"));
        assert!(response.ends_with(BAD_REQUEST_PAGE));

        let response = respond("/myproblem").await.unwrap();
        assert!(response.starts_with("HTTP/1.1 500 Internal Server Error\r\n"));
        assert!(response.ends_with(INTERNAL_SERVER_ERROR_PAGE));
    }

    #[tokio::test]
    async fn stream_lines_with_trailers() {
        let response = respond("/stream/3").await.unwrap();
        let (head, body) = response.split_once("\r\n\r\n").unwrap();

        assert!(head.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(head.contains("transfer-encoding: chunked"));
        assert!(head.contains("trailer: X-Content-SHA256, X-Content-Length"));
        assert!(head.contains("content-type: application/json"));
        assert!(!head.contains("content-length"));

        let mut payload = Vec::new();
        let mut rest = body;
        loop {
            let (size, after) = rest.split_once("\r\n").unwrap();
            let size = usize::from_str_radix(size, 16).unwrap();
            if size == 0 {
                rest = after;
                break;
            }
            payload.extend_from_slice(&after.as_bytes()[..size]);
            rest = &after[size + 2..];
        }

        let lines = std::str::from_utf8(&payload).unwrap().lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 3);
        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["id"], 0);
        assert_eq!(first["url"], "/stream/3");
        assert_eq!(first["headers"]["host"], "localhost:42069");

        let expected_hash = format!("{:x}", Sha256::digest(&payload));
        assert_eq!(rest, format!("x-content-sha256: {expected_hash}\r\nx-content-length: {}\r\n\r\n", payload.len()));
    }

    #[tokio::test]
    async fn bad_stream_length() {
        for target in ["/stream/0", "/stream/101", "/stream/abc", "/stream/"] {
            let error = respond(target).await.unwrap_err();
            assert_eq!(error.status(), StatusCode::BAD_REQUEST, "{target}");
        }
    }
}
