//! Request handler trait and the error a handler reports to the client.
//!
//! A handler receives the parsed [`Request`] together with the connection's
//! [`ResponseWriter`] and writes the whole response itself. Returning a
//! [`HandlerError`] instead asks the connection to answer with that status and
//! message.
//!
//! # Example
//!
//! ```
//! use async_trait::async_trait;
//! use http::StatusCode;
//! use raw_http::connection::{ResponseWriter, default_headers};
//! use raw_http::handler::{Handler, HandlerError};
//! use raw_http::protocol::Request;
//! use tokio::io::AsyncWrite;
//!
//! struct Hello;
//!
//! #[async_trait]
//! impl Handler for Hello {
//!     async fn call<W>(&self, writer: &mut ResponseWriter<W>, _request: &Request) -> Result<(), HandlerError>
//!     where
//!         W: AsyncWrite + Unpin + Send,
//!     {
//!         let body = b"Hello World!";
//!         writer.write_status_line(StatusCode::OK).await?;
//!         writer.write_headers(&default_headers(body.len())).await?;
//!         writer.write_body(body).await?;
//!         Ok(())
//!     }
//! }
//! ```

use async_trait::async_trait;
use http::StatusCode;
use thiserror::Error;
use tokio::io::AsyncWrite;

use crate::connection::{ResponseWriter, default_headers};
use crate::protocol::{ParseError, Request, SendError};

#[async_trait]
pub trait Handler {
    /// Writes the response for `request` to `writer`.
    ///
    /// On `Ok(())` the response must be complete. On `Err` nothing should have
    /// been written yet, so the connection can send the error response.
    async fn call<W>(&self, writer: &mut ResponseWriter<W>, request: &Request) -> Result<(), HandlerError>
    where
        W: AsyncWrite + Unpin + Send;
}

/// A failure a handler wants surfaced to the client as a complete response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{status}: {message}")]
pub struct HandlerError {
    status: StatusCode,
    message: String,
}

impl HandlerError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The plain-text body sent to the client.
    pub fn body(&self) -> String {
        format!("message: {}", self.message)
    }

    /// Writes this error as a complete `text/plain` response.
    ///
    /// # Errors
    ///
    /// Fails with [`SendError::InvalidState`] if `writer` has already started a
    /// response, or with [`SendError::Io`] if writing fails.
    pub async fn write_to<W>(&self, writer: &mut ResponseWriter<W>) -> Result<(), SendError>
    where
        W: AsyncWrite + Unpin,
    {
        let body = self.body();
        writer.write_status_line(self.status).await?;
        writer.write_headers(&default_headers(body.len())).await?;
        writer.write_body(body.as_bytes()).await?;
        Ok(())
    }
}

impl From<&ParseError> for HandlerError {
    fn from(e: &ParseError) -> Self {
        Self::bad_request(e.to_string())
    }
}

/// Lets handlers use `?` on writer calls. A failed write usually means the
/// connection is gone, so the resulting error response is rarely delivered.
impl From<SendError> for HandlerError {
    fn from(e: SendError) -> Self {
        Self::internal_server_error(e.to_string())
    }
}
