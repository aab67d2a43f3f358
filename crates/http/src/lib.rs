//! HTTP/1.1 request parsing and response writing over raw byte streams
//!
//! This crate reads a single HTTP/1.1 request from any [`AsyncRead`](tokio::io::AsyncRead),
//! hands it to a handler, and lets the handler write the response section by
//! section to any [`AsyncWrite`](tokio::io::AsyncWrite). One request per
//! connection, then the connection is closed.
//!
//! # Features
//!
//! - Incremental request parsing that is independent of how the input is fragmented
//! - `Content-Length` bodies, validated against the bytes actually received
//! - Fixed-length and chunked responses, with trailers
//! - Out-of-order response writes rejected by an explicit writer state machine
//! - A small TCP server with a graceful `close`
//!
//! # Example
//!
//! ```no_run
//! use async_trait::async_trait;
//! use http::StatusCode;
//! use raw_http::connection::{ResponseWriter, default_headers};
//! use raw_http::handler::{Handler, HandlerError};
//! use raw_http::protocol::Request;
//! use raw_http::server::{Server, ServerConfig};
//! use tokio::io::AsyncWrite;
//! use tracing::{Level, error, info};
//! use tracing_subscriber::FmtSubscriber;
//!
//! struct HelloWorld;
//!
//! #[async_trait]
//! impl Handler for HelloWorld {
//!     async fn call<W>(&self, writer: &mut ResponseWriter<W>, request: &Request) -> Result<(), HandlerError>
//!     where
//!         W: AsyncWrite + Unpin + Send,
//!     {
//!         info!(path = request.target(), "request path");
//!
//!         let body = b"Hello World!\r\n";
//!         writer.write_status_line(StatusCode::OK).await?;
//!         writer.write_headers(&default_headers(body.len())).await?;
//!         writer.write_body(body).await?;
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
//!     tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
//!
//!     let config = match ServerConfig::builder().address("127.0.0.1:42069").build() {
//!         Ok(config) => config,
//!         Err(e) => {
//!             error!(cause = %e, "invalid server config");
//!             return;
//!         }
//!     };
//!
//!     let server = match Server::serve(config, HelloWorld).await {
//!         Ok(server) => server,
//!         Err(e) => {
//!             error!(cause = %e, "bind server error");
//!             return;
//!         }
//!     };
//!
//!     let _ = tokio::signal::ctrl_c().await;
//!     if let Err(e) = server.close().await {
//!         error!(cause = %e, "failed to close server");
//!     }
//! }
//! ```
//!
//! # Architecture
//!
//! - [`protocol`]: request, header and error types
//! - [`codec`]: pure byte-level decoding and encoding, no I/O
//! - [`connection`]: drives the codecs over a stream pair
//! - [`handler`]: the trait a response producer implements
//! - [`server`]: TCP accept loop and its configuration
//!
//! ## Error Handling
//!
//! - [`protocol::HttpError`]: top-level error of a connection
//! - [`protocol::ParseError`]: the request could not be read; answered with `400`
//! - [`protocol::SendError`]: the response could not be written
//! - [`handler::HandlerError`]: a handler's own status and message
//! - [`server::ServerError`]: configuration and listener failures
//!
//! # Limitations
//!
//! - HTTP/1.1 only, and only `GET`, `POST`, `PUT`, `PATCH` and `DELETE`
//! - No keep-alive, pipelining or chunked request bodies
//! - Request line plus headers limited to 8KB by default
//! - No connection cap and no idle timeouts

pub mod codec;
pub mod connection;
pub mod handler;
pub mod protocol;
pub mod server;

mod utils;
pub(crate) use utils::ensure;
