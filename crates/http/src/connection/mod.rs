//! HTTP connection handling module
//!
//! This module owns the I/O side of the crate: it drives the codecs over a
//! stream pair and runs the request/response exchange for one connection.
//!
//! # Components
//!
//! - [`RequestReader`]: reads from an [`AsyncRead`](tokio::io::AsyncRead) into a
//!   growing buffer and feeds the [`RequestDecoder`](crate::codec::RequestDecoder)
//! - [`ResponseWriter`]: writes a response section by section, enforcing the
//!   section order with [`WriterState`]
//! - [`HttpConnection`]: one request, one response, then close:
//!   - Malformed requests are answered with `400 Bad Request`
//!   - Parsed requests go to a [`Handler`](crate::handler::Handler)
//!   - Handler errors are answered with their own status
//!
//! There is no keep-alive and no pipelining.

mod config;
mod http_connection;
mod request_reader;
mod response_writer;

pub use config::ConnectionConfig;
pub use http_connection::HttpConnection;
pub use request_reader::{DEFAULT_READ_BUFFER_SIZE, RequestReader, read_request};
pub use response_writer::{ResponseWriter, WriterState, default_headers};
