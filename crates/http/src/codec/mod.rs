//! HTTP codec module for decoding requests and encoding responses
//!
//! The codec layer is pure: it moves bytes between [`BytesMut`](bytes::BytesMut)
//! buffers and protocol types and never touches I/O. The connection layer owns
//! the streams and drives these codecs.
//!
//! # Architecture
//!
//! - Request handling:
//!   - [`RequestDecoder`]: incremental request parser, driven line by line
//!     through [`Headers::parse_line`](crate::protocol::Headers::parse_line)
//!
//! - Response handling:
//!   - [`StatusLineEncoder`]: `HTTP/1.1 <code> <reason>` status lines
//!   - [`HeaderEncoder`]: header and trailer sections
//!   - [`ChunkedEncoder`]: chunked transfer encoding framing
//!
//! # Example
//!
//! ```
//! use bytes::BytesMut;
//! use http::StatusCode;
//! use raw_http::codec::StatusLineEncoder;
//! use tokio_util::codec::Encoder;
//!
//! let mut buffer = BytesMut::new();
//! StatusLineEncoder.encode(StatusCode::OK, &mut buffer).unwrap();
//! assert_eq!(&buffer[..], b"HTTP/1.1 200 OK\r\n");
//! ```

mod body;
mod header;
mod request_decoder;
mod status_encoder;

pub use body::ChunkedEncoder;
pub use header::HeaderEncoder;
pub use request_decoder::{DEFAULT_MAX_HEADER_BYTES, ParserState, RequestDecoder};
pub use status_encoder::{StatusLineEncoder, reason_phrase};
