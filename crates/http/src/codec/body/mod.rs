//! HTTP body encoding for chunked responses
//!
//! Fixed-length bodies are written verbatim by the response writer; only the
//! chunked framing needs an encoder.
//!
//! - [`ChunkedEncoder`]: frames [`PayloadItem`](crate::protocol::PayloadItem)s as
//!   chunks and writes the last-chunk marker

mod chunked_encoder;

pub use chunked_encoder::ChunkedEncoder;
