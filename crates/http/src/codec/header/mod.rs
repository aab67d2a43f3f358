//! HTTP header section encoding
//!
//! Header parsing lives on [`Headers`](crate::protocol::Headers) itself because
//! the request decoder drives it one line at a time; this module holds the
//! serializing side.
//!
//! - [`HeaderEncoder`]: writes a header or trailer section to bytes

mod header_encoder;

pub use header_encoder::HeaderEncoder;
