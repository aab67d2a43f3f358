//! Core HTTP protocol types.
//!
//! - **Headers**: the case-insensitive [`Headers`] collection and
//!   its incremental line parser
//! - **Requests**: [`Method`], [`RequestLine`] and the parsed [`Request`]
//! - **Payload**: [`PayloadItem`], the unit fed to the chunked encoder
//! - **Errors**: [`ParseError`] for the request side, [`SendError`] for
//!   the response side and [`HttpError`] wrapping both

mod message;
pub use message::PayloadItem;

mod headers;
pub use headers::Headers;

mod request;
pub use request::Method;
pub use request::Request;
pub use request::RequestLine;

mod error;
pub use error::HttpError;
pub use error::ParseError;
pub use error::SendError;
