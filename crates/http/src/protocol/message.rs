use bytes::{Buf, Bytes};

/// Represents an item in a chunked response body.
///
/// The chunked encoder turns `Chunk` into one size-prefixed chunk and `Eof`
/// into the zero-size terminator that precedes the trailers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadItem<Data: Buf = Bytes> {
    /// A chunk of payload data
    Chunk(Data),
    /// Marks the end of the payload stream
    Eof,
}
