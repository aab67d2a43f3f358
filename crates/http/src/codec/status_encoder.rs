use bytes::{BufMut, BytesMut};
use http::StatusCode;
use tokio_util::codec::Encoder;

use crate::protocol::SendError;
use crate::utils::CRLF;

/// Encodes `HTTP/1.1 <code> <reason>\r\n`.
///
/// Only the statuses this server produces itself carry a reason phrase; any
/// other code is written with an empty one, which HTTP/1.1 permits.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusLineEncoder;

impl Encoder<StatusCode> for StatusLineEncoder {
    type Error = SendError;

    fn encode(&mut self, status: StatusCode, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let reason = reason_phrase(status);

        dst.reserve(9 + 3 + 1 + reason.len() + CRLF.len());
        dst.put_slice(b"HTTP/1.1 ");
        dst.put_slice(status.as_str().as_bytes());
        dst.put_u8(b' ');
        dst.put_slice(reason.as_bytes());
        dst.put_slice(CRLF);
        Ok(())
    }
}

pub fn reason_phrase(status: StatusCode) -> &'static str {
    match status {
        StatusCode::OK => "OK",
        StatusCode::BAD_REQUEST => "Bad Request",
        StatusCode::INTERNAL_SERVER_ERROR => "Internal Server Error",
        _ => "",
    }
}
