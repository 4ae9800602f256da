//! Request head encoder.
//!
//! Writes the request lines exactly in the given order, each terminated by CRLF,
//! followed by the empty line that closes the head. Lines are sent as-is, so a
//! line containing CR or LF would split the head and is rejected.

use bytes::{BufMut, BytesMut};
use tokio_util::codec::Encoder;
use tracing::error;

use crate::protocol::SendError;

/// Initial buffer size allocated for header serialization
const INIT_HEADER_SIZE: usize = 4 * 1024;

/// Encoder for request header lines implementing the [`Encoder`] trait.
#[derive(Debug)]
pub struct HeaderEncoder;

impl<'a> Encoder<&'a [String]> for HeaderEncoder {
    type Error = SendError;

    fn encode(&mut self, lines: &'a [String], dst: &mut BytesMut) -> Result<(), Self::Error> {
        let Some(request_line) = lines.first() else {
            error!("request head without request line");
            return Err(SendError::invalid_head("missing request line"));
        };

        if !request_line.ends_with(" HTTP/1.1") {
            error!(request_line = %request_line, "request line is not HTTP/1.1");
            return Err(SendError::invalid_head(format!("invalid request line {request_line:?}")));
        }

        if let Some(line) = lines.iter().find(|line| line.bytes().any(|b| b == b'\r' || b == b'\n')) {
            error!(line = %line, "request line contains CR or LF");
            return Err(SendError::invalid_head(format!("line contains CR or LF: {line:?}")));
        }

        dst.reserve(INIT_HEADER_SIZE);
        for line in lines {
            dst.put_slice(line.as_bytes());
            dst.put_slice(b"\r\n");
        }
        dst.put_slice(b"\r\n");
        Ok(())
    }
}
