//! Request encoder: the head lines, the empty line, then the raw body if any.
//!
//! Bodies are always sent as-is after the head. The client never uses chunked
//! request bodies, so `Content-Length` must already be among the lines.

use bytes::{BufMut, BytesMut};
use tokio_util::codec::Encoder;

use crate::codec::header::HeaderEncoder;
use crate::protocol::{RequestHead, SendError};

#[derive(Debug)]
pub struct RequestEncoder {
    header_encoder: HeaderEncoder,
}

impl RequestEncoder {
    pub fn new() -> Self {
        Default::default()
    }
}

impl Default for RequestEncoder {
    fn default() -> Self {
        Self { header_encoder: HeaderEncoder }
    }
}

impl Encoder<RequestHead> for RequestEncoder {
    type Error = SendError;

    fn encode(&mut self, item: RequestHead, dst: &mut BytesMut) -> Result<(), Self::Error> {
        self.header_encoder.encode(item.lines(), dst)?;
        if let Some(body) = item.body() {
            dst.put_slice(body);
        }
        Ok(())
    }
}
