//! Decoder implementation for response payloads.
//!
//! Dispatches to the framing chosen from the response head:
//! - Chunked transfer encoding
//! - Content-Length based payloads
//! - Payloads that run until the peer closes the connection

use crate::codec::body::chunked_decoder::ChunkedDecoder;
use crate::codec::body::length_decoder::LengthDecoder;
use crate::protocol::{ParseError, PayloadItem, PayloadSize};
use bytes::BytesMut;
use tokio_util::codec::Decoder;

/// A unified decoder for handling response payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadDecoder {
    /// The specific decoding strategy to use
    kind: Kind,
}

/// Enum representing different payload decoding strategies.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Kind {
    /// Decode payload with a fixed content length
    Length(LengthDecoder),

    /// Decode payload using chunked transfer encoding
    Chunked(ChunkedDecoder),

    /// Take everything until end of stream; `finished` once Eof was handed out
    UntilClose { finished: bool },
}

impl PayloadDecoder {
    /// Creates a PayloadDecoder for chunked transfer encoding.
    pub fn chunked() -> Self {
        Self { kind: Kind::Chunked(ChunkedDecoder::new()) }
    }

    /// Creates a PayloadDecoder for a fixed-length payload.
    pub fn fix_length(size: u64) -> Self {
        Self { kind: Kind::Length(LengthDecoder::new(size)) }
    }

    /// Creates a PayloadDecoder that reads until the connection closes.
    pub fn until_close() -> Self {
        Self { kind: Kind::UntilClose { finished: false } }
    }
}

impl From<PayloadSize> for PayloadDecoder {
    fn from(payload_size: PayloadSize) -> Self {
        match payload_size {
            PayloadSize::Chunked => PayloadDecoder::chunked(),
            PayloadSize::Length(length) => PayloadDecoder::fix_length(length),
            PayloadSize::UntilClose => PayloadDecoder::until_close(),
        }
    }
}

/// Delegates to the appropriate decoder based on the payload type.
impl Decoder for PayloadDecoder {
    type Item = PayloadItem;
    type Error = ParseError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match &mut self.kind {
            Kind::Length(length_decoder) => length_decoder.decode(src),
            Kind::Chunked(chunked_decoder) => chunked_decoder.decode(src),
            Kind::UntilClose { .. } => {
                if src.is_empty() {
                    return Ok(None);
                }
                Ok(Some(PayloadItem::Chunk(src.split().freeze())))
            }
        }
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match &mut self.kind {
            Kind::Length(length_decoder) => length_decoder.decode_eof(buf),
            Kind::Chunked(chunked_decoder) => chunked_decoder.decode_eof(buf),
            Kind::UntilClose { finished } => {
                if !buf.is_empty() {
                    return Ok(Some(PayloadItem::Chunk(buf.split().freeze())));
                }
                if *finished {
                    return Ok(None);
                }
                *finished = true;
                Ok(Some(PayloadItem::Eof))
            }
        }
    }
}
