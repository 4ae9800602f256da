//! Content decoding of received bodies.
//!
//! Runs after the body is completely framed, never while framing, so the framing
//! always sees the encoded length.

use std::io;
use std::io::Read;

use bytes::Bytes;
use flate2::read::{GzDecoder, ZlibDecoder};
use tracing::{trace, warn};

use crate::protocol::ResponseHead;

/// Represents the content encodings that can be undone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Decoder {
    /// Gzip encoding.
    Gzip,
    /// Deflate encoding (zlib wrapped).
    Deflate,
}

impl Decoder {
    /// Selects a decoder based on the `Content-Encoding` header.
    fn select(head: &ResponseHead) -> Option<Self> {
        let encoding = head.get("content-encoding")?;
        if encoding.eq_ignore_ascii_case("gzip") || encoding.eq_ignore_ascii_case("x-gzip") {
            Some(Self::Gzip)
        } else if encoding.eq_ignore_ascii_case("deflate") {
            Some(Self::Deflate)
        } else {
            if !encoding.eq_ignore_ascii_case("identity") {
                warn!(content_encoding = encoding, "unsupported content encoding, body left as received");
            }
            None
        }
    }

    /// Returns the name of the encoding.
    fn name(self) -> &'static str {
        match self {
            Decoder::Gzip => "gzip",
            Decoder::Deflate => "deflate",
        }
    }

    /// Drains the whole decompressed stream into a new buffer.
    fn decode(self, body: &[u8]) -> io::Result<Vec<u8>> {
        let mut decompressed = Vec::with_capacity(body.len() * 2);
        match self {
            Decoder::Gzip => GzDecoder::new(body).read_to_end(&mut decompressed)?,
            Decoder::Deflate => ZlibDecoder::new(body).read_to_end(&mut decompressed)?,
        };
        Ok(decompressed)
    }
}

/// Undoes the `Content-Encoding` of a framed body, or returns it unchanged when
/// it is not encoded with a supported scheme.
///
/// Corrupt compressed data is returned as an error.
pub fn decode_body(head: &ResponseHead, body: Bytes) -> io::Result<Bytes> {
    let Some(decoder) = Decoder::select(head) else {
        return Ok(body);
    };

    // bodiless responses may still carry the header
    if body.is_empty() {
        return Ok(body);
    }

    let decompressed = decoder.decode(&body)?;
    trace!(encoding = decoder.name(), encoded = body.len(), decoded = decompressed.len(), "decompressed body");
    Ok(Bytes::from(decompressed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::{GzEncoder, ZlibEncoder};
    use http::StatusCode;
    use std::io::Write;

    const PLAIN: &[u8] = b"<html><body>hello hello hello hello, compressed world</body></html>";

    fn head(encoding: Option<&str>) -> ResponseHead {
        let mut head = ResponseHead::new(StatusCode::OK, "HTTP/1.1 200 OK".to_string());
        if let Some(encoding) = encoding {
            head.push_line(format!("Content-Encoding: {encoding}"));
        }
        head
    }

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn gzip_round_trip() {
        let body = Bytes::from(gzip(PLAIN));
        let decoded = decode_body(&head(Some("gzip")), body).unwrap();
        assert_eq!(&decoded[..], PLAIN);
    }

    #[test]
    fn deflate_round_trip() {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(PLAIN).unwrap();
        let body = Bytes::from(encoder.finish().unwrap());

        let decoded = decode_body(&head(Some("deflate")), body).unwrap();
        assert_eq!(&decoded[..], PLAIN);
    }

    #[test]
    fn passthrough() {
        let body = Bytes::from_static(PLAIN);
        assert_eq!(decode_body(&head(None), body.clone()).unwrap(), body);
        assert_eq!(decode_body(&head(Some("br")), body.clone()).unwrap(), body);
    }

    #[test]
    fn empty_encoded_body() {
        assert!(decode_body(&head(Some("gzip")), Bytes::new()).unwrap().is_empty());
    }

    #[test]
    fn corrupt_gzip_is_an_error() {
        let body = Bytes::from_static(b"definitely not gzip");
        assert!(decode_body(&head(Some("gzip")), body).is_err());
    }
}
