//! CRLF line decoder used for the status line, header lines and chunk size lines.
//!
//! The decoder consumes bytes up to and including the terminating CRLF and never
//! past it, so whatever follows a line (a body, the next chunk) stays in the
//! buffer for the next decoder.
//!
//! Line endings are matched pairwise: a `\r` that is not followed by `\n` is kept
//! as content together with the byte after it, and scanning continues behind
//! both. A bare `\n` is ordinary content.

use bytes::{Bytes, BytesMut};
use tokio_util::codec::Decoder;

use crate::ensure;
use crate::protocol::ParseError;

/// Maximum length of a single line, terminator excluded
pub(crate) const MAX_LINE_BYTES: usize = 64 * 1024;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineDecoder {
    /// Offset of the next byte to examine in the pending buffer
    cursor: usize,
}

impl LineDecoder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Decoder for LineDecoder {
    type Item = Bytes;
    type Error = ParseError;

    /// Returns the next line without its CRLF, or `Ok(None)` when the terminator
    /// has not arrived yet.
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let mut i = self.cursor;
        while i < src.len() {
            if src[i] != b'\r' {
                i += 1;
                continue;
            }

            // the byte after CR decides; wait for it
            if i + 1 >= src.len() {
                break;
            }

            if src[i + 1] == b'\n' {
                self.cursor = 0;
                let mut line = src.split_to(i + 2);
                line.truncate(i);
                return Ok(Some(line.freeze()));
            }

            i += 2;
        }

        self.cursor = i;
        ensure!(src.len() <= MAX_LINE_BYTES, ParseError::too_long_line(MAX_LINE_BYTES));
        Ok(None)
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match self.decode(buf)? {
            Some(line) => Ok(Some(line)),
            None if buf.is_empty() => Ok(None),
            None => Err(ParseError::unexpected_eof("line")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic() {
        let mut buffer = BytesMut::from(&b"HTTP/1.1 200 OK\r\nHost: a\r\n\r\nbody"[..]);
        let mut decoder = LineDecoder::new();

        assert_eq!(&decoder.decode(&mut buffer).unwrap().unwrap()[..], b"HTTP/1.1 200 OK");
        assert_eq!(&decoder.decode(&mut buffer).unwrap().unwrap()[..], b"Host: a");
        assert_eq!(&decoder.decode(&mut buffer).unwrap().unwrap()[..], b"");

        // nothing after the blank line is consumed
        assert_eq!(&buffer[..], b"body");
    }

    #[test]
    fn test_partial_line() {
        let mut buffer = BytesMut::from(&b"Content-Le"[..]);
        let mut decoder = LineDecoder::new();

        assert!(decoder.decode(&mut buffer).unwrap().is_none());

        buffer.extend_from_slice(b"ngth: 5\r");
        assert!(decoder.decode(&mut buffer).unwrap().is_none());

        buffer.extend_from_slice(b"\n12345");
        assert_eq!(&decoder.decode(&mut buffer).unwrap().unwrap()[..], b"Content-Length: 5");
        assert_eq!(&buffer[..], b"12345");
    }

    #[test]
    fn test_lone_cr_is_content() {
        let mut buffer = BytesMut::from(&b"a\rb\r\n"[..]);
        let mut decoder = LineDecoder::new();
        assert_eq!(&decoder.decode(&mut buffer).unwrap().unwrap()[..], b"a\rb");
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_cr_pairs_are_consumed_together() {
        // the first CR swallows the second, so the LF after it is content
        let mut buffer = BytesMut::from(&b"a\r\r\nb\r\n"[..]);
        let mut decoder = LineDecoder::new();
        assert_eq!(&decoder.decode(&mut buffer).unwrap().unwrap()[..], b"a\r\r\nb");
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_bare_lf_is_content() {
        let mut buffer = BytesMut::from(&b"a\nb\r\n"[..]);
        let mut decoder = LineDecoder::new();
        assert_eq!(&decoder.decode(&mut buffer).unwrap().unwrap()[..], b"a\nb");
    }

    #[test]
    fn test_too_long_line() {
        let mut buffer = BytesMut::from(&vec![b'a'; MAX_LINE_BYTES + 1][..]);
        let mut decoder = LineDecoder::new();
        assert!(matches!(decoder.decode(&mut buffer), Err(ParseError::TooLongLine { .. })));
    }

    #[test]
    fn test_eof() {
        let mut decoder = LineDecoder::new();

        let mut empty = BytesMut::new();
        assert!(decoder.decode_eof(&mut empty).unwrap().is_none());

        let mut partial = BytesMut::from(&b"HTTP/1.1 2"[..]);
        assert!(matches!(decoder.decode_eof(&mut partial), Err(ParseError::UnexpectedEof { .. })));
    }
}
