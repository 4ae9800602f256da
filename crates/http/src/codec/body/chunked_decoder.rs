//! Decoder implementation for HTTP chunked transfer encoding.
//!
//! This module decodes response bodies sent with chunked transfer encoding
//! as specified in [RFC 7230 Section 4.1](https://tools.ietf.org/html/rfc7230#section-4.1).
//!
//! Each chunk is a hexadecimal size line, optionally followed by `;extensions`,
//! then exactly that many data bytes and a CRLF. A zero size chunk ends the body,
//! after which trailer lines are skipped up to the final empty line.

use bytes::{Buf, BytesMut};
use tokio_util::codec::Decoder;
use tracing::trace;
use ChunkedState::*;

use crate::codec::line_decoder::LineDecoder;
use crate::protocol::{ParseError, PayloadItem};

/// A decoder for handling HTTP chunked transfer encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkedDecoder {
    state: ChunkedState,
    line_decoder: LineDecoder,
}

impl ChunkedDecoder {
    /// Creates a new ChunkedDecoder instance, ready to read the size of the first chunk.
    pub fn new() -> Self {
        Self { state: Size, line_decoder: LineDecoder::new() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChunkedState {
    /// Read the chunk size line
    Size,
    /// Read chunk data, with the number of bytes left in this chunk
    Body(u64),
    /// Read the CRLF after chunk data
    BodyCrlf,
    /// Skip trailer lines after the last chunk
    Trailer,
    /// Final state after the empty line following the last chunk
    End,
}

impl Decoder for ChunkedDecoder {
    type Item = PayloadItem;
    type Error = ParseError;

    /// Decodes chunked transfer encoded data from the input buffer.
    ///
    /// # Returns
    /// - `Ok(Some(PayloadItem::Chunk(bytes)))` when chunk data is available
    /// - `Ok(Some(PayloadItem::Eof))` when the final chunk and trailers are processed
    /// - `Ok(None)` when more data is needed
    /// - `Err(ParseError)` if the chunked encoding is invalid
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        loop {
            self.state = match self.state {
                Size => match self.line_decoder.decode(src)? {
                    Some(line) => match parse_chunk_size(&line)? {
                        0 => Trailer,
                        size => Body(size),
                    },
                    None => return Ok(None),
                },

                Body(remaining) => {
                    if src.is_empty() {
                        return Ok(None);
                    }

                    // cap remaining bytes at the max capacity of usize
                    let read_size = usize::try_from(remaining).unwrap_or(usize::MAX).min(src.len());
                    let bytes = src.split_to(read_size).freeze();
                    let remaining = remaining - read_size as u64;

                    self.state = if remaining == 0 { BodyCrlf } else { Body(remaining) };
                    trace!(len = bytes.len(), "read chunked bytes");
                    return Ok(Some(PayloadItem::Chunk(bytes)));
                }

                BodyCrlf => {
                    if src.len() < 2 {
                        return Ok(None);
                    }
                    if &src[..2] != b"\r\n" {
                        return Err(ParseError::invalid_chunk_body("chunk data not followed by CRLF"));
                    }
                    src.advance(2);
                    Size
                }

                Trailer => match self.line_decoder.decode(src)? {
                    Some(line) if line.is_empty() => End,
                    Some(line) => {
                        trace!(trailer = %String::from_utf8_lossy(&line), "skip chunked trailer");
                        Trailer
                    }
                    None => return Ok(None),
                },

                End => {
                    trace!("finished reading chunked data");
                    return Ok(Some(PayloadItem::Eof));
                }
            };
        }
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(item) = self.decode(buf)? {
            return Ok(Some(item));
        }

        // tolerate peers that close right after the last chunk without the final empty line
        if self.state == Trailer && buf.is_empty() {
            self.state = End;
            return self.decode(buf);
        }

        Err(ParseError::unexpected_eof("chunked body"))
    }
}

/// Parses a chunk size line: hex digits, optional whitespace, optional `;extension`.
fn parse_chunk_size(line: &[u8]) -> Result<u64, ParseError> {
    let size = match line.iter().position(|b| *b == b';') {
        Some(index) => &line[..index],
        None => line,
    };
    let size = size.trim_ascii();

    if size.is_empty() || !size.iter().all(u8::is_ascii_hexdigit) {
        return Err(ParseError::invalid_chunk_size(String::from_utf8_lossy(line)));
    }

    // only ascii hex digits remain, so this can fail only on overflow
    std::str::from_utf8(size)
        .ok()
        .and_then(|size| u64::from_str_radix(size, 16).ok())
        .ok_or_else(|| ParseError::invalid_chunk_size(String::from_utf8_lossy(line)))
}
