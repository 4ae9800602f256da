//! Response head decoder: status line, header lines and framing selection.
//!
//! The head is read line by line with [`LineDecoder`]:
//!
//! 1. The status line must start with `HTTP/1.1` and split into version, code and
//!    reason. The code must be a valid status code.
//! 2. Header lines are collected until the empty line.
//! 3. The body framing is chosen from the collected headers, in priority order:
//!    chunked transfer-encoding, a parsable `Content-Length`, reading until close
//!    when the connection is not keep-alive. A keep-alive response with neither
//!    length nor chunking can't be framed and is rejected.
//!
//! # Limits
//!
//! - Maximum number of header lines: 100
//! - Maximum size of the whole head: 64KB

use bytes::BytesMut;
use http::StatusCode;
use tokio_util::codec::Decoder;
use tracing::trace;

use crate::codec::line_decoder::LineDecoder;
use crate::ensure;
use crate::protocol::{ParseError, PayloadSize, ResponseHead};

/// Maximum number of header lines allowed in a response
const MAX_HEADER_NUM: usize = 100;

/// Maximum size in bytes allowed for the entire header section
const MAX_HEADER_BYTES: usize = 64 * 1024;

const HTTP_11: &str = "HTTP/1.1";

/// Decoder for HTTP response heads implementing the [`Decoder`] trait.
///
/// Yields the parsed [`ResponseHead`] together with the [`PayloadSize`] that tells
/// the payload decoder how the body is framed.
#[derive(Debug, Default)]
pub struct HeaderDecoder {
    line_decoder: LineDecoder,
    head: Option<ResponseHead>,
    head_bytes: usize,
}

impl HeaderDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    fn on_line(&mut self, line: &[u8]) -> Result<Option<(ResponseHead, PayloadSize)>, ParseError> {
        self.head_bytes += line.len() + 2;
        ensure!(self.head_bytes <= MAX_HEADER_BYTES, ParseError::too_large_header(self.head_bytes, MAX_HEADER_BYTES));

        let line = String::from_utf8_lossy(line).into_owned();

        let Some(head) = &mut self.head else {
            trace!(status_line = %line, "read status line");
            self.head = Some(parse_status_line(line)?);
            return Ok(None);
        };

        if !line.is_empty() {
            ensure!(head.header_lines().len() < MAX_HEADER_NUM, ParseError::too_many_headers(MAX_HEADER_NUM));
            head.push_line(line);
            return Ok(None);
        }

        // blank line ends the head
        let head = self.head.take().ok_or_else(|| ParseError::invalid_status_line(""))?;
        self.head_bytes = 0;
        let payload_size = parse_payload(&head)?;
        trace!(status = head.status().as_u16(), ?payload_size, "parsed response head");
        Ok(Some((head, payload_size)))
    }
}

impl Decoder for HeaderDecoder {
    type Item = (ResponseHead, PayloadSize);
    type Error = ParseError;

    /// Attempts to decode a complete response head from the buffer.
    ///
    /// # Returns
    ///
    /// - `Ok(Some((head, payload_size)))` once the blank line after the headers is read
    /// - `Ok(None)` if more data is needed
    /// - `Err(ParseError)` if the head is malformed or exceeds the limits
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        while let Some(line) = self.line_decoder.decode(src)? {
            if let Some(item) = self.on_line(&line)? {
                return Ok(Some(item));
            }
        }

        let pending = self.head_bytes + src.len();
        ensure!(pending <= MAX_HEADER_BYTES, ParseError::too_large_header(pending, MAX_HEADER_BYTES));
        Ok(None)
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match self.decode(buf)? {
            Some(item) => Ok(Some(item)),
            None => Err(ParseError::unexpected_eof("response head")),
        }
    }
}

/// Parses `HTTP/1.1 <code> <reason>`. The reason phrase may contain spaces or be empty.
fn parse_status_line(line: String) -> Result<ResponseHead, ParseError> {
    if !line.starts_with(HTTP_11) {
        return Err(ParseError::invalid_status_line(line));
    }

    let mut tokens = line.splitn(3, ' ');
    let (Some(_version), Some(code), Some(_reason)) = (tokens.next(), tokens.next(), tokens.next()) else {
        return Err(ParseError::invalid_status_line(line));
    };

    let status = match code.parse::<u16>().ok().and_then(|code| StatusCode::from_u16(code).ok()) {
        Some(status) => status,
        None => return Err(ParseError::invalid_status_line(line)),
    };

    Ok(ResponseHead::new(status, line))
}

/// Determines the body framing of a response.
///
/// `Transfer-Encoding: chunked` wins over `Content-Length`. A `Content-Length`
/// that isn't a non-negative integer counts as absent.
fn parse_payload(head: &ResponseHead) -> Result<PayloadSize, ParseError> {
    if head.get_all("transfer-encoding").any(is_chunked) {
        return Ok(PayloadSize::Chunked);
    }

    if let Some(length) = content_length(head) {
        return Ok(PayloadSize::Length(length));
    }

    if !head.has_token("connection", "keep-alive") {
        return Ok(PayloadSize::UntilClose);
    }

    Err(ParseError::UnknownLength)
}

fn content_length(head: &ResponseHead) -> Option<u64> {
    head.get("content-length")?.parse::<u64>().ok()
}

/// Checks if a Transfer-Encoding value indicates chunked encoding.
///
/// According to RFC 7230, chunked must be the last encoding if present.
fn is_chunked(value: &str) -> bool {
    value.rsplit(',').next().is_some_and(|last| last.trim().eq_ignore_ascii_case("chunked"))
}
