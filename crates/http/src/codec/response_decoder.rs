//! HTTP response decoder module
//!
//! Decodes one response per connection: the head through [`HeaderDecoder`],
//! then the body through the [`PayloadDecoder`] selected by the head.
//!
//! # Example
//!
//! ```
//! use raw_http::codec::ResponseDecoder;
//! use raw_http::protocol::Message;
//! use tokio_util::codec::Decoder;
//! use bytes::BytesMut;
//!
//! let mut decoder = ResponseDecoder::new();
//! let mut buffer = BytesMut::from(&b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\nhi"[..]);
//!
//! let head = decoder.decode(&mut buffer).unwrap().unwrap();
//! assert!(head.is_header());
//! let body = decoder.decode(&mut buffer).unwrap().unwrap();
//! assert!(body.is_payload());
//! ```

use crate::codec::body::PayloadDecoder;
use crate::codec::header::HeaderDecoder;
use crate::protocol::{Message, ParseError, PayloadItem, PayloadSize, ResponseHead};
use bytes::BytesMut;
use tokio_util::codec::Decoder;

/// A decoder for HTTP responses that handles both head and payload
///
/// # State Machine
///
/// The decoder maintains its state through the `payload_decoder` field:
/// - `None`: Currently parsing the head
/// - `Some(PayloadDecoder)`: Currently parsing the payload
///
/// Once the payload reports EOF, the decoder is back at the head state.
#[derive(Debug)]
pub struct ResponseDecoder {
    header_decoder: HeaderDecoder,
    payload_decoder: Option<PayloadDecoder>,
}

impl ResponseDecoder {
    /// Creates a new `ResponseDecoder` instance
    pub fn new() -> Self {
        Default::default()
    }
}

impl Default for ResponseDecoder {
    fn default() -> Self {
        Self { header_decoder: HeaderDecoder::new(), payload_decoder: None }
    }
}

impl ResponseDecoder {
    fn payload_message(&mut self, item: Option<PayloadItem>) -> Option<Message<(ResponseHead, PayloadSize)>> {
        match item {
            Some(item @ PayloadItem::Chunk(_)) => Some(Message::Payload(item)),
            Some(item @ PayloadItem::Eof) => {
                self.payload_decoder.take();
                Some(Message::Payload(item))
            }
            None => None,
        }
    }

    fn header_message(&mut self, item: Option<(ResponseHead, PayloadSize)>) -> Option<Message<(ResponseHead, PayloadSize)>> {
        let (head, payload_size) = item?;
        self.payload_decoder = Some(payload_size.into());
        Some(Message::Header((head, payload_size)))
    }
}

impl Decoder for ResponseDecoder {
    type Item = Message<(ResponseHead, PayloadSize)>;
    type Error = ParseError;

    /// Attempts to decode the next part of a response from the provided buffer
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Message::Header(_)))`: Successfully decoded the response head
    /// - `Ok(Some(Message::Payload(_)))`: Successfully decoded a payload chunk or EOF
    /// - `Ok(None)`: Need more data to proceed
    /// - `Err(_)`: Encountered a parsing error
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(payload_decoder) = &mut self.payload_decoder {
            let item = payload_decoder.decode(src)?;
            return Ok(self.payload_message(item));
        }

        let item = self.header_decoder.decode(src)?;
        Ok(self.header_message(item))
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(payload_decoder) = &mut self.payload_decoder {
            let item = payload_decoder.decode_eof(buf)?;
            return Ok(self.payload_message(item));
        }

        // a stream that ends cleanly after a complete response yields nothing more
        if buf.is_empty() {
            return Ok(None);
        }

        let item = self.header_decoder.decode_eof(buf)?;
        Ok(self.header_message(item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;
    use indoc::indoc;

    fn decode_all(raw: &[u8]) -> Result<(ResponseHead, Vec<u8>), ParseError> {
        let mut decoder = ResponseDecoder::new();
        let mut buffer = BytesMut::from(raw);
        let mut head = None;
        let mut body = Vec::new();

        loop {
            let message = match decoder.decode(&mut buffer)? {
                Some(message) => message,
                None => match decoder.decode_eof(&mut buffer)? {
                    Some(message) => message,
                    None => return Err(ParseError::unexpected_eof("test")),
                },
            };

            match message {
                Message::Header((h, _)) => head = Some(h),
                Message::Payload(PayloadItem::Chunk(bytes)) => body.extend_from_slice(&bytes),
                Message::Payload(PayloadItem::Eof) => return Ok((head.unwrap(), body)),
            }
        }
    }

    #[test]
    fn length_body() {
        let raw = indoc! {"
            HTTP/1.1 200 OK
            Content-Length: 5

            hello"};
        let (head, body) = decode_all(raw.replace('\n', "\r\n").as_bytes()).unwrap();
        assert_eq!(head.status(), StatusCode::OK);
        assert_eq!(body, b"hello");
    }

    #[test]
    fn chunked_body() {
        let raw = b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n4\r\nWiki\r\n5\r\npedia\r\n0\r\n\r\n";
        let (_, body) = decode_all(raw).unwrap();
        assert_eq!(body, b"Wikipedia");
    }

    #[test]
    fn until_close_body() {
        let raw = b"HTTP/1.1 200 OK\r\nConnection: close\r\n\r\nall of it\r\nuntil the end";
        let (_, body) = decode_all(raw).unwrap();
        assert_eq!(body, b"all of it\r\nuntil the end");
    }

    #[test]
    fn eof_without_response() {
        let mut decoder = ResponseDecoder::new();
        let mut buffer = BytesMut::new();
        assert!(decoder.decode_eof(&mut buffer).unwrap().is_none());
    }

    #[test]
    fn eof_inside_head() {
        let mut decoder = ResponseDecoder::new();
        let mut buffer = BytesMut::from(&b"HTTP/1.1 200 OK\r\nServer"[..]);
        assert!(decoder.decode(&mut buffer).unwrap().is_none());
        assert!(matches!(decoder.decode_eof(&mut buffer), Err(ParseError::UnexpectedEof { .. })));
    }
}
