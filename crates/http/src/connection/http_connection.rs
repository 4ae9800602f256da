use bytes::BytesMut;
use futures::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{debug, error, warn};

use crate::codec::{RequestEncoder, ResponseDecoder};
use crate::decompress::decode_body;
use crate::protocol::{HttpError, Message, ParseError, PayloadItem, RequestHead, RequestResult, Response};

const READ_CAPACITY: usize = 8 * 1024;

/// One request/response exchange over a pair of byte streams.
///
/// The connection writes a single [`RequestHead`] and reads back a single
/// response. Protocol anomalies are reported as [`RequestResult`] variants;
/// only I/O and decompression failures come back as [`HttpError`].
///
/// # Type Parameters
///
/// * `R`: The async readable stream type
/// * `W`: The async writable stream type
#[derive(Debug)]
pub struct HttpConnection<R, W> {
    framed_read: FramedRead<R, ResponseDecoder>,
    framed_write: FramedWrite<W, RequestEncoder>,
}

impl<R, W> HttpConnection<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            framed_read: FramedRead::with_capacity(reader, ResponseDecoder::new(), READ_CAPACITY),
            framed_write: FramedWrite::new(writer, RequestEncoder::new()),
        }
    }

    /// Sends the request and waits for the complete response.
    pub async fn request(mut self, head: RequestHead) -> Result<RequestResult, HttpError> {
        self.send(head).await?;
        self.receive().await
    }

    /// Writes the head and body, then flushes the underlying writer.
    pub async fn send(&mut self, head: RequestHead) -> Result<(), HttpError> {
        debug!(request_line = head.request_line().unwrap_or_default(), "sending request");
        self.framed_write.send(head).await?;
        Ok(())
    }

    /// Reads one response and frames its body.
    ///
    /// The body is collected in full before the `Content-Encoding` is undone,
    /// so framing always sees the bytes as they were sent.
    pub async fn receive(&mut self) -> Result<RequestResult, HttpError> {
        let head = match self.framed_read.next().await {
            Some(Ok(Message::Header((head, payload_size)))) => {
                debug!(status = %head.status(), ?payload_size, "received response head");
                head
            }
            Some(Ok(Message::Payload(_))) => {
                warn!("payload arrived before the response head");
                return Ok(RequestResult::InvalidResponse);
            }
            Some(Err(ParseError::UnknownLength)) => {
                warn!("keep-alive response without content length or chunked encoding");
                return Ok(RequestResult::UnknownLength);
            }
            Some(Err(e)) if e.is_head_error() || matches!(e, ParseError::UnexpectedEof { .. }) => {
                warn!(cause = %e, "invalid response head");
                return Ok(RequestResult::InvalidResponse);
            }
            Some(Err(e)) => {
                error!(cause = %e, "failed to read response head");
                return Err(e.into());
            }
            None => {
                warn!("connection closed before any response");
                return Ok(RequestResult::InvalidResponse);
            }
        };

        let mut body = BytesMut::new();
        loop {
            match self.framed_read.next().await {
                Some(Ok(Message::Payload(PayloadItem::Chunk(bytes)))) => body.extend_from_slice(&bytes),
                Some(Ok(Message::Payload(PayloadItem::Eof))) => break,
                Some(Err(e @ ParseError::UnexpectedEof { .. })) => {
                    warn!(cause = %e, received = body.len(), "response body truncated");
                    return Ok(RequestResult::IncompleteBody { head });
                }
                Some(Err(e)) if e.is_chunk_error() => {
                    warn!(cause = %e, "bad chunk in response body");
                    return Ok(RequestResult::BadChunk { head });
                }
                Some(Err(e)) => {
                    error!(cause = %e, "failed to read response body");
                    return Err(e.into());
                }
                Some(Ok(Message::Header(_))) | None => {
                    warn!(received = body.len(), "response body ended without eof");
                    return Ok(RequestResult::IncompleteBody { head });
                }
            }
        }

        let framed_size = body.len();
        let body = decode_body(&head, body.freeze()).map_err(HttpError::decompress)?;
        debug!(framed_size, body_size = body.len(), "response body complete");

        Ok(RequestResult::Completed(Response::new(head, body)))
    }
}
