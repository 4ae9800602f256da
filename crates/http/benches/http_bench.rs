use std::hint::black_box;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::BytesMut;
use criterion::{criterion_group, criterion_main, Criterion};
use futures::executor::block_on;
use raw_http::builder::{get_headers, HeaderOptions};
use raw_http::codec::{RequestEncoder, ResponseDecoder};
use raw_http::connection::HttpConnection;
use raw_http::protocol::{Message, PayloadItem};
use tokio::io::{AsyncRead, ReadBuf};
use tokio_util::codec::{Decoder, Encoder};

const LENGTH_RESPONSE: &[u8] = b"HTTP/1.1 200 OK\r\nServer: nginx\r\nContent-Type: text/html\r\nContent-Length: 12\r\n\r\nHello World!";
const CHUNKED_RESPONSE: &[u8] =
    b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n4\r\nWiki\r\n5\r\npedia\r\nE\r\n in\r\n\r\nchunks.\r\n0\r\n\r\n";

// Serves a canned response, then EOF
struct MockReader {
    data: &'static [u8],
    pos: usize,
}

impl AsyncRead for MockReader {
    fn poll_read(mut self: Pin<&mut Self>, _cx: &mut Context<'_>, buf: &mut ReadBuf<'_>) -> Poll<io::Result<()>> {
        let remaining = &self.data[self.pos..];
        let amt = std::cmp::min(remaining.len(), buf.remaining());
        buf.put_slice(&remaining[..amt]);
        self.pos += amt;
        Poll::Ready(Ok(()))
    }
}

fn decode_all(response: &[u8]) -> usize {
    let mut decoder = ResponseDecoder::new();
    let mut bytes = BytesMut::from(response);
    let mut items = 0;
    while let Some(item) = decoder.decode(&mut bytes).unwrap() {
        items += 1;
        if matches!(item, Message::Payload(PayloadItem::Eof)) {
            break;
        }
    }
    items
}

fn bench_response_decoder(c: &mut Criterion) {
    c.bench_function("decode_length_response", |b| b.iter(|| black_box(decode_all(LENGTH_RESPONSE))));
    c.bench_function("decode_chunked_response", |b| b.iter(|| black_box(decode_all(CHUNKED_RESPONSE))));
}

fn bench_request_encoder(c: &mut Criterion) {
    let options = HeaderOptions::new().user_agent("bench/1.0").cookie("sid", "abc123");
    let head = get_headers("localhost", "/index.html", &options);

    c.bench_function("encode_get_request", |b| {
        b.iter(|| {
            let mut encoder = RequestEncoder::new();
            let mut bytes = BytesMut::new();
            encoder.encode(head.clone(), &mut bytes).unwrap();
            black_box(bytes);
        });
    });
}

fn bench_http_connection(c: &mut Criterion) {
    let options = HeaderOptions::new().user_agent("bench/1.0");
    let head = get_headers("localhost", "/", &options);

    c.bench_function("exchange_simple_request", |b| {
        b.iter(|| {
            let reader = MockReader { data: LENGTH_RESPONSE, pos: 0 };
            let connection = HttpConnection::new(reader, tokio::io::sink());
            black_box(block_on(connection.request(head.clone())).unwrap());
        });
    });
}

criterion_group!(benches, bench_response_decoder, bench_request_encoder, bench_http_connection);
criterion_main!(benches);
