//! The request driver.
//!
//! [`HttpClient`] opens a fresh connection for every request, writes the head
//! built by [`builder`](crate::builder), reads the response and closes the
//! connection again on every return path.
//!
//! ```no_run
//! use raw_http::builder::HeaderOptions;
//! use raw_http::client::{HttpClient, HTTP_PORT};
//!
//! # async fn run() -> Result<(), raw_http::protocol::HttpError> {
//! let client = HttpClient::new();
//! let result = client.get("example.com", HTTP_PORT, "/", &HeaderOptions::new()).await?;
//! if result.is_successful() {
//!     println!("{}", result.body_as_text().unwrap_or_default());
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use tokio_rustls::rustls::ClientConfig;
use tracing::{debug, info, warn};

use crate::builder::{self, FileField, HeaderOptions};
use crate::connection::transport::default_tls_config;
use crate::connection::{Connector, HttpConnection, HttpStream, TcpConnector};
use crate::protocol::{HttpError, RequestHead, RequestResult};

pub const HTTP_PORT: u16 = 80;
pub const HTTPS_PORT: u16 = 443;

/// Issues one request per connection over streams opened by `C`.
#[derive(Debug)]
pub struct HttpClient<C = TcpConnector> {
    connector: C,
    tls_config: Arc<ClientConfig>,
    secure_ports: Vec<u16>,
}

impl HttpClient {
    /// A client over plain TCP, using TLS for port 443.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> HttpClientBuilder<TcpConnector> {
        HttpClientBuilder::new(TcpConnector::new())
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Connector> HttpClient<C> {
    /// Sends an already built request to `host:port`.
    ///
    /// Connect, TLS and I/O failures are errors. A peer that answers with
    /// something unusable still yields `Ok`, see [`RequestResult`].
    pub async fn do_request(&self, host: &str, port: u16, head: RequestHead) -> Result<RequestResult, HttpError> {
        let stream = self.connector.connect(host, port).await.map_err(|e| HttpError::connect(host, port, e))?;

        let stream = if self.secure_ports.contains(&port) {
            HttpStream::tls(self.tls_config.clone(), host, stream).await.map_err(|e| HttpError::tls(host, e))?
        } else {
            HttpStream::Plain(stream)
        };

        let (reader, writer) = tokio::io::split(stream);
        let result = HttpConnection::new(reader, writer).request(head).await?;

        match &result {
            RequestResult::Completed(response) => {
                info!(host, port, status = %response.status(), body_size = response.body().len(), "request finished")
            }
            other => warn!(host, port, status = %other.status(), "request finished without a usable response"),
        }
        Ok(result)
    }

    pub async fn get(
        &self,
        host: &str,
        port: u16,
        resource: &str,
        options: &HeaderOptions,
    ) -> Result<RequestResult, HttpError> {
        let head = builder::get_headers(host, resource, options);
        self.do_request(host, port, head).await
    }

    /// Posts `form` as `application/x-www-form-urlencoded`.
    pub async fn post(
        &self,
        form: &[(&str, &str)],
        host: &str,
        port: u16,
        resource: &str,
        options: &HeaderOptions,
    ) -> Result<RequestResult, HttpError> {
        let head = builder::post_headers(form, host, resource, options)?;
        self.do_request(host, port, head).await
    }

    /// Posts `form` and `files` as `multipart/form-data`.
    ///
    /// Files are read before connecting, so an unreadable file never opens a connection.
    pub async fn post_multipart(
        &self,
        form: &[(&str, &str)],
        files: &[FileField],
        host: &str,
        port: u16,
        resource: &str,
        options: &HeaderOptions,
    ) -> Result<RequestResult, HttpError> {
        let head = builder::multipart_post_headers(form, files, host, resource, options)
            .await
            .map_err(HttpError::read_file)?;
        self.do_request(host, port, head).await
    }
}

/// Configures an [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder<C> {
    connector: C,
    tls_config: Option<Arc<ClientConfig>>,
    secure_ports: Vec<u16>,
}

impl<C: Connector> HttpClientBuilder<C> {
    fn new(connector: C) -> Self {
        Self { connector, tls_config: None, secure_ports: vec![HTTPS_PORT] }
    }

    /// Replaces the connector, e.g. to go through a proxy.
    pub fn connector<N: Connector>(self, connector: N) -> HttpClientBuilder<N> {
        HttpClientBuilder { connector, tls_config: self.tls_config, secure_ports: self.secure_ports }
    }

    pub fn tls_config(mut self, tls_config: Arc<ClientConfig>) -> Self {
        self.tls_config = Some(tls_config);
        self
    }

    /// Adds a port on which connections are upgraded to TLS.
    pub fn secure_port(mut self, port: u16) -> Self {
        if !self.secure_ports.contains(&port) {
            self.secure_ports.push(port);
        }
        self
    }

    /// Removes every secure port, including 443.
    pub fn no_secure_ports(mut self) -> Self {
        self.secure_ports.clear();
        self
    }

    pub fn build(self) -> HttpClient<C> {
        debug!(secure_ports = ?self.secure_ports, "building http client");
        HttpClient {
            connector: self.connector,
            tls_config: self.tls_config.unwrap_or_else(default_tls_config),
            secure_ports: self.secure_ports,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use http::StatusCode;
    use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream};
    use tokio::net::TcpListener;

    /// Hands out in-memory pipes. The server side reads the request, answers
    /// with a canned response and hangs up.
    struct CannedConnector {
        response: Vec<u8>,
        requests: Arc<Mutex<Vec<Vec<u8>>>>,
    }

    impl CannedConnector {
        fn new(response: impl Into<Vec<u8>>) -> Self {
            Self { response: response.into(), requests: Arc::new(Mutex::new(Vec::new())) }
        }
    }

    #[async_trait]
    impl Connector for CannedConnector {
        type Stream = DuplexStream;

        async fn connect(&self, _host: &str, _port: u16) -> std::io::Result<DuplexStream> {
            let (client, mut server) = tokio::io::duplex(16 * 1024);
            let response = self.response.clone();
            let requests = self.requests.clone();

            tokio::spawn(async move {
                let mut received = Vec::new();
                let mut buf = [0u8; 1024];
                loop {
                    let n = server.read(&mut buf).await.unwrap();
                    received.extend_from_slice(&buf[..n]);
                    if n == 0 || complete_request(&received) {
                        break;
                    }
                }
                requests.lock().unwrap().push(received);
                server.write_all(&response).await.unwrap();
            });

            Ok(client)
        }
    }

    /// Head received and, if announced, the whole body too.
    fn complete_request(received: &[u8]) -> bool {
        let Some(end) = received.windows(4).position(|w| w == b"\r\n\r\n") else {
            return false;
        };
        let head = String::from_utf8_lossy(&received[..end]);
        let length = head
            .lines()
            .find_map(|line| line.strip_prefix("Content-Length: "))
            .and_then(|value| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        received.len() >= end + 4 + length
    }

    fn client(response: impl Into<Vec<u8>>) -> (HttpClient<CannedConnector>, Arc<Mutex<Vec<Vec<u8>>>>) {
        let connector = CannedConnector::new(response);
        let requests = connector.requests.clone();
        (HttpClient::builder().connector(connector).build(), requests)
    }

    fn options() -> HeaderOptions {
        HeaderOptions::new().user_agent("test-agent/1.0")
    }

    fn length_response(body: &[u8]) -> Vec<u8> {
        let mut response = format!("HTTP/1.1 200 OK\r\nContent-Length: {}\r\n\r\n", body.len()).into_bytes();
        response.extend_from_slice(body);
        response
    }

    #[tokio::test]
    async fn content_length_bodies() {
        for size in [0usize, 1, 65536, 200_000] {
            let body: Vec<u8> = (0..size).map(|i| (i % 251) as u8).collect();
            let (client, _) = client(length_response(&body));

            let result = client.get("example.com", HTTP_PORT, "/", &options()).await.unwrap();

            assert!(result.is_successful(), "size {size}");
            assert!(result.has_responded(), "size {size}");
            assert_eq!(result.body().unwrap().len(), size);
            assert_eq!(&result.body().unwrap()[..], &body[..]);
        }
    }

    #[tokio::test]
    async fn chunked_wikipedia() {
        let response = "HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n\
                        4\r\nWiki\r\n5\r\npedia\r\nE\r\n in\r\n\r\nchunks.\r\n0\r\n\r\n";
        let (client, _) = client(response);

        let result = client.get("example.com", HTTP_PORT, "/", &options()).await.unwrap();
        assert_eq!(result.body_as_text().as_deref(), Some("Wikipedia in\r\n\r\nchunks."));
    }

    #[tokio::test]
    async fn read_until_close() {
        let (client, _) = client("HTTP/1.1 200 OK\r\nConnection: close\r\n\r\nall of it");

        let result = client.get("example.com", HTTP_PORT, "/", &options()).await.unwrap();
        assert_eq!(result.body_as_text().as_deref(), Some("all of it"));
    }

    #[tokio::test]
    async fn sentinel_statuses() {
        let cases: [(&str, StatusCode); 3] = [
            ("HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\nxyz\r\n", StatusCode::BAD_GATEWAY),
            ("HTTP/1.1 200 OK\r\nConnection: keep-alive\r\n\r\n", StatusCode::EXPECTATION_FAILED),
            ("HTTP/1.0 200 OK\r\nContent-Length: 0\r\n\r\n", StatusCode::SERVICE_UNAVAILABLE),
        ];

        for (response, status) in cases {
            let (client, _) = client(response);
            let result = client.get("example.com", HTTP_PORT, "/", &options()).await.unwrap();
            assert_eq!(result.status(), status);
            assert!(!result.is_successful());
            assert!(!result.has_responded());
        }
    }

    #[tokio::test]
    async fn gzip_body_is_decoded() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"compressed hello").unwrap();
        let compressed = encoder.finish().unwrap();

        let mut response =
            format!("HTTP/1.1 200 OK\r\nContent-Encoding: gzip\r\nContent-Length: {}\r\n\r\n", compressed.len())
                .into_bytes();
        response.extend_from_slice(&compressed);
        let (client, _) = client(response);

        let result = client.get("example.com", HTTP_PORT, "/", &options()).await.unwrap();
        assert_eq!(result.body_as_text().as_deref(), Some("compressed hello"));
    }

    #[tokio::test]
    async fn new_cookies_from_response() {
        let response = "HTTP/1.1 200 OK\r\nSet-Cookie: sid=abc123; Path=/; HttpOnly\r\n\
                        Set-Cookie: lang=fr;Path=/\r\nContent-Length: 0\r\n\r\n";
        let (client, _) = client(response);

        let result = client.get("example.com", HTTP_PORT, "/", &options()).await.unwrap();
        assert_eq!(
            result.new_cookies(),
            vec![
                ("sid".to_owned(), "abc123".to_owned()),
                ("lang".to_owned(), "fr".to_owned()),
                ("Path".to_owned(), "/".to_owned()),
            ]
        );
    }

    #[tokio::test]
    async fn post_wire_format() {
        let (client, requests) = client(length_response(b"ok"));

        let result = client.post(&[("a", "1"), ("b", "2 x")], "example.com", HTTP_PORT, "/form", &options()).await;
        assert!(result.unwrap().is_successful());

        let sent = requests.lock().unwrap().pop().unwrap();
        let expected = "POST /form HTTP/1.1\r\n\
                        Host: example.com\r\n\
                        User-Agent: test-agent/1.0\r\n\
                        Accept: text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8\r\n\
                        Accept-Language: fr,fr-fr;q=0.8,en-us;q=0.5,en;q=0.3\r\n\
                        Accept-Encoding: gzip, deflate\r\n\
                        Connection: keep-alive\r\n\
                        Content-Type: application/x-www-form-urlencoded\r\n\
                        Content-Length: 9\r\n\
                        \r\n\
                        a=1&b=2+x";
        assert_eq!(String::from_utf8(sent).unwrap(), expected);
    }

    #[tokio::test]
    async fn multipart_missing_file_never_connects() {
        let (client, requests) = client(length_response(b""));
        let files = [FileField::path("f", "/definitely/not/here.bin")];

        let error = client.post_multipart(&[], &files, "example.com", HTTP_PORT, "/", &options()).await.unwrap_err();
        assert!(matches!(error, HttpError::ReadFile { .. }));
        assert!(requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn multipart_upload() {
        let (client, requests) = client(length_response(b"stored"));
        let files = [FileField::memory("doc", "a.txt", &b"abc"[..])];

        let result = client.post_multipart(&[("k", "v")], &files, "example.com", HTTP_PORT, "/up", &options()).await;
        assert_eq!(result.unwrap().body_as_text().as_deref(), Some("stored"));

        let sent = String::from_utf8(requests.lock().unwrap().pop().unwrap()).unwrap();
        assert!(sent.starts_with("POST /up HTTP/1.1\r\n"));
        assert!(sent.contains("Content-Type: multipart/form-data; boundary="));
        assert!(sent.ends_with("--\r\n"));
    }

    #[tokio::test]
    async fn loopback_tcp() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut received = Vec::new();
            let mut buf = [0u8; 1024];
            while !complete_request(&received) {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                received.extend_from_slice(&buf[..n]);
            }
            socket.write_all(b"HTTP/1.1 404 Not Found\r\nContent-Length: 4\r\n\r\nnope").await.unwrap();
            received
        });

        let client = HttpClient::new();
        let result = client.get("127.0.0.1", port, "/missing", &options()).await.unwrap();
        let sent = server.await.unwrap();

        assert!(sent.starts_with(b"GET /missing HTTP/1.1\r\nHost: 127.0.0.1\r\n"));
        assert_eq!(result.status(), StatusCode::NOT_FOUND);
        assert!(!result.is_successful());
        assert!(result.has_responded());
        assert_eq!(result.body_as_text().as_deref(), Some("nope"));
    }

    /// Answers over loopback without ever closing, then waits for the client to hang up.
    async fn serve_until_client_closes(response: &'static [u8]) -> (RequestResult, bool) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut received = Vec::new();
            let mut buf = [0u8; 1024];
            while !complete_request(&received) {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                received.extend_from_slice(&buf[..n]);
            }
            socket.write_all(response).await.unwrap();

            let closed = async {
                loop {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(_) => continue,
                    }
                }
            };
            tokio::time::timeout(std::time::Duration::from_secs(5), closed).await.is_ok()
        });

        let result = HttpClient::new().get("127.0.0.1", port, "/", &options()).await.unwrap();
        (result, server.await.unwrap())
    }

    #[tokio::test]
    async fn socket_released_after_invalid_response() {
        let (result, closed) = serve_until_client_closes(b"HTTP/1.0 200 OK\r\n\r\n").await;
        assert_eq!(result.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(closed);
    }

    #[tokio::test]
    async fn socket_released_after_bad_chunk() {
        let (result, closed) =
            serve_until_client_closes(b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\nnope\r\n").await;
        assert_eq!(result.status(), StatusCode::BAD_GATEWAY);
        assert!(closed);
    }

    #[tokio::test]
    async fn socket_released_after_completed_response() {
        let (result, closed) = serve_until_client_closes(b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\nok").await;
        assert!(result.is_successful());
        assert!(closed);
    }

    #[tokio::test]
    async fn connect_failure_is_an_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let error = HttpClient::new().get("127.0.0.1", port, "/", &options()).await.unwrap_err();
        assert!(matches!(error, HttpError::Connect { .. }));
    }
}
