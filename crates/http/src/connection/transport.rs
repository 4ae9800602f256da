//! Byte stream transports.
//!
//! A [`Connector`] opens the raw stream for a `(host, port)` pair. The client
//! wraps whatever it returns in an [`HttpStream`], upgrading to TLS when the
//! port is one of its secure ports.

use std::io;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tokio_rustls::client::TlsStream;
use tokio_rustls::rustls::pki_types::ServerName;
use tokio_rustls::rustls::{ClientConfig, RootCertStore};
use tracing::{debug, trace};

/// Opens byte streams to remote peers.
///
/// Implement this to route connections through a proxy or, in tests, to hand
/// out in-memory pipes.
#[async_trait]
pub trait Connector: Send + Sync {
    type Stream: AsyncRead + AsyncWrite + Unpin + Send;

    async fn connect(&self, host: &str, port: u16) -> io::Result<Self::Stream>;
}

/// Plain TCP connector.
#[derive(Debug, Clone)]
pub struct TcpConnector {
    connect_timeout: Option<Duration>,
    nodelay: bool,
}

impl TcpConnector {
    pub fn new() -> Self {
        Self { connect_timeout: None, nodelay: true }
    }

    /// Fails the connect with `TimedOut` once `timeout` elapses.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    pub fn with_nodelay(mut self, nodelay: bool) -> Self {
        self.nodelay = nodelay;
        self
    }
}

impl Default for TcpConnector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Connector for TcpConnector {
    type Stream = TcpStream;

    async fn connect(&self, host: &str, port: u16) -> io::Result<TcpStream> {
        let stream = match self.connect_timeout {
            Some(timeout) => tokio::time::timeout(timeout, TcpStream::connect((host, port)))
                .await
                .map_err(|_| io::Error::new(io::ErrorKind::TimedOut, format!("connect to {host}:{port} timed out")))??,
            None => TcpStream::connect((host, port)).await?,
        };

        stream.set_nodelay(self.nodelay)?;
        trace!(host, port, peer = ?stream.peer_addr().ok(), "tcp connected");
        Ok(stream)
    }
}

/// A plain or TLS stream over the connector's stream type.
#[derive(Debug)]
pub enum HttpStream<S> {
    Plain(S),
    Tls(Box<TlsStream<S>>),
}

impl<S> HttpStream<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Runs the TLS handshake over `stream`, verifying the certificate against `host`.
    pub async fn tls(config: Arc<ClientConfig>, host: &str, stream: S) -> io::Result<Self> {
        let server_name = ServerName::try_from(host.to_owned())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        let tls_stream = TlsConnector::from(config).connect(server_name, stream).await?;
        debug!(host, "tls handshake finished");
        Ok(HttpStream::Tls(Box::new(tls_stream)))
    }

    pub fn is_tls(&self) -> bool {
        matches!(self, HttpStream::Tls(_))
    }
}

static DEFAULT_TLS_CONFIG: Lazy<Arc<ClientConfig>> = Lazy::new(|| {
    let mut root_store = RootCertStore::empty();
    root_store.roots = webpki_roots::TLS_SERVER_ROOTS.iter().cloned().collect();
    Arc::new(ClientConfig::builder().with_root_certificates(root_store).with_no_client_auth())
});

/// Client config trusting the Mozilla root set, without client auth.
pub fn default_tls_config() -> Arc<ClientConfig> {
    DEFAULT_TLS_CONFIG.clone()
}

impl<S> AsyncRead for HttpStream<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    fn poll_read(mut self: Pin<&mut Self>, cx: &mut Context<'_>, buf: &mut ReadBuf<'_>) -> Poll<io::Result<()>> {
        match &mut *self {
            HttpStream::Plain(s) => Pin::new(s).poll_read(cx, buf),
            HttpStream::Tls(s) => Pin::new(s.as_mut()).poll_read(cx, buf),
        }
    }
}

impl<S> AsyncWrite for HttpStream<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    fn poll_write(mut self: Pin<&mut Self>, cx: &mut Context<'_>, buf: &[u8]) -> Poll<io::Result<usize>> {
        match &mut *self {
            HttpStream::Plain(s) => Pin::new(s).poll_write(cx, buf),
            HttpStream::Tls(s) => Pin::new(s.as_mut()).poll_write(cx, buf),
        }
    }

    fn poll_flush(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match &mut *self {
            HttpStream::Plain(s) => Pin::new(s).poll_flush(cx),
            HttpStream::Tls(s) => Pin::new(s.as_mut()).poll_flush(cx),
        }
    }

    fn poll_shutdown(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match &mut *self {
            HttpStream::Plain(s) => Pin::new(s).poll_shutdown(cx),
            HttpStream::Tls(s) => Pin::new(s.as_mut()).poll_shutdown(cx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn tcp_connector_reaches_listener() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            socket.write_all(b"pong").await.unwrap();
        });

        let connector = TcpConnector::new().with_connect_timeout(Duration::from_secs(5));
        let mut stream = HttpStream::Plain(connector.connect("127.0.0.1", port).await.unwrap());
        assert!(!stream.is_tls());

        let mut buf = Vec::new();
        stream.read_to_end(&mut buf).await.unwrap();
        assert_eq!(buf, b"pong");
        server.await.unwrap();
    }

    #[tokio::test]
    async fn refused_connect_is_an_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        assert!(TcpConnector::new().connect("127.0.0.1", port).await.is_err());
    }

    #[tokio::test]
    async fn tls_rejects_invalid_server_name() {
        let (client, _server) = tokio::io::duplex(64);
        let result = HttpStream::tls(default_tls_config(), "not a host name", client).await;
        assert_eq!(result.err().map(|e| e.kind()), Some(io::ErrorKind::InvalidInput));
    }
}
