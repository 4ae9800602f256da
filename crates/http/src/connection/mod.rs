//! Connection handling.
//!
//! - [`transport`]: opening plain and TLS byte streams
//! - [`HttpConnection`]: one request/response exchange over those streams
//!
//! A connection is used for exactly one request. Dropping it closes the
//! underlying stream.

mod http_connection;
pub mod transport;

pub use http_connection::HttpConnection;
pub use transport::{Connector, HttpStream, TcpConnector};
