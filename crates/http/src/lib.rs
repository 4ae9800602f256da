//! An asynchronous raw HTTP/1.1 client
//!
//! This crate writes requests and reads responses byte by byte on top of tokio,
//! without a higher level HTTP stack in between. Each request opens a fresh
//! connection, sends a browser-like head, frames the response body and closes
//! the connection again.
//!
//! # Features
//!
//! - GET, urlencoded POST and multipart POST request builders
//! - Plain TCP and TLS transports behind a pluggable [`connection::Connector`]
//! - Content-Length, chunked and read-until-close body framing
//! - Transparent gzip and deflate decoding
//! - Malformed responses reported as values, not errors
//!
//! # Example
//!
//! ```no_run
//! use raw_http::builder::HeaderOptions;
//! use raw_http::client::{HttpClient, HTTPS_PORT};
//! use tracing::{info, Level};
//! use tracing_subscriber::FmtSubscriber;
//!
//! #[tokio::main]
//! async fn main() {
//!     let subscriber = FmtSubscriber::builder()
//!         .with_max_level(Level::INFO)
//!         .finish();
//!     tracing::subscriber::set_global_default(subscriber)
//!         .expect("setting default subscriber failed");
//!
//!     let client = HttpClient::new();
//!     let options = HeaderOptions::new().referrer("https://www.rust-lang.org/");
//!
//!     match client.get("www.rust-lang.org", HTTPS_PORT, "/", &options).await {
//!         Ok(result) if result.is_successful() => {
//!             info!(cookies = ?result.new_cookies(), "got page");
//!             println!("{}", result.body_as_text().unwrap_or_default());
//!         }
//!         Ok(result) => info!(status = %result.status(), "no usable response"),
//!         Err(e) => info!(cause = %e, "request failed"),
//!     }
//! }
//! ```
//!
//! # Architecture
//!
//! - [`builder`]: request head construction
//! - [`codec`]: line, header and body decoders plus the request encoder
//! - [`connection`]: transports and the single exchange driver
//! - [`client`]: the public entry point tying everything together
//! - [`decompress`]: `Content-Encoding` handling after framing
//! - [`protocol`]: request, response and error types
//!
//! # Response outcomes
//!
//! [`protocol::RequestResult`] is `Completed` for any well formed response,
//! whatever its status. Broken responses map to fixed statuses:
//!
//! | variant           | status | head kept |
//! |-------------------|--------|-----------|
//! | `InvalidResponse` | 503    | no        |
//! | `BadChunk`        | 502    | yes       |
//! | `IncompleteBody`  | 502    | yes       |
//! | `UnknownLength`   | 417    | no        |
//!
//! # Limitations
//!
//! - HTTP/1.1 only, one request per connection
//! - Bodies are buffered fully in memory
//! - No redirects, retries, caching or cookie jar
//! - Maximum header size: 64KB
//! - Maximum number of headers: 100

pub mod builder;
pub mod client;
pub mod codec;
pub mod connection;
pub mod decompress;
pub mod protocol;

mod utils;
pub(crate) use utils::ensure;
