//! HTTP codec module for encoding requests and decoding responses
//!
//! This module provides the wire level state machines of the client. They operate
//! on `BytesMut` buffers through the `tokio_util` codec traits, so they can be
//! driven by `FramedRead`/`FramedWrite` over any byte stream.
//!
//! # Architecture
//!
//! - Response handling:
//!   - [`ResponseDecoder`]: decodes the incoming response
//!   - Line splitting via [`LineDecoder`]
//!   - Head parsing via the `header` module
//!   - Body framing via the `body` module
//!
//! - Request handling:
//!   - [`RequestEncoder`]: writes the request lines and body
//!
//! # Features
//!
//! - Chunked transfer encoding, Content-Length and read-until-close bodies
//! - Exact consumption: no decoder takes bytes past the end of its part
//! - State machine based processing that tolerates arbitrarily split input

mod body;
mod header;
mod line_decoder;
mod request_encoder;
mod response_decoder;

pub use line_decoder::LineDecoder;
pub use request_encoder::RequestEncoder;
pub use response_decoder::ResponseDecoder;
