//! Response body decoding.
//!
//! - [`ChunkedDecoder`](chunked_decoder::ChunkedDecoder): chunked transfer encoding
//! - [`LengthDecoder`](length_decoder::LengthDecoder): Content-Length framed bodies
//! - [`PayloadDecoder`]: selects one of the above, or reads until the connection closes

mod chunked_decoder;
mod length_decoder;
mod payload_decoder;

pub use payload_decoder::PayloadDecoder;
