//! HTTP head processing: response head decoding and request head encoding.
//!
//! - [`HeaderDecoder`]: reads the status line and header lines of a response and
//!   decides how its body is framed
//! - [`HeaderEncoder`]: writes the ordered request lines

mod header_decoder;
mod header_encoder;

pub use header_decoder::HeaderDecoder;
pub use header_encoder::HeaderEncoder;
