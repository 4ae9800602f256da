use std::io;
use thiserror::Error;

/// Failures that abort a request before a [`RequestResult`](crate::protocol::RequestResult)
/// can be produced.
///
/// Misbehaving peers are not errors: malformed status lines, corrupt chunks and
/// undecidable body lengths are reported through the result variants instead.
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("connect to {host}:{port} failed: {source}")]
    Connect {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    #[error("tls handshake with {host} failed: {source}")]
    Tls {
        host: String,
        #[source]
        source: io::Error,
    },

    #[error("request error: {source}")]
    RequestError {
        #[from]
        source: SendError,
    },

    #[error("response error: {source}")]
    ResponseError {
        #[from]
        source: ParseError,
    },

    #[error("decompress body error: {source}")]
    Decompress {
        #[source]
        source: io::Error,
    },

    #[error("read multipart file error: {source}")]
    ReadFile {
        #[source]
        source: io::Error,
    },
}

impl HttpError {
    pub fn connect<S: ToString>(host: S, port: u16, source: io::Error) -> Self {
        Self::Connect { host: host.to_string(), port, source }
    }

    pub fn tls<S: ToString>(host: S, source: io::Error) -> Self {
        Self::Tls { host: host.to_string(), source }
    }

    pub fn decompress(source: io::Error) -> Self {
        Self::Decompress { source }
    }

    pub fn read_file(source: io::Error) -> Self {
        Self::ReadFile { source }
    }
}

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("header size too large, current: {current_size} exceed the limit {max_size}")]
    TooLargeHeader { current_size: usize, max_size: usize },

    #[error("header number exceed the limit {max_num}")]
    TooManyHeaders { max_num: usize },

    #[error("line too long, exceed the limit {max_size}")]
    TooLongLine { max_size: usize },

    #[error("invalid status line: {line:?}")]
    InvalidStatusLine { line: String },

    #[error("body length can't be determined on a keep-alive connection")]
    UnknownLength,

    #[error("invalid chunk size line: {line:?}")]
    InvalidChunkSize { line: String },

    #[error("invalid chunk body: {reason}")]
    InvalidChunkBody { reason: String },

    #[error("connection closed before {stage} completed")]
    UnexpectedEof { stage: &'static str },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl ParseError {
    pub fn too_large_header(current_size: usize, max_size: usize) -> Self {
        Self::TooLargeHeader { current_size, max_size }
    }

    pub fn too_many_headers(max_num: usize) -> Self {
        Self::TooManyHeaders { max_num }
    }

    pub fn too_long_line(max_size: usize) -> Self {
        Self::TooLongLine { max_size }
    }

    pub fn invalid_status_line<S: ToString>(line: S) -> Self {
        Self::InvalidStatusLine { line: line.to_string() }
    }

    pub fn invalid_chunk_size<S: ToString>(line: S) -> Self {
        Self::InvalidChunkSize { line: line.to_string() }
    }

    pub fn invalid_chunk_body<S: ToString>(str: S) -> Self {
        Self::InvalidChunkBody { reason: str.to_string() }
    }

    pub fn unexpected_eof(stage: &'static str) -> Self {
        Self::UnexpectedEof { stage }
    }

    /// Returns true if the peer closed the stream, or sent bytes that are not a usable
    /// response head.
    pub fn is_head_error(&self) -> bool {
        matches!(
            self,
            ParseError::TooLargeHeader { .. }
                | ParseError::TooManyHeaders { .. }
                | ParseError::TooLongLine { .. }
                | ParseError::InvalidStatusLine { .. }
        )
    }

    /// Returns true for corrupt chunked framing, an overlong chunk size line included.
    pub fn is_chunk_error(&self) -> bool {
        matches!(
            self,
            ParseError::InvalidChunkSize { .. } | ParseError::InvalidChunkBody { .. } | ParseError::TooLongLine { .. }
        )
    }
}

#[derive(Error, Debug)]
pub enum SendError {
    #[error("invalid request head: {reason}")]
    InvalidHead { reason: String },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl SendError {
    pub fn invalid_head<S: ToString>(str: S) -> Self {
        Self::InvalidHead { reason: str.to_string() }
    }
}
