//! The materialized outcome of one request.
//!
//! A peer that answers with garbage is an expected occurrence when talking raw
//! HTTP, so such answers are not errors. They are variants of [`RequestResult`],
//! each carrying the synthetic status that callers can branch on.

use std::borrow::Cow;

use bytes::Bytes;
use http::StatusCode;

use crate::protocol::ResponseHead;
use crate::protocol::cookie::parse_set_cookies;

/// A fully received response: the peer's status, head and decoded body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    head: ResponseHead,
    body: Bytes,
}

impl Response {
    pub fn new(head: ResponseHead, body: Bytes) -> Self {
        Self { head, body }
    }

    pub fn status(&self) -> StatusCode {
        self.head.status()
    }

    pub fn head(&self) -> &ResponseHead {
        &self.head
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn into_parts(self) -> (ResponseHead, Bytes) {
        (self.head, self.body)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestResult {
    /// The response was framed and decoded completely.
    Completed(Response),

    /// A chunk size line was not hexadecimal, or chunk data was not followed by CRLF.
    BadChunk { head: ResponseHead },

    /// The peer closed the connection before the framed body was complete.
    IncompleteBody { head: ResponseHead },

    /// A keep-alive response announced neither a length nor chunked encoding.
    UnknownLength,

    /// The status line was missing, not HTTP/1.1, or unparsable.
    InvalidResponse,
}

impl RequestResult {
    /// The peer's status for completed responses, a synthetic one otherwise:
    /// 502 for broken framing, 417 for an undecidable length and 503 for an
    /// invalid response.
    pub fn status(&self) -> StatusCode {
        match self {
            RequestResult::Completed(response) => response.status(),
            RequestResult::BadChunk { .. } | RequestResult::IncompleteBody { .. } => StatusCode::BAD_GATEWAY,
            RequestResult::UnknownLength => StatusCode::EXPECTATION_FAILED,
            RequestResult::InvalidResponse => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    pub fn head(&self) -> Option<&ResponseHead> {
        match self {
            RequestResult::Completed(response) => Some(response.head()),
            RequestResult::BadChunk { head } | RequestResult::IncompleteBody { head } => Some(head),
            RequestResult::UnknownLength | RequestResult::InvalidResponse => None,
        }
    }

    /// Raw header lines, status line first.
    pub fn headers(&self) -> Option<&[String]> {
        self.head().map(ResponseHead::lines)
    }

    pub fn body(&self) -> Option<&Bytes> {
        match self {
            RequestResult::Completed(response) => Some(response.body()),
            _ => None,
        }
    }

    /// Headers were received and the status is 200.
    pub fn is_successful(&self) -> bool {
        self.head().is_some() && self.status() == StatusCode::OK
    }

    /// Both headers and a body were received.
    pub fn has_responded(&self) -> bool {
        self.head().is_some() && self.body().is_some()
    }

    /// Lossy UTF-8 view of the body. Binary bodies come out as replacement characters.
    pub fn body_as_text(&self) -> Option<Cow<'_, str>> {
        self.body().map(|body| String::from_utf8_lossy(body))
    }

    /// Cookies set by the response. Re-derived from the header lines on every call.
    pub fn new_cookies(&self) -> Vec<(String, String)> {
        self.headers().map(|lines| parse_set_cookies(lines)).unwrap_or_default()
    }

    pub fn into_response(self) -> Option<Response> {
        match self {
            RequestResult::Completed(response) => Some(response),
            _ => None,
        }
    }
}

impl From<Response> for RequestResult {
    fn from(response: Response) -> Self {
        RequestResult::Completed(response)
    }
}
