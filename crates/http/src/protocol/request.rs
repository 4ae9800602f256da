//! Outgoing request representation.
//!
//! A request is kept exactly as it goes on the wire: an ordered list of header
//! lines, the request line first, plus an optional raw body. Nothing reorders or
//! normalizes the lines, so repeated header names keep their relative order.

use bytes::Bytes;
use http::Method;

/// Header lines and optional body of an outgoing HTTP/1.1 request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestHead {
    lines: Vec<String>,
    body: Option<Bytes>,
}

impl RequestHead {
    /// Starts a request with only the request line, `METHOD resource HTTP/1.1`.
    pub fn new(method: &Method, resource: &str) -> Self {
        Self { lines: vec![request_line(method, resource)], body: None }
    }

    /// Appends a `Name: Value` line.
    pub fn push_header(&mut self, name: &str, value: impl AsRef<str>) {
        self.lines.push(format!("{name}: {}", value.as_ref()));
    }

    /// Replaces the method of the request line, keeping the resource.
    pub fn set_method(&mut self, method: &Method, resource: &str) {
        let line = request_line(method, resource);
        match self.lines.first_mut() {
            Some(first) => *first = line,
            None => self.lines.push(line),
        }
    }

    pub fn set_body(&mut self, body: impl Into<Bytes>) {
        self.body = Some(body.into());
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn request_line(&self) -> Option<&str> {
        self.lines.first().map(String::as_str)
    }

    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Returns the value of the first line named `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.lines.iter().skip(1).find_map(|line| {
            let (line_name, value) = line.split_once(':')?;
            line_name.trim().eq_ignore_ascii_case(name).then(|| value.trim())
        })
    }

    /// Splits into the `(header lines, encoded body)` pair.
    pub fn into_parts(self) -> (Vec<String>, Option<Bytes>) {
        (self.lines, self.body)
    }
}

fn request_line(method: &Method, resource: &str) -> String {
    format!("{} {resource} HTTP/1.1", method.as_str())
}
