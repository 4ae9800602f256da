//! Parsed response head.
//!
//! The head keeps the raw header lines in arrival order, the status line at
//! index 0, so callers see exactly what the peer sent. Lookups by name are
//! case-insensitive and trim the value.

use http::{HeaderMap, HeaderName, HeaderValue, StatusCode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHead {
    status: StatusCode,
    lines: Vec<String>,
}

impl ResponseHead {
    /// Creates a head from its status line; header lines are appended with [`push_line`](Self::push_line).
    pub fn new(status: StatusCode, status_line: String) -> Self {
        Self { status, lines: vec![status_line] }
    }

    pub fn push_line(&mut self, line: String) {
        self.lines.push(line);
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn status_line(&self) -> &str {
        &self.lines[0]
    }

    /// All lines, status line first.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Header lines without the status line.
    pub fn header_lines(&self) -> &[String] {
        &self.lines[1..]
    }

    /// Iterates the `(name, value)` pairs of every well formed header line.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.header_lines().iter().filter_map(|line| split_field(line))
    }

    /// Returns the first value for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.get_all(name).next()
    }

    /// Returns every value for `name`, in arrival order.
    pub fn get_all<'a, 'n>(&'a self, name: &'n str) -> impl Iterator<Item = &'a str> + use<'a, 'n> {
        self.fields().filter(move |(field, _)| field.eq_ignore_ascii_case(name)).map(|(_, value)| value)
    }

    /// Checks whether any `name` header lists `token` among its comma separated values.
    pub fn has_token(&self, name: &str, token: &str) -> bool {
        self.get_all(name).any(|value| value.split(',').any(|item| item.trim().eq_ignore_ascii_case(token)))
    }

    /// Converts into a typed header map. Lines that are not valid header fields are skipped.
    pub fn to_header_map(&self) -> HeaderMap {
        let mut map = HeaderMap::with_capacity(self.lines.len() - 1);
        for (name, value) in self.fields() {
            if let (Ok(name), Ok(value)) = (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(value)) {
                map.append(name, value);
            }
        }
        map
    }
}

fn split_field(line: &str) -> Option<(&str, &str)> {
    let (name, value) = line.split_once(':')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some((name, value.trim()))
}
