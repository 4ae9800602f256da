//! Request head construction.
//!
//! Builders produce a [`RequestHead`](crate::protocol::RequestHead) whose lines
//! are in the exact order they go on the wire:
//!
//! ```text
//! GET /resource HTTP/1.1
//! Host: example.com
//! User-Agent: ...
//! Accept: ...
//! Accept-Language: ...
//! Accept-Encoding: gzip, deflate
//! Referer: ...            (optional)
//! Cookie: k=v; k2=v2      (optional)
//! Connection: keep-alive
//! ```
//!
//! POST builders reuse the GET lines, rewrite the request line and append the
//! body related headers after them.

mod headers;
mod mime_type;
mod multipart;
mod user_agent;

pub use headers::{get_headers, post_headers, DEFAULT_ACCEPT, DEFAULT_ACCEPT_LANGUAGE};
pub use mime_type::guess_from_filename;
pub use multipart::{multipart_post_headers, FileField};
pub use user_agent::random_user_agent;

/// Optional per-request header values.
///
/// Everything left unset gets a default: a random browser user agent and
/// [`DEFAULT_ACCEPT_LANGUAGE`]. `Referer` and `Cookie` are omitted when unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderOptions {
    pub referrer: Option<String>,
    pub user_agent: Option<String>,
    pub cookies: Vec<(String, String)>,
    pub accept_language: Option<String>,
}

impl HeaderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn referrer(mut self, referrer: impl Into<String>) -> Self {
        self.referrer = Some(referrer.into());
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.push((name.into(), value.into()));
        self
    }

    /// Appends every pair, typically the result of
    /// [`RequestResult::new_cookies`](crate::protocol::RequestResult::new_cookies).
    pub fn cookies<I>(mut self, cookies: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.cookies.extend(cookies);
        self
    }

    pub fn accept_language(mut self, accept_language: impl Into<String>) -> Self {
        self.accept_language = Some(accept_language.into());
        self
    }
}
