use http::header::{
    ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE, CONNECTION, CONTENT_LENGTH, CONTENT_TYPE, COOKIE, HOST, REFERER,
    USER_AGENT,
};
use http::{HeaderName, Method};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use tracing::trace;

use super::HeaderOptions;
use super::user_agent::random_user_agent;
use crate::protocol::{RequestHead, SendError};

pub const DEFAULT_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "fr,fr-fr;q=0.8,en-us;q=0.5,en;q=0.3";
const ACCEPTED_ENCODINGS: &str = "gzip, deflate";

/// Bytes that may not appear raw in a cookie name or value.
const COOKIE_ESCAPE: &AsciiSet = &CONTROLS.add(b' ').add(b'"').add(b',').add(b';').add(b'\\');

/// Builds the header lines of a `GET` request.
///
/// The result carries no body. Calling it twice with the same options, a fixed
/// user agent included, yields identical heads.
pub fn get_headers(host: &str, resource: &str, options: &HeaderOptions) -> RequestHead {
    let mut head = RequestHead::new(&Method::GET, resource);

    push(&mut head, HOST, host);
    match options.user_agent.as_deref() {
        Some(user_agent) => push(&mut head, USER_AGENT, user_agent),
        None => push(&mut head, USER_AGENT, random_user_agent()),
    }
    push(&mut head, ACCEPT, DEFAULT_ACCEPT);
    push(&mut head, ACCEPT_LANGUAGE, options.accept_language.as_deref().unwrap_or(DEFAULT_ACCEPT_LANGUAGE));
    push(&mut head, ACCEPT_ENCODING, ACCEPTED_ENCODINGS);

    if let Some(referrer) = options.referrer.as_deref() {
        push(&mut head, REFERER, referrer);
    }

    if !options.cookies.is_empty() {
        push(&mut head, COOKIE, encode_cookies(&options.cookies));
    }

    push(&mut head, CONNECTION, "keep-alive");
    trace!(lines = head.lines().len(), resource, "built get headers");
    head
}

/// Builds a urlencoded form `POST`.
///
/// Pairs are serialized in order as `key=value` joined by `&`, spaces become
/// `+`. The error only surfaces when the form can't be serialized at all.
pub fn post_headers(
    form: &[(&str, &str)],
    host: &str,
    resource: &str,
    options: &HeaderOptions,
) -> Result<RequestHead, SendError> {
    let body = serde_urlencoded::to_string(form).map_err(SendError::invalid_head)?;

    let mut head = get_headers(host, resource, options);
    head.set_method(&Method::POST, resource);
    push(&mut head, CONTENT_TYPE, mime::APPLICATION_WWW_FORM_URLENCODED.as_ref());
    push(&mut head, CONTENT_LENGTH, body.len().to_string());
    head.set_body(body);

    Ok(head)
}

pub(super) fn push(head: &mut RequestHead, name: HeaderName, value: impl AsRef<str>) {
    head.push_header(&canonical_name(&name), value);
}

/// `http` lowercases header names, browsers send them title-cased.
fn canonical_name(name: &HeaderName) -> String {
    name.as_str()
        .split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

fn encode_cookies(cookies: &[(String, String)]) -> String {
    cookies
        .iter()
        .map(|(name, value)| {
            format!("{}={}", utf8_percent_encode(name, COOKIE_ESCAPE), utf8_percent_encode(value, COOKIE_ESCAPE))
        })
        .collect::<Vec<_>>()
        .join("; ")
}
