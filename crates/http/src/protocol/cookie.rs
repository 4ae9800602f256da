//! Cookie extraction from `Set-Cookie` response lines.
//!
//! The extraction is deliberately naive: the line is split on spaces and only
//! the second token is looked at, which is then split on `;` and each segment on
//! `=`. Segments that yield exactly two tokens become a pair. Attributes such as
//! `Path=/` are therefore indistinguishable from the cookie itself when the
//! server omits the space after `;`, and values containing `=` are dropped.

const SET_COOKIE: &str = "set-cookie";

/// Extracts `(name, value)` pairs from every `Set-Cookie` line.
pub fn parse_set_cookies<'a, I>(lines: I) -> Vec<(String, String)>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut cookies = Vec::new();
    for line in lines {
        if !is_set_cookie_line(line) {
            continue;
        }

        let Some(token) = line.split(' ').nth(1) else {
            continue;
        };

        for segment in token.split(';') {
            let parts: Vec<&str> = segment.split('=').collect();
            if let [name, value] = parts.as_slice() {
                cookies.push((name.to_string(), value.to_string()));
            }
        }
    }
    cookies
}

fn is_set_cookie_line(line: &str) -> bool {
    line.len() > SET_COOKIE.len() + 1
        && line.is_char_boundary(SET_COOKIE.len())
        && line[..SET_COOKIE.len()].eq_ignore_ascii_case(SET_COOKIE)
        && line[SET_COOKIE.len()..].starts_with(": ")
}
