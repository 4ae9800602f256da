use std::io;
use std::path::{Path, PathBuf};

use bytes::{BufMut, Bytes, BytesMut};
use http::Method;
use http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use tracing::debug;
use uuid::Uuid;

use super::HeaderOptions;
use super::headers::{get_headers, push};
use super::mime_type::guess_from_filename;
use crate::protocol::RequestHead;

const BOUNDARY_PREFIX: &str = "----RawHttpFormBoundary";
const CRLF: &[u8] = b"\r\n";

/// A file part of a multipart form.
#[derive(Debug, Clone)]
pub enum FileField {
    /// Read fully from disk when the request is built. The part's filename is
    /// the last path component.
    Path { name: String, path: PathBuf },
    Memory { name: String, filename: String, content: Bytes },
}

impl FileField {
    pub fn path(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        FileField::Path { name: name.into(), path: path.into() }
    }

    pub fn memory(name: impl Into<String>, filename: impl Into<String>, content: impl Into<Bytes>) -> Self {
        FileField::Memory { name: name.into(), filename: filename.into(), content: content.into() }
    }

    fn name(&self) -> &str {
        match self {
            FileField::Path { name, .. } | FileField::Memory { name, .. } => name,
        }
    }

    async fn load(&self) -> io::Result<(String, Bytes)> {
        match self {
            FileField::Path { path, .. } => {
                let content = tokio::fs::read(path).await?;
                Ok((file_name(path), Bytes::from(content)))
            }
            FileField::Memory { filename, content, .. } => Ok((filename.clone(), content.clone())),
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name().map(|name| name.to_string_lossy().into_owned()).unwrap_or_default()
}

/// Builds a `multipart/form-data` `POST`.
///
/// Form fields come first, then file parts, each behind a `--boundary`
/// delimiter; the body ends with `--boundary--`. Files are loaded whole. An
/// unreadable file fails the whole build with the original `io::Error`.
pub async fn multipart_post_headers(
    form: &[(&str, &str)],
    files: &[FileField],
    host: &str,
    resource: &str,
    options: &HeaderOptions,
) -> io::Result<RequestHead> {
    let boundary = format!("{BOUNDARY_PREFIX}{}", Uuid::new_v4().simple());
    let mut body = BytesMut::new();

    for (name, value) in form {
        put_delimiter(&mut body, &boundary);
        put_line(&mut body, &format!("Content-Disposition: form-data; name=\"{name}\""));
        body.put_slice(CRLF);
        body.put_slice(value.as_bytes());
        body.put_slice(CRLF);
    }

    for file in files {
        let (filename, content) = file.load().await?;
        let content_type = guess_from_filename(&filename);

        put_delimiter(&mut body, &boundary);
        put_line(
            &mut body,
            &format!("Content-Disposition: form-data; name=\"{}\"; filename=\"{filename}\"", file.name()),
        );
        put_line(&mut body, &format!("Content-Type: {content_type}"));
        body.put_slice(CRLF);
        body.put_slice(&content);
        body.put_slice(CRLF);
    }

    put_line(&mut body, &format!("--{boundary}--"));

    let mut head = get_headers(host, resource, options);
    head.set_method(&Method::POST, resource);
    push(&mut head, CONTENT_TYPE, format!("{}; boundary={boundary}", mime::MULTIPART_FORM_DATA));
    push(&mut head, CONTENT_LENGTH, body.len().to_string());

    debug!(fields = form.len(), files = files.len(), body_size = body.len(), "built multipart body");
    head.set_body(body.freeze());
    Ok(head)
}

fn put_delimiter(body: &mut BytesMut, boundary: &str) {
    body.put_slice(b"--");
    put_line(body, boundary);
}

fn put_line(body: &mut BytesMut, line: &str) {
    body.put_slice(line.as_bytes());
    body.put_slice(CRLF);
}
