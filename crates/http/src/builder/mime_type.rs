use mime::Mime;

/// Guesses the media type of a file part from its extension.
///
/// Unknown or missing extensions fall back to `application/octet-stream`.
pub fn guess_from_filename(filename: &str) -> Mime {
    let Some((_, extension)) = filename.rsplit_once('.') else {
        return mime::APPLICATION_OCTET_STREAM;
    };

    match extension.to_ascii_lowercase().as_str() {
        "txt" | "log" => mime::TEXT_PLAIN,
        "htm" | "html" => mime::TEXT_HTML,
        "css" => mime::TEXT_CSS,
        "csv" => mime::TEXT_CSV,
        "js" | "mjs" => mime::TEXT_JAVASCRIPT,
        "xml" => mime::TEXT_XML,
        "json" => mime::APPLICATION_JSON,
        "pdf" => mime::APPLICATION_PDF,
        "png" => mime::IMAGE_PNG,
        "jpg" | "jpeg" => mime::IMAGE_JPEG,
        "gif" => mime::IMAGE_GIF,
        "bmp" => mime::IMAGE_BMP,
        "svg" => mime::IMAGE_SVG,
        "woff" => mime::FONT_WOFF,
        "woff2" => mime::FONT_WOFF2,
        other => parse_extra(other).unwrap_or(mime::APPLICATION_OCTET_STREAM),
    }
}

/// Types the `mime` crate has no constant for.
fn parse_extra(extension: &str) -> Option<Mime> {
    let essence = match extension {
        "zip" => "application/zip",
        "gz" => "application/gzip",
        "tar" => "application/x-tar",
        "7z" => "application/x-7z-compressed",
        "swf" => "application/x-shockwave-flash",
        "doc" => "application/msword",
        "xls" => "application/vnd.ms-excel",
        "ico" => "image/x-icon",
        "webp" => "image/webp",
        "tif" | "tiff" => "image/tiff",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        "mp4" => "video/mp4",
        "avi" => "video/x-msvideo",
        "webm" => "video/webm",
        _ => return None,
    };
    essence.parse().ok()
}
