//! File extension to `Content-Type` lookups.

use std::path::Path;

pub const DEFAULT_MIME: &str = "application/octet-stream";

// (extension, content type, preload `as` destination)
const EXTENSIONS: &[(&str, &str, &str)] = &[
    ("htm", "text/html", "document"),
    ("html", "text/html", "document"),
    ("css", "text/css", "style"),
    ("js", "text/javascript", "script"),
    ("mjs", "text/javascript", "script"),
    ("json", "application/json", "fetch"),
    ("xml", "text/xml", "fetch"),
    ("txt", "text/plain", "fetch"),
    ("csv", "text/csv", "fetch"),
    ("pdf", "application/pdf", "fetch"),
    ("zip", "application/zip", "fetch"),
    ("jpg", "image/jpeg", "image"),
    ("jpeg", "image/jpeg", "image"),
    ("png", "image/png", "image"),
    ("apng", "image/apng", "image"),
    ("avif", "image/avif", "image"),
    ("ico", "image/x-icon", "image"),
    ("gif", "image/gif", "image"),
    ("svg", "image/svg+xml", "image"),
    ("webp", "image/webp", "image"),
    ("mp3", "audio/mp3", "audio"),
    ("oga", "audio/ogg", "audio"),
    ("wav", "audio/wave", "audio"),
    ("weba", "audio/webm", "audio"),
    ("mp4", "video/mp4", "video"),
    ("ogv", "video/ogg", "video"),
    ("webm", "video/webm", "video"),
    ("otf", "font/otf", "font"),
    ("ttf", "font/ttf", "font"),
    ("woff", "font/woff", "font"),
    ("woff2", "font/woff2", "font"),
];

fn lookup(ext: &str) -> Option<&'static (&'static str, &'static str, &'static str)> {
    let ext = ext.trim_start_matches('.');
    EXTENSIONS
        .iter()
        .find(|(known, _, _)| known.eq_ignore_ascii_case(ext))
}

/// Content type for a bare extension (`"png"` or `".png"`).
pub fn from_extension(ext: &str) -> Option<&'static str> {
    lookup(ext).map(|(_, mime, _)| *mime)
}

/// Content type guessed from the extension of `path`, or
/// [`DEFAULT_MIME`] when it has none or it is unknown.
pub fn from_path(path: impl AsRef<Path>) -> &'static str {
    path.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(from_extension)
        .unwrap_or(DEFAULT_MIME)
}

/// Value for the `as` attribute of a `Link: <...>; rel=preload` header.
pub fn preload_type(ext: &str) -> Option<&'static str> {
    lookup(ext).map(|(_, _, preload)| *preload)
}

/// Whether a body of this content type is text.
pub fn is_textual(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    essence.starts_with("text/")
        || essence.ends_with("+xml")
        || essence.ends_with("+json")
        || matches!(
            essence.as_str(),
            "application/json" | "application/xml" | "application/javascript"
        )
}
