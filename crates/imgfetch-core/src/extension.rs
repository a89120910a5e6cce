//! File extension inference from a declared `Content-Type`.

/// Preferred extensions for common image types; `mime_guess` lists several
/// extensions for some of these and the first is not always the usual one.
const PREFERRED: &[(&str, &str)] = &[
    ("image/jpeg", "jpeg"),
    ("image/pjpeg", "jpeg"),
    ("image/png", "png"),
    ("image/gif", "gif"),
    ("image/webp", "webp"),
    ("image/avif", "avif"),
    ("image/svg+xml", "svg"),
    ("image/bmp", "bmp"),
    ("image/tiff", "tiff"),
    ("image/x-icon", "ico"),
    ("image/vnd.microsoft.icon", "ico"),
    ("image/heic", "heic"),
];

/// Map a content type such as `image/png; charset=binary` to `.png`.
///
/// Returns `None` for missing, malformed or unknown types.
pub fn extension_for_content_type(content_type: &str) -> Option<String> {
    let essence = content_type
        .split(';')
        .next()
        .map(str::trim)
        .filter(|s| s.contains('/'))?
        .to_ascii_lowercase();

    if let Some((_, ext)) = PREFERRED.iter().find(|(mime, _)| *mime == essence) {
        return Some(format!(".{ext}"));
    }

    mime_guess::get_mime_extensions_str(&essence)
        .and_then(|exts| exts.first())
        .map(|ext| format!(".{ext}"))
}
