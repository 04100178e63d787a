//! Image-library domain helpers.

use std::path::Path;

use slug::slugify;
use time::OffsetDateTime;

/// Derive the object-store key for a library entry from its creation time and
/// original name. The key doubles as the deletion handle, so it must be
/// reproducible from the stored record alone.
pub fn library_filename(original_name: &str, at: OffsetDateTime) -> String {
    let millis = at.unix_timestamp_nanos() / 1_000_000;
    format!("{millis}-{}", sanitize_filename(original_name))
}

/// Best-effort original name for a generated image, taken from the last path
/// segment of its transient URL.
pub fn name_from_url(url: &str) -> &str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    match path.rsplit('/').next() {
        Some(segment) if !segment.is_empty() && !segment.contains(':') => segment,
        _ => "generated.png",
    }
}

fn sanitize_filename(original: &str) -> String {
    let path = Path::new(original);
    let stem = path
        .file_stem()
        .and_then(|value| value.to_str())
        .unwrap_or("image");
    let mut base = slugify(stem);
    if base.is_empty() {
        base = "image".to_string();
    }

    let extension = path
        .extension()
        .and_then(|value| value.to_str())
        .map(|value| value.trim_matches('.').to_ascii_lowercase())
        .filter(|value| !value.is_empty());

    match extension {
        Some(ext) => format!("{base}.{ext}"),
        None => base,
    }
}
