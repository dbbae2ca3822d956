use std::path::Path;

/// Characters that are unsafe or reserved in common filesystem path syntax.
const UNSAFE_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Strip filesystem-unsafe characters from a title.
///
/// Removes exactly `< > : " / \ | ? *` and nothing else — no case, whitespace,
/// or length transformation. Idempotent: sanitizing twice equals sanitizing once.
pub fn sanitize_title(title: &str) -> String {
    title.chars().filter(|c| !UNSAFE_CHARS.contains(c)).collect()
}

/// Render a path with a single canonical separator style (forward slashes)
/// for storage in the catalog.
pub fn normalize_separators(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
