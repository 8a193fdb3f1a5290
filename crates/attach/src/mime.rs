//! MIME pattern matching and the MIME-to-extension table.

/// Known wildcard categories and exact types mapped to their canonical
/// extensions. Order matters: inference preserves first-occurrence order.
const EXTENSION_TABLE: &[(&str, &[&str])] = &[
    ("image/*", &[".png", ".jpg", ".jpeg", ".gif", ".webp", ".svg"]),
    ("image/png", &[".png"]),
    ("image/jpeg", &[".jpg", ".jpeg"]),
    ("image/gif", &[".gif"]),
    ("image/webp", &[".webp"]),
    ("image/svg+xml", &[".svg"]),
    ("audio/*", &[".mp3", ".wav", ".ogg"]),
    ("audio/mpeg", &[".mp3"]),
    ("audio/wav", &[".wav"]),
    ("audio/ogg", &[".ogg"]),
    ("video/*", &[".mp4", ".webm"]),
    ("video/mp4", &[".mp4"]),
    ("video/webm", &[".webm"]),
    ("application/pdf", &[".pdf"]),
    ("text/*", &[".txt", ".md", ".csv"]),
    ("text/plain", &[".txt"]),
    ("text/markdown", &[".md"]),
    ("text/csv", &[".csv"]),
    ("application/json", &[".json"]),
    ("text/javascript", &[".js"]),
    ("application/javascript", &[".js"]),
    ("text/typescript", &[".ts"]),
    ("text/x-python", &[".py"]),
];

/// Match a candidate MIME type against an allow-list pattern.
///
/// `*/*` matches any non-empty type; `category/*` matches types in that
/// category; anything else is exact equality. Empty patterns and empty
/// candidates never match, so malformed input cannot widen the allow-list.
pub fn matches_mime_pattern(candidate: &str, pattern: &str) -> bool {
    if candidate.is_empty() || pattern.is_empty() {
        return false;
    }
    if pattern == "*/*" {
        return true;
    }
    if let Some(category) = pattern.strip_suffix("/*") {
        return candidate
            .strip_prefix(category)
            .is_some_and(|rest| rest.starts_with('/'));
    }
    candidate == pattern
}

/// Infer the extension allow-list from a MIME allow-list.
///
/// Unknown types contribute nothing. Results are deduplicated in
/// first-occurrence order, not sorted.
pub fn infer_extensions(mime_types: &[String]) -> Vec<String> {
    let mut extensions: Vec<String> = Vec::new();
    for mime in mime_types {
        let Some((_, exts)) = EXTENSION_TABLE.iter().find(|(key, _)| *key == mime.as_str()) else {
            continue;
        };
        for ext in *exts {
            if !extensions.iter().any(|e| e == ext) {
                extensions.push((*ext).to_string());
            }
        }
    }
    extensions
}

/// Canonical extension (without the dot) for an exact MIME type, falling
/// back to the subtype for types the table does not know.
pub fn extension_for_mime(mime_type: &str) -> Option<String> {
    if let Some((_, exts)) = EXTENSION_TABLE
        .iter()
        .find(|(key, _)| *key == mime_type && !key.ends_with("/*"))
    {
        return exts.first().map(|e| e.trim_start_matches('.').to_string());
    }
    let subtype = mime_type.split_once('/')?.1;
    if subtype.is_empty() || subtype == "*" {
        return None;
    }
    Some(subtype.to_string())
}

/// Lower-cased, dot-prefixed extension of a filename, or `None` when the
/// name has no dot (such files rely solely on MIME matching). An
/// empty-string entry in an extension allow-list is intentionally
/// unsupported: dot-less names never produce a sentinel to match it.
pub fn file_extension(name: &str) -> Option<String> {
    let idx = name.rfind('.')?;
    Some(format!(".{}", name[idx + 1..].to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wildcard_patterns() {
        assert!(matches_mime_pattern("image/png", "*/*"));
        assert!(matches_mime_pattern("application/pdf", "*/*"));
        assert!(matches_mime_pattern("image/png", "image/*"));
        assert!(matches_mime_pattern("image/svg+xml", "image/*"));
        assert!(!matches_mime_pattern("text/plain", "image/*"));
        // Category prefix must be followed by a slash.
        assert!(!matches_mime_pattern("imagefoo/png", "image/*"));
    }

    #[test]
    fn test_exact_patterns() {
        assert!(matches_mime_pattern("application/pdf", "application/pdf"));
        assert!(!matches_mime_pattern("application/pdf", "application/json"));
    }

    #[test]
    fn test_empty_never_matches() {
        assert!(!matches_mime_pattern("", "*/*"));
        assert!(!matches_mime_pattern("", "image/*"));
        assert!(!matches_mime_pattern("image/png", ""));
        assert!(!matches_mime_pattern("", ""));
    }

    #[test]
    fn test_infer_extensions_dedup_insertion_order() {
        let mimes = vec!["image/png".to_string(), "image/*".to_string()];
        let exts = infer_extensions(&mimes);
        // .png appears once, at its first occurrence.
        assert_eq!(exts[0], ".png");
        assert_eq!(exts.iter().filter(|e| *e == ".png").count(), 1);
        assert!(exts.contains(&".webp".to_string()));
    }

    #[test]
    fn test_infer_extensions_unknown_contributes_nothing() {
        let mimes = vec![
            "application/x-unheard-of".to_string(),
            "application/pdf".to_string(),
        ];
        assert_eq!(infer_extensions(&mimes), vec![".pdf".to_string()]);
    }

    #[test]
    fn test_extension_for_mime() {
        assert_eq!(extension_for_mime("image/png").as_deref(), Some("png"));
        assert_eq!(extension_for_mime("image/jpeg").as_deref(), Some("jpg"));
        assert_eq!(extension_for_mime("audio/flac").as_deref(), Some("flac"));
        assert_eq!(extension_for_mime("bogus"), None);
        assert_eq!(extension_for_mime("image/*"), None);
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("photo.PNG").as_deref(), Some(".png"));
        assert_eq!(file_extension("archive.tar.gz").as_deref(), Some(".gz"));
        assert_eq!(file_extension("README"), None);
        assert_eq!(file_extension("trailing.").as_deref(), Some("."));
    }
}
