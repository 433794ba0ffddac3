//! Link-path normalization
//!
//! Every link comparison in the engine goes through [`normalize_link_path`] so that
//! `[[Notes/Seed.md#Heading|the seed]]`, `notes/seed` and `Notes/Seed.md` compare equal.

/// Extensions treated as note file suffixes
const NOTE_EXTENSIONS: [&str; 2] = [".md", ".markdown"];

/// Normalize a raw link reference or note path for comparison
///
/// Strips surrounding `[[ ]]`, the alias (`|...`), the anchor (`#...`, including
/// block references) and a note file extension, then trims and lowercases.
pub fn normalize_link_path(raw: &str) -> String {
    let mut path = raw.trim();
    path = path.strip_prefix("[[").unwrap_or(path);
    path = path.strip_suffix("]]").unwrap_or(path);

    if let Some((head, _alias)) = path.split_once('|') {
        path = head;
    }
    if let Some((head, _anchor)) = path.split_once('#') {
        path = head;
    }

    let path = path.trim();
    let lower = path.to_lowercase();
    for ext in NOTE_EXTENSIONS {
        if let Some(stripped) = lower.strip_suffix(ext) {
            return stripped.trim().to_string();
        }
    }
    lower
}

/// Last path segment of an already-normalized link
pub fn link_basename(normalized: &str) -> &str {
    normalized.rsplit('/').next().unwrap_or(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_extension() {
        assert_eq!(normalize_link_path("Seeds/Morning.md"), "seeds/morning");
        assert_eq!(normalize_link_path("essay.markdown"), "essay");
    }

    #[test]
    fn test_strips_anchor_and_alias() {
        assert_eq!(normalize_link_path("Seeds/Morning.md#Light|morning light"), "seeds/morning");
        assert_eq!(normalize_link_path("Morning#^block-1"), "morning");
        assert_eq!(normalize_link_path("Morning|alias"), "morning");
    }

    #[test]
    fn test_trims_and_unwraps_brackets() {
        assert_eq!(normalize_link_path("  [[ Kitchen Table ]]  "), "kitchen table");
    }

    #[test]
    fn test_keeps_non_note_dots() {
        assert_eq!(normalize_link_path("v1.2 release"), "v1.2 release");
    }

    #[test]
    fn test_basename() {
        assert_eq!(link_basename("seeds/morning"), "morning");
        assert_eq!(link_basename("morning"), "morning");
    }
}
