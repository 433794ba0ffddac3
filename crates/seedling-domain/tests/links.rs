//! Property tests for link-path normalization

use proptest::prelude::*;
use seedling_domain::links::{link_basename, normalize_link_path};

/// Path-like stems without note suffixes, anchors or aliases
fn stem() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_-][A-Za-z0-9 _/-]{0,15}"
}

/// A stem dressed up the way a wikilink can be written
fn decorated() -> impl Strategy<Value = (String, String)> {
    (
        stem(),
        prop_oneof![Just(""), Just(".md"), Just(".markdown"), Just(".MD")],
        proptest::option::of("[A-Za-z0-9^ -]{1,8}"),
        proptest::option::of("[A-Za-z0-9 ]{1,8}"),
        any::<bool>(),
    )
        .prop_map(|(stem, ext, anchor, alias, brackets)| {
            let mut raw = format!("{}{}", stem, ext);
            if let Some(anchor) = anchor {
                raw.push('#');
                raw.push_str(&anchor);
            }
            if let Some(alias) = alias {
                raw.push('|');
                raw.push_str(&alias);
            }
            if brackets {
                raw = format!("[[{}]]", raw);
            }
            (stem, raw)
        })
}

proptest! {
    #[test]
    fn decorations_are_stripped((stem, raw) in decorated()) {
        prop_assert_eq!(normalize_link_path(&raw), stem.to_lowercase().trim().to_string());
    }

    #[test]
    fn normalization_is_idempotent((_stem, raw) in decorated()) {
        let once = normalize_link_path(&raw);
        prop_assert_eq!(normalize_link_path(&once), once);
    }

    #[test]
    fn case_does_not_matter(stem in stem()) {
        prop_assert_eq!(
            normalize_link_path(&stem.to_uppercase()),
            normalize_link_path(&stem.to_lowercase())
        );
    }

    #[test]
    fn basename_has_no_separator((_stem, raw) in decorated()) {
        let normalized = normalize_link_path(&raw);
        let base = link_basename(&normalized);
        prop_assert!(!base.contains('/'));
        prop_assert!(normalized.ends_with(base));
    }
}
