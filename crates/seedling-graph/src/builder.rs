//! Relationship graph construction
//!
//! Computes, for one source note, the three disjoint edge lists described in
//! [`NoteRelationships`]: backlinks (incl. bidirectional pairs), outgoing
//! wikilinks and shared-tag edges.

use seedling_domain::links::{link_basename, normalize_link_path};
use seedling_domain::{Note, NoteRelationships, RelationshipEdge, RelationshipKind};
use std::collections::{HashMap, HashSet};

/// Strength of a pair linked in both directions
pub const BIDIRECTIONAL_STRENGTH: f64 = 1.0;

/// Strength of a one-way backlink or wikilink
pub const LINK_STRENGTH: f64 = 0.8;

/// Minimum shared-tag strength
pub const SHARED_TAG_BASE: f64 = 0.3;

/// Shared-tag strength added at full Jaccard similarity
pub const SHARED_TAG_SPAN: f64 = 0.4;

/// Snippets kept per link edge
const MAX_LINK_SNIPPETS: usize = 3;

/// Characters kept per snippet
const MAX_SNIPPET_CHARS: usize = 160;

/// Builds relationship edges over a fixed candidate set
///
/// Link targets are matched on the normalized path first, then on the
/// normalized file name, so `[[Morning]]` finds `journal/Morning.md`.
pub struct RelationshipGraphBuilder<'a> {
    candidates: &'a [Note],
    normalized_ids: Vec<String>,
    by_path: HashMap<String, usize>,
    by_basename: HashMap<String, usize>,
}

impl<'a> RelationshipGraphBuilder<'a> {
    /// Index the candidate notes
    pub fn new(candidates: &'a [Note]) -> Self {
        let normalized_ids: Vec<String> = candidates
            .iter()
            .map(|note| normalize_link_path(note.id.as_str()))
            .collect();

        let mut by_path = HashMap::new();
        let mut by_basename = HashMap::new();
        for (idx, normalized) in normalized_ids.iter().enumerate() {
            by_path.entry(normalized.clone()).or_insert(idx);
            by_basename
                .entry(link_basename(normalized).to_string())
                .or_insert(idx);
        }

        Self {
            candidates,
            normalized_ids,
            by_path,
            by_basename,
        }
    }

    /// The candidate notes
    pub fn candidates(&self) -> &'a [Note] {
        self.candidates
    }

    /// Compute all relationships of `source` against the candidate set
    pub fn relationships_for(&self, source: &Note) -> NoteRelationships {
        let source_normalized = normalize_link_path(source.id.as_str());
        let outgoing = self.outgoing_targets(source, &source_normalized);
        let backlink_sources: HashSet<String> = source
            .backlinks
            .iter()
            .map(|id| normalize_link_path(id.as_str()))
            .filter(|id| !id.is_empty())
            .collect();

        let mut relationships = NoteRelationships::default();

        // Backlinks, reclassified as bidirectional when the source links back
        for (idx, candidate) in self.candidates.iter().enumerate() {
            if self.normalized_ids[idx] == source_normalized
                || !backlink_sources.contains(&self.normalized_ids[idx])
            {
                continue;
            }

            let (kind, strength) = if outgoing.contains(&idx) {
                (RelationshipKind::Bidirectional, BIDIRECTIONAL_STRENGTH)
            } else {
                (RelationshipKind::Backlink, LINK_STRENGTH)
            };
            let context = link_snippets(candidate, |link| {
                self.link_matches(link, &source_normalized)
            });
            relationships.backlinks.push(
                RelationshipEdge::new(source.id.clone(), candidate.id.clone(), kind, strength)
                    .with_context(context),
            );
        }

        // Outgoing wikilinks not already counted as bidirectional
        let mut seen = HashSet::new();
        for link in &source.links {
            let Some(idx) = self.resolve(link) else {
                continue;
            };
            if self.normalized_ids[idx] == source_normalized || !seen.insert(idx) {
                continue;
            }
            if backlink_sources.contains(&self.normalized_ids[idx]) {
                continue;
            }

            let target = &self.candidates[idx];
            let target_normalized = &self.normalized_ids[idx];
            let context = link_snippets(source, |raw| self.link_matches(raw, target_normalized));
            relationships.wikilinks.push(
                RelationshipEdge::new(
                    source.id.clone(),
                    target.id.clone(),
                    RelationshipKind::Wikilink,
                    LINK_STRENGTH,
                )
                .with_context(context),
            );
        }

        // Shared tags
        if source.has_tags() {
            for (idx, candidate) in self.candidates.iter().enumerate() {
                if self.normalized_ids[idx] == source_normalized {
                    continue;
                }
                if let Some((strength, shared)) = shared_tag_strength(&source.tags, &candidate.tags) {
                    relationships.shared_tags.push(
                        RelationshipEdge::new(
                            source.id.clone(),
                            candidate.id.clone(),
                            RelationshipKind::SharedTag,
                            strength,
                        )
                        .with_context(shared),
                    );
                }
            }
        }

        relationships
    }

    /// Resolve a raw link to a candidate index
    fn resolve(&self, link: &str) -> Option<usize> {
        let normalized = normalize_link_path(link);
        if normalized.is_empty() {
            return None;
        }
        self.by_path
            .get(&normalized)
            .or_else(|| self.by_basename.get(link_basename(&normalized)))
            .copied()
    }

    fn outgoing_targets(&self, source: &Note, source_normalized: &str) -> HashSet<usize> {
        source
            .links
            .iter()
            .filter_map(|link| self.resolve(link))
            .filter(|&idx| self.normalized_ids[idx] != source_normalized)
            .collect()
    }

    /// Whether a raw link points at the note with normalized id `target`
    fn link_matches(&self, link: &str, target: &str) -> bool {
        match self.resolve(link) {
            Some(idx) => self.normalized_ids[idx] == target,
            None => {
                let normalized = normalize_link_path(link);
                normalized == target || link_basename(&normalized) == link_basename(target)
            }
        }
    }
}

/// Jaccard-based shared-tag strength
///
/// Returns `None` when either side has no tags or nothing is shared. Otherwise
/// `0.3 + jaccard * 0.4` and the shared tags in `a`'s order.
pub(crate) fn shared_tag_strength(a: &[String], b: &[String]) -> Option<(f64, Vec<String>)> {
    if a.is_empty() || b.is_empty() {
        return None;
    }

    let set_a: HashSet<&str> = a.iter().map(String::as_str).collect();
    let set_b: HashSet<&str> = b.iter().map(String::as_str).collect();

    let mut shared = Vec::new();
    let mut emitted = HashSet::new();
    for tag in a {
        if set_b.contains(tag.as_str()) && emitted.insert(tag.as_str()) {
            shared.push(tag.clone());
        }
    }
    if shared.is_empty() {
        return None;
    }

    let union = set_a.union(&set_b).count();
    let similarity = shared.len() as f64 / union as f64;
    Some((SHARED_TAG_BASE + similarity * SHARED_TAG_SPAN, shared))
}

/// Lines of `note` that contain one of its links accepted by `matches`
fn link_snippets(note: &Note, matches: impl Fn(&str) -> bool) -> Vec<String> {
    let raw_links: Vec<&str> = note
        .links
        .iter()
        .map(String::as_str)
        .filter(|link| matches(link))
        .collect();
    if raw_links.is_empty() {
        return Vec::new();
    }

    note.content
        .lines()
        .map(str::trim)
        .filter(|line| raw_links.iter().any(|link| contains_wikilink(line, link)))
        .take(MAX_LINK_SNIPPETS)
        .map(|line| line.chars().take(MAX_SNIPPET_CHARS).collect())
        .collect()
}

/// Whether `line` holds `[[link` closed by `]]` or followed by an anchor or alias
fn contains_wikilink(line: &str, link: &str) -> bool {
    if link.is_empty() {
        return false;
    }
    let opening = format!("[[{}", link);
    line.match_indices(&opening).any(|(at, _)| {
        let rest = &line[at + opening.len()..];
        rest.starts_with("]]") || rest.starts_with('|') || rest.starts_with('#')
    })
}
