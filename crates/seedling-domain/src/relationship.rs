//! Relationship module
//!
//! Pairwise, weighted connections between notes. A pair connected in both
//! directions is reported once as [`RelationshipKind::Bidirectional`] and never
//! also as a one-way backlink or wikilink.

use crate::NoteId;
use serde::{Deserialize, Serialize};

/// Type of relationship between two notes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationshipKind {
    /// The target links to the source
    Backlink,

    /// The source links to the target
    Wikilink,

    /// Both notes link to each other
    Bidirectional,

    /// The notes share at least one tag
    SharedTag,
}

impl RelationshipKind {
    /// Stable string form used in logs and provider payloads
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipKind::Backlink => "backlink",
            RelationshipKind::Wikilink => "wikilink",
            RelationshipKind::Bidirectional => "bidirectional",
            RelationshipKind::SharedTag => "shared-tag",
        }
    }
}

/// A weighted edge between two notes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipEdge {
    /// Note the relationship was computed for
    pub source: NoteId,

    /// Related note
    pub target: NoteId,

    /// Kind of relationship
    pub kind: RelationshipKind,

    /// Strength in [0.0, 1.0]
    pub strength: f64,

    /// Short snippets explaining the edge (shared tag names for shared-tag edges)
    #[serde(default)]
    pub context: Vec<String>,
}

impl RelationshipEdge {
    /// Create a new edge
    ///
    /// # Panics
    /// Panics if strength is outside [0, 1]
    pub fn new(source: NoteId, target: NoteId, kind: RelationshipKind, strength: f64) -> Self {
        assert!((0.0..=1.0).contains(&strength), "Strength must be in [0, 1]");

        Self {
            source,
            target,
            kind,
            strength,
            context: Vec::new(),
        }
    }

    /// Attach context snippets
    pub fn with_context(mut self, context: Vec<String>) -> Self {
        self.context = context;
        self
    }
}

/// The three disjoint relationship lists computed for one note
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteRelationships {
    /// Incoming links; bidirectional pairs are reported here with kind `Bidirectional`
    pub backlinks: Vec<RelationshipEdge>,

    /// Outgoing links that are not already bidirectional
    pub wikilinks: Vec<RelationshipEdge>,

    /// Tag-overlap edges
    pub shared_tags: Vec<RelationshipEdge>,
}

impl NoteRelationships {
    /// Total number of edges
    pub fn len(&self) -> usize {
        self.backlinks.len() + self.wikilinks.len() + self.shared_tags.len()
    }

    /// Whether no edge was found
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over every edge, backlinks first
    pub fn iter(&self) -> impl Iterator<Item = &RelationshipEdge> {
        self.backlinks
            .iter()
            .chain(self.wikilinks.iter())
            .chain(self.shared_tags.iter())
    }

    /// The `limit` strongest edges, strongest first; equal strengths keep list order
    pub fn strongest(&self, limit: usize) -> Vec<&RelationshipEdge> {
        let mut edges: Vec<&RelationshipEdge> = self.iter().collect();
        edges.sort_by(|a, b| b.strength.total_cmp(&a.strength));
        edges.truncate(limit);
        edges
    }
}

/// Two or more notes connected at or above a strength threshold
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    /// Members in discovery order
    pub notes: Vec<NoteId>,
}

impl Cluster {
    /// Number of members
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    /// Whether the cluster has no members
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Whether `id` is a member
    pub fn contains(&self, id: &NoteId) -> bool {
        self.notes.contains(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(target: &str, kind: RelationshipKind, strength: f64) -> RelationshipEdge {
        RelationshipEdge::new(NoteId::new("src"), NoteId::new(target), kind, strength)
    }

    #[test]
    fn test_strongest_orders_by_strength() {
        let relationships = NoteRelationships {
            backlinks: vec![edge("a", RelationshipKind::Backlink, 0.8)],
            wikilinks: vec![edge("b", RelationshipKind::Wikilink, 0.8)],
            shared_tags: vec![
                edge("c", RelationshipKind::SharedTag, 0.5),
                edge("d", RelationshipKind::SharedTag, 0.7),
            ],
        };

        let top: Vec<&str> = relationships
            .strongest(3)
            .iter()
            .map(|e| e.target.as_str())
            .collect();
        assert_eq!(top, vec!["a", "b", "d"]);
        assert_eq!(relationships.len(), 4);
    }

    #[test]
    fn test_kind_serializes_kebab_case() {
        let json = serde_json::to_string(&RelationshipKind::SharedTag).unwrap();
        assert_eq!(json, "\"shared-tag\"");
    }

    #[test]
    #[should_panic]
    fn test_invalid_strength() {
        edge("a", RelationshipKind::Backlink, 1.5);
    }
}
