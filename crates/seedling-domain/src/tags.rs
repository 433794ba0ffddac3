//! Tag statistics types

use crate::NoteId;
use serde::{Deserialize, Serialize};

/// A tag paired with a count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCount {
    /// Tag name
    pub tag: String,
    /// Count
    pub count: usize,
}

/// Aggregated statistics for one tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagStats {
    /// Tag name
    pub tag: String,

    /// Number of notes carrying the tag
    pub count: usize,

    /// Notes carrying the tag, in index order
    pub note_ids: Vec<NoteId>,

    /// Tags seen on the same notes, in first-seen order
    pub co_occurrences: Vec<TagCount>,

    /// Earliest creation time among tagged notes
    pub earliest_created: u64,

    /// Latest modification time among tagged notes
    pub latest_modified: u64,
}

impl TagStats {
    /// Empty stats for a tag
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            count: 0,
            note_ids: Vec::new(),
            co_occurrences: Vec::new(),
            earliest_created: u64::MAX,
            latest_modified: 0,
        }
    }

    /// Co-occurrence count with another tag
    pub fn co_occurrence(&self, other: &str) -> usize {
        self.co_occurrences
            .iter()
            .find(|c| c.tag == other)
            .map(|c| c.count)
            .unwrap_or(0)
    }
}

/// Membership mode for tag filtering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagFilterMode {
    /// Note has at least one of the tags
    #[default]
    Any,
    /// Note has every tag
    All,
}

/// A frequently co-occurring tag pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCombination {
    /// The pair, lexicographically sorted
    pub tags: (String, String),
    /// Notes carrying both tags
    pub co_occurrence: usize,
    /// Sum of both tags' individual counts
    pub combined_frequency: usize,
}
