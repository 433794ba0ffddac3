//! Privacy-scrubbed seed payloads
//!
//! These types are the only note-derived data that may leave the process. They
//! carry an anonymized sequence id instead of the note path.

use crate::RelationshipKind;
use serde::{Deserialize, Serialize};

/// Image detected in a note
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoInfo {
    /// Best-effort caption for the image
    pub caption: String,
}

/// Anonymized view of one note
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedContext {
    /// Anonymized id (`seed-1`, `seed-2`, ...)
    pub seq_id: String,

    /// Content with frontmatter removed
    pub content: String,

    /// Normalized tags
    pub tags: Vec<String>,

    /// Creation time (ms since epoch)
    pub created_at: u64,

    /// Number of notes linking here
    pub backlink_count: usize,

    /// Detected image, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<PhotoInfo>,
}

/// An edge between two seeds, expressed with anonymized ids
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipHint {
    /// Seq id of the first seed
    pub from: String,
    /// Seq id of the second seed
    pub to: String,
    /// Edge kind
    pub kind: RelationshipKind,
    /// Edge strength
    pub strength: f64,
}

/// Everything sent to the provider for a discovery request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedPayload {
    /// The seeds
    pub seeds: Vec<SeedContext>,

    /// Optional relationship hints between seeds
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relationships: Vec<RelationshipHint>,

    /// Optional clusters of seq ids
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub clusters: Vec<Vec<String>>,

    /// Scrubbed body of a structured source (map of content), if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_outline: Option<String>,
}

impl SeedPayload {
    /// Create a payload with seeds only
    pub fn new(seeds: Vec<SeedContext>) -> Self {
        Self {
            seeds,
            ..Default::default()
        }
    }

    /// Number of seeds
    pub fn len(&self) -> usize {
        self.seeds.len()
    }

    /// Whether there are no seeds
    pub fn is_empty(&self) -> bool {
        self.seeds.is_empty()
    }
}
