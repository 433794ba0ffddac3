//! Note module
//!
//! Notes are owned by the host application; the engine only ever reads them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of a note (usually a vault-relative path)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    /// Create a note identifier from any string-like value
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NoteId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for NoteId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A short note ("seed") as supplied by the host
///
/// Timestamps are milliseconds since the Unix epoch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Identifier (path) of the note
    pub id: NoteId,

    /// Raw markdown content, possibly with frontmatter
    #[serde(default)]
    pub content: String,

    /// Normalized tags, in first-seen order
    #[serde(default)]
    pub tags: Vec<String>,

    /// Raw outgoing link references as written in the note
    #[serde(default)]
    pub links: Vec<String>,

    /// Notes linking to this note
    #[serde(default)]
    pub backlinks: Vec<NoteId>,

    /// Creation time
    #[serde(default)]
    pub created_at: u64,

    /// Last modification time
    #[serde(default)]
    pub modified_at: u64,
}

impl Note {
    /// Create a note with content and no metadata
    pub fn new(id: impl Into<NoteId>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            tags: Vec::new(),
            links: Vec::new(),
            backlinks: Vec::new(),
            created_at: 0,
            modified_at: 0,
        }
    }

    /// Set tags, normalizing and de-duplicating them
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tags.clear();
        for tag in tags {
            let tag = normalize_tag(tag.as_ref());
            if !tag.is_empty() && !self.tags.contains(&tag) {
                self.tags.push(tag);
            }
        }
        self
    }

    /// Set raw outgoing links
    pub fn with_links<I, S>(mut self, links: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.links = links.into_iter().map(Into::into).collect();
        self
    }

    /// Set backlink sources
    pub fn with_backlinks<I, S>(mut self, backlinks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<NoteId>,
    {
        self.backlinks = backlinks.into_iter().map(Into::into).collect();
        self
    }

    /// Set creation and modification timestamps
    pub fn with_timestamps(mut self, created_at: u64, modified_at: u64) -> Self {
        self.created_at = created_at;
        self.modified_at = modified_at;
        self
    }

    /// Whether the note carries any tags
    pub fn has_tags(&self) -> bool {
        !self.tags.is_empty()
    }
}

/// Normalize a tag: trim, drop a leading `#`, lowercase
pub fn normalize_tag(tag: &str) -> String {
    tag.trim().trim_start_matches('#').trim().to_lowercase()
}
