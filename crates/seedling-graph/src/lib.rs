//! Seedling Graph
//!
//! Pure, synchronous analysis over a set of notes:
//!
//! - [`RelationshipGraphBuilder`]: weighted edges from links and shared tags
//! - [`TagCoOccurrenceIndex`]: tag frequency, co-occurrence and filtering
//! - [`ClusterFinder`]: connected groups of strongly related notes
//!
//! Nothing in this crate fails: malformed or missing metadata simply yields
//! fewer edges.
//!
//! # Examples
//!
//! ```
//! use seedling_domain::Note;
//! use seedling_graph::ClusterFinder;
//!
//! let notes = vec![
//!     Note::new("a.md", "").with_tags(["grief", "kitchen"]),
//!     Note::new("b.md", "").with_tags(["grief", "kitchen"]),
//!     Note::new("c.md", "").with_tags(["travel"]),
//! ];
//!
//! let clusters = ClusterFinder::default().find_clusters(&notes, 0.5);
//! assert_eq!(clusters.len(), 1);
//! assert_eq!(clusters[0].len(), 2);
//! ```

#![warn(missing_docs)]

mod builder;
mod clusters;
mod tag_index;

pub use builder::{
    RelationshipGraphBuilder, BIDIRECTIONAL_STRENGTH, LINK_STRENGTH, SHARED_TAG_BASE,
    SHARED_TAG_SPAN,
};
pub use clusters::{ClusterFinder, DEFAULT_MAX_EDGES_PER_NOTE};
pub use tag_index::TagCoOccurrenceIndex;
