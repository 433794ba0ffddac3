//! Seedling Domain Layer
//!
//! Core value types and collaborator boundaries for the center discovery engine.
//! Everything here is plain data or a trait; algorithms live in `seedling-graph`,
//! provider I/O in `seedling-llm`, orchestration in `seedling-orchestrator` and
//! `seedling-discovery`.
//!
//! ## Key Concepts
//!
//! - **Note**: a short piece of writing ("seed") owned by the host application
//! - **Relationship edge**: a weighted connection between two notes (link or shared tags)
//! - **Cluster**: two or more notes connected above a strength threshold
//! - **Center**: a recurring theme discovered across notes by the LLM
//! - **Seed context**: the privacy-scrubbed view of a note that may leave the process
//!
//! ## Collaborators
//!
//! The host supplies note content through [`traits::NoteSource`] and link resolution
//! through [`traits::LinkResolver`]. [`vault::InMemoryVault`] implements both for
//! tests and for the command-line front end.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod center;
pub mod clock;
pub mod links;
pub mod note;
pub mod relationship;
pub mod seed;
pub mod tags;
pub mod traits;
pub mod vault;

// Re-exports for convenience
pub use center::{CenterAssessment, CenterStrength, DiscoveredCenter};
pub use clock::{Clock, ManualClock, SystemClock};
pub use links::normalize_link_path;
pub use note::{normalize_tag, Note, NoteId};
pub use relationship::{Cluster, NoteRelationships, RelationshipEdge, RelationshipKind};
pub use seed::{PhotoInfo, RelationshipHint, SeedContext, SeedPayload};
pub use tags::{TagCombination, TagCount, TagFilterMode, TagStats};
pub use traits::{LinkResolver, NoteSource};
pub use vault::{InMemoryVault, VaultError};
