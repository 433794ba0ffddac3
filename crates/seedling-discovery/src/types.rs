//! Request options and results for center discovery

use crate::phase::DiscoveryPhase;
use seedling_domain::{DiscoveredCenter, TagFilterMode};
use seedling_llm::CostEstimate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-request options
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiscoveryOptions {
    /// Keep only notes matching these tags (empty keeps everything)
    pub tags: Vec<String>,

    /// How `tags` are combined
    pub tag_mode: TagFilterMode,

    /// Override the configured relationship-hint setting
    pub relationship_hints: Option<bool>,
}

impl DiscoveryOptions {
    /// Filter by `tags` combined with `mode`
    pub fn with_tags(mut self, tags: Vec<String>, mode: TagFilterMode) -> Self {
        self.tags = tags;
        self.tag_mode = mode;
        self
    }

    /// Force relationship hints on or off
    pub fn with_relationship_hints(mut self, enabled: bool) -> Self {
        self.relationship_hints = Some(enabled);
        self
    }
}

/// Result of one discovery request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryOutcome {
    /// Identifier for correlating logs
    pub request_id: Uuid,

    /// Human-readable description of the input
    pub source: String,

    /// Notes sent to the provider
    pub note_count: usize,

    /// Notes that could not be read
    pub skipped_notes: usize,

    /// Centers, strongest first
    pub centers: Vec<DiscoveredCenter>,

    /// Percentage of notes covered by at least one center (map of content only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coverage: Option<u32>,

    /// Pre-call estimate for the provider request
    pub cost: CostEstimate,

    /// Phases the request went through
    pub phases: Vec<DiscoveryPhase>,
}
