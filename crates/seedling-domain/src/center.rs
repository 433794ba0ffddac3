//! Discovered centers
//!
//! A center is a recurring theme the provider found across several notes.

use crate::NoteId;
use serde::{Deserialize, Serialize};

/// How strongly a center holds the notes together
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CenterStrength {
    /// Present across many notes with clear pull
    Strong,
    /// Present but less central
    Medium,
    /// Faint or speculative
    Weak,
}

impl CenterStrength {
    /// Deterministic confidence for this strength
    pub fn confidence(&self) -> f64 {
        match self {
            CenterStrength::Strong => 0.9,
            CenterStrength::Medium => 0.7,
            CenterStrength::Weak => 0.5,
        }
    }

    /// Sort rank, lower is stronger
    pub fn rank(&self) -> u8 {
        match self {
            CenterStrength::Strong => 0,
            CenterStrength::Medium => 1,
            CenterStrength::Weak => 2,
        }
    }

    /// Lowercase string form
    pub fn as_str(&self) -> &'static str {
        match self {
            CenterStrength::Strong => "strong",
            CenterStrength::Medium => "medium",
            CenterStrength::Weak => "weak",
        }
    }

    /// Parse a strength string (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "strong" => Some(CenterStrength::Strong),
            "medium" => Some(CenterStrength::Medium),
            "weak" => Some(CenterStrength::Weak),
            _ => None,
        }
    }
}

/// Qualitative flags the provider reports for a center
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CenterAssessment {
    /// Appears across different domains of the writer's life or work
    pub cross_domain: bool,
    /// Carries emotional charge
    pub emotional_resonance: bool,
    /// Grounded in concrete images or events
    pub concrete: bool,
    /// Could restructure the whole piece around itself
    pub structural_pivot: bool,
}

/// A thematic center discovered across notes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveredCenter {
    /// Short name of the theme
    pub name: String,

    /// Why the notes belong together
    pub explanation: String,

    /// Strength category
    pub strength: CenterStrength,

    /// Notes that express this center
    pub connected_notes: Vec<NoteId>,

    /// "Why start here" advice, kept only on the top-ranked center
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,

    /// Confidence derived from strength
    pub confidence: f64,

    /// Qualitative assessment flags
    #[serde(default)]
    pub assessment: CenterAssessment,
}

impl DiscoveredCenter {
    /// Create a center; confidence follows from strength
    pub fn new(name: impl Into<String>, explanation: impl Into<String>, strength: CenterStrength) -> Self {
        Self {
            name: name.into(),
            explanation: explanation.into(),
            strength,
            connected_notes: Vec::new(),
            recommendation: None,
            confidence: strength.confidence(),
            assessment: CenterAssessment::default(),
        }
    }

    /// Set connected notes
    pub fn with_connected_notes(mut self, notes: Vec<NoteId>) -> Self {
        self.connected_notes = notes;
        self
    }

    /// Set the recommendation text
    pub fn with_recommendation(mut self, recommendation: impl Into<String>) -> Self {
        self.recommendation = Some(recommendation.into());
        self
    }

    /// Set assessment flags
    pub fn with_assessment(mut self, assessment: CenterAssessment) -> Self {
        self.assessment = assessment;
        self
    }
}
