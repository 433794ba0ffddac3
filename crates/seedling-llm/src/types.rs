//! Provider-neutral request and response shapes

use serde::{Deserialize, Serialize};

/// Role of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// End-user turn
    User,
    /// Model turn
    Assistant,
}

/// One role-tagged message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Author role
    pub role: Role,
    /// Text content
    pub content: String,
}

impl Message {
    /// A user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// A structured completion request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Model identifier
    pub model: String,

    /// Maximum output tokens
    pub max_tokens: u32,

    /// Ordered messages
    pub messages: Vec<Message>,

    /// Optional system instruction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
}

impl CompletionRequest {
    /// Single-turn request with system instructions and a user payload
    pub fn new(
        model: impl Into<String>,
        max_tokens: u32,
        system: impl Into<String>,
        user: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            max_tokens,
            messages: vec![Message::user(user)],
            system: Some(system.into()),
        }
    }

    /// All text that will be sent, for token estimation
    pub fn input_text(&self) -> String {
        let mut text = self.system.clone().unwrap_or_default();
        for message in &self.messages {
            text.push('\n');
            text.push_str(&message.content);
        }
        text
    }
}

/// A typed content block of a reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBlock {
    /// Block type tag, e.g. `text`
    #[serde(rename = "type")]
    pub kind: String,

    /// Text of the block (empty for non-text blocks)
    #[serde(default)]
    pub text: String,
}

/// Token usage counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Prompt tokens
    pub input_tokens: u64,
    /// Completion tokens
    pub output_tokens: u64,
}

/// A provider reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Provider-assigned identifier
    pub id: String,

    /// Role marker
    pub role: Role,

    /// Content blocks
    pub content: Vec<ContentBlock>,

    /// Why generation stopped
    #[serde(default)]
    pub stop_reason: Option<String>,

    /// Token usage
    #[serde(default)]
    pub usage: Usage,
}

impl CompletionResponse {
    /// Concatenated text of all `text` blocks
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter(|block| block.kind == "text")
            .map(|block| block.text.as_str())
            .collect::<Vec<_>>()
            .join("")
    }
}

/// Engine operations, used for cache keys, cost estimates and diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OperationKind {
    /// Centers within one text
    FindCenters,
    /// Expansion directions for a center
    SuggestExpansions,
    /// Whole-document wholeness analysis
    AnalyzeWholeness,
    /// Single-paragraph unity check
    CheckUnity,
    /// Centers across ad-hoc seeds
    FindCentersFromSeeds,
    /// Centers across notes of a map of content
    DiscoverCentersFromMoc,
}

impl OperationKind {
    /// Kebab-case name
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::FindCenters => "find-centers",
            OperationKind::SuggestExpansions => "suggest-expansions",
            OperationKind::AnalyzeWholeness => "analyze-wholeness",
            OperationKind::CheckUnity => "check-unity",
            OperationKind::FindCentersFromSeeds => "find-centers-from-seeds",
            OperationKind::DiscoverCentersFromMoc => "discover-centers-from-moc",
        }
    }

    /// Expected completion length when the real one is not yet known
    pub fn estimated_output_tokens(&self) -> u64 {
        match self {
            OperationKind::FindCenters => 500,
            OperationKind::SuggestExpansions => 800,
            OperationKind::AnalyzeWholeness => 1500,
            OperationKind::CheckUnity => 600,
            OperationKind::FindCentersFromSeeds => 1500,
            OperationKind::DiscoverCentersFromMoc => 2000,
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
