//! Provider adapter interface and factory
//!
//! One adapter per backend. Adapters are pure: they build requests, parse
//! bodies and estimate cost, but never perform I/O themselves.

use crate::anthropic::AnthropicAdapter;
use crate::config::{ProviderConfig, ProviderKind};
use crate::error::AiError;
use crate::ollama::OllamaAdapter;
use crate::transport::HttpRequest;
use crate::types::{CompletionRequest, CompletionResponse, OperationKind};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Approximate tokens per whitespace-separated word
pub const TOKENS_PER_WORD: f64 = 1.3;

/// Per-million-token prices in USD
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pricing {
    /// Price per 1M input tokens
    pub input_per_million: f64,
    /// Price per 1M output tokens
    pub output_per_million: f64,
}

impl Pricing {
    /// Free (local) model
    pub const FREE: Pricing = Pricing {
        input_per_million: 0.0,
        output_per_million: 0.0,
    };
}

/// Estimated token usage and cost of one call
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CostEstimate {
    /// Input tokens
    pub input_tokens: u64,
    /// Output tokens
    pub output_tokens: u64,
    /// Cost in USD
    pub cost_usd: f64,
}

impl CostEstimate {
    /// Compute cost from token counts and pricing
    pub fn from_tokens(input_tokens: u64, output_tokens: u64, pricing: Pricing) -> Self {
        let cost_usd = input_tokens as f64 / 1_000_000.0 * pricing.input_per_million
            + output_tokens as f64 / 1_000_000.0 * pricing.output_per_million;
        Self {
            input_tokens,
            output_tokens,
            cost_usd,
        }
    }

    /// Sum of two estimates
    pub fn add(&self, other: &CostEstimate) -> CostEstimate {
        CostEstimate {
            input_tokens: self.input_tokens + other.input_tokens,
            output_tokens: self.output_tokens + other.output_tokens,
            cost_usd: self.cost_usd + other.cost_usd,
        }
    }
}

/// Approximate token count: words x 1.3, rounded up
pub fn estimate_tokens(text: &str) -> u64 {
    let words = text.split_whitespace().count();
    (words as f64 * TOKENS_PER_WORD).ceil() as u64
}

/// Backend-specific request building, response parsing and pricing
pub trait ProviderAdapter: Send + Sync {
    /// Which backend this adapter targets
    fn kind(&self) -> ProviderKind;

    /// Model identifier used for requests
    fn model(&self) -> &str;

    /// Translate a structured request into an HTTP request
    fn build_request(&self, request: &CompletionRequest) -> HttpRequest;

    /// Parse a successful response body
    ///
    /// Empty or malformed bodies yield [`AiError::InvalidResponse`].
    fn parse_response(&self, body: &str) -> Result<CompletionResponse, AiError>;

    /// Pricing constants for the configured model
    fn pricing(&self) -> Pricing;

    /// Approximate token count of `text`
    fn count_tokens(&self, text: &str) -> u64 {
        estimate_tokens(text)
    }

    /// Cost estimate before the completion length is known
    fn estimate_cost(&self, input: &str, operation: OperationKind) -> CostEstimate {
        CostEstimate::from_tokens(
            self.count_tokens(input),
            operation.estimated_output_tokens(),
            self.pricing(),
        )
    }
}

/// Create the adapter selected by `config.kind`
///
/// Hosted backends require an API key; local ones ignore it.
pub fn create_adapter(
    config: &ProviderConfig,
    api_key: Option<String>,
) -> Result<Arc<dyn ProviderAdapter>, AiError> {
    match config.kind {
        ProviderKind::Anthropic => {
            let key = api_key
                .filter(|k| !k.trim().is_empty())
                .ok_or_else(|| {
                    AiError::InvalidApiKey(format!(
                        "No API key provided (expected in ${})",
                        config.api_key_env
                    ))
                })?;
            Ok(Arc::new(AnthropicAdapter::new(
                config.endpoint_or_default(),
                config.model.clone(),
                key,
            )))
        }
        ProviderKind::Ollama => Ok(Arc::new(OllamaAdapter::new(
            config.endpoint_or_default(),
            config.model.clone(),
        ))),
    }
}
