//! Seedling LLM Provider Layer
//!
//! Everything between an orchestrated operation and the model backend.
//!
//! # Architecture
//!
//! - [`ProviderAdapter`]: backend-specific request building, response parsing
//!   and pricing ([`AnthropicAdapter`], [`OllamaAdapter`])
//! - [`HttpTransport`]: moves bytes ([`ReqwestTransport`] in production,
//!   [`MockTransport`] in tests)
//! - [`ProviderClient`]: bounded retries with exponential backoff and a
//!   per-attempt timeout
//! - [`schema`]: typed, validated reply shapes
//!
//! # Examples
//!
//! ```
//! use seedling_llm::{create_adapter, ProviderConfig, ProviderKind};
//!
//! let config = ProviderConfig {
//!     kind: ProviderKind::Ollama,
//!     model: "llama3".to_string(),
//!     ..ProviderConfig::default()
//! };
//! let adapter = create_adapter(&config, None).unwrap();
//! assert_eq!(adapter.model(), "llama3");
//! ```

#![warn(missing_docs)]

pub mod adapter;
pub mod anthropic;
pub mod client;
pub mod config;
pub mod error;
pub mod mock;
pub mod ollama;
pub mod parse;
pub mod retry;
pub mod schema;
pub mod transport;
pub mod types;

pub use adapter::{create_adapter, estimate_tokens, CostEstimate, Pricing, ProviderAdapter, TOKENS_PER_WORD};
pub use anthropic::AnthropicAdapter;
pub use client::{ProviderClient, Validated, DEFAULT_ATTEMPT_TIMEOUT};
pub use config::{ProviderConfig, ProviderKind};
pub use error::{AiError, ErrorCode};
pub use mock::{anthropic_body, MockTransport};
pub use ollama::OllamaAdapter;
pub use parse::extract_json_payload;
pub use retry::{AttemptFailure, RetryDecision, RetryPolicy, RetryState};
pub use schema::{
    CentersResponse, Expansion, ExpansionsResponse, SeedCenter, SeedCentersResponse, TextCenter,
    UnityCheck, ValidatedResponse, ValidationError, WholenessAnalysis,
};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, TransportError};
pub use types::{CompletionRequest, CompletionResponse, Message, OperationKind, Role, Usage};
