//! Ollama Adapter
//!
//! Targets Ollama's local chat API for running models on the writer's own
//! machine. Local inference is free, so pricing is zero.
//!
//! # Examples
//!
//! ```
//! use seedling_llm::{OllamaAdapter, ProviderAdapter};
//!
//! let adapter = OllamaAdapter::default_endpoint("llama3");
//! assert_eq!(adapter.model(), "llama3");
//! assert_eq!(adapter.pricing().input_per_million, 0.0);
//! ```

use crate::adapter::{Pricing, ProviderAdapter};
use crate::config::ProviderKind;
use crate::error::AiError;
use crate::transport::HttpRequest;
use crate::types::{CompletionRequest, CompletionResponse, ContentBlock, Role, Usage};
use serde::{Deserialize, Serialize};

/// Default Ollama API endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Adapter for a local Ollama instance
pub struct OllamaAdapter {
    endpoint: String,
    model: String,
}

/// Request body for the Ollama chat API
#[derive(Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: Vec<OllamaMessage>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Serialize, Deserialize)]
struct OllamaMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct OllamaOptions {
    num_predict: u32,
}

/// Response from the Ollama chat API
#[derive(Deserialize)]
struct OllamaChatResponse {
    #[serde(default)]
    created_at: String,
    message: OllamaMessage,
    #[serde(default)]
    done_reason: Option<String>,
    #[serde(default)]
    prompt_eval_count: u64,
    #[serde(default)]
    eval_count: u64,
}

impl OllamaAdapter {
    /// Create a new Ollama adapter
    ///
    /// # Parameters
    ///
    /// - `endpoint`: Ollama API endpoint (e.g., "http://localhost:11434")
    /// - `model`: Model to use (e.g., "llama3", "mistral")
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
        }
    }

    /// Create an adapter for the default local endpoint
    pub fn default_endpoint(model: impl Into<String>) -> Self {
        Self::new(DEFAULT_ENDPOINT, model)
    }
}

impl ProviderAdapter for OllamaAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Ollama
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self, request: &CompletionRequest) -> HttpRequest {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        if let Some(system) = &request.system {
            messages.push(OllamaMessage {
                role: "system".to_string(),
                content: system.clone(),
            });
        }
        for message in &request.messages {
            messages.push(OllamaMessage {
                role: match message.role {
                    Role::User => "user".to_string(),
                    Role::Assistant => "assistant".to_string(),
                },
                content: message.content.clone(),
            });
        }

        let body = OllamaChatRequest {
            model: &request.model,
            messages,
            stream: false,
            options: OllamaOptions {
                num_predict: request.max_tokens,
            },
        };

        HttpRequest {
            url: format!("{}/api/chat", self.endpoint),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: serde_json::to_value(&body).unwrap_or_default(),
        }
    }

    fn parse_response(&self, body: &str) -> Result<CompletionResponse, AiError> {
        if body.trim().is_empty() {
            return Err(AiError::invalid_response("Empty response body", body));
        }
        let response: OllamaChatResponse = serde_json::from_str(body).map_err(|e| {
            AiError::invalid_response(format!("Failed to parse response: {}", e), body)
        })?;
        if response.message.content.trim().is_empty() {
            return Err(AiError::invalid_response("Response contains no text content", body));
        }

        Ok(CompletionResponse {
            id: format!("ollama-{}", response.created_at),
            role: Role::Assistant,
            content: vec![ContentBlock {
                kind: "text".to_string(),
                text: response.message.content,
            }],
            stop_reason: response.done_reason,
            usage: Usage {
                input_tokens: response.prompt_eval_count,
                output_tokens: response.eval_count,
            },
        })
    }

    fn pricing(&self) -> Pricing {
        Pricing::FREE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ollama_adapter_creation() {
        let adapter = OllamaAdapter::new("http://localhost:11434/", "llama2");
        assert_eq!(adapter.endpoint, "http://localhost:11434");
        assert_eq!(adapter.model, "llama2");
    }

    #[test]
    fn test_build_request_puts_system_first() {
        let adapter = OllamaAdapter::default_endpoint("mistral");
        let request = CompletionRequest::new("mistral", 256, "rules", "payload");
        let http = adapter.build_request(&request);

        assert_eq!(http.url, "http://localhost:11434/api/chat");
        assert_eq!(http.body["stream"], false);
        assert_eq!(http.body["options"]["num_predict"], 256);
        assert_eq!(http.body["messages"][0]["role"], "system");
        assert_eq!(http.body["messages"][1]["content"], "payload");
    }

    #[test]
    fn test_parse_response() {
        let adapter = OllamaAdapter::default_endpoint("mistral");
        let body = r#"{
            "model": "mistral",
            "created_at": "2024-01-01T00:00:00Z",
            "message": {"role": "assistant", "content": "{\"score\": 7}"},
            "done": true,
            "done_reason": "stop",
            "prompt_eval_count": 12,
            "eval_count": 5
        }"#;

        let response = adapter.parse_response(body).unwrap();
        assert_eq!(response.text(), "{\"score\": 7}");
        assert_eq!(response.usage.output_tokens, 5);
        assert_eq!(response.stop_reason.as_deref(), Some("stop"));
    }

    #[test]
    fn test_parse_empty_message() {
        let adapter = OllamaAdapter::default_endpoint("mistral");
        let body = r#"{"message": {"role": "assistant", "content": ""}, "done": true}"#;
        assert!(matches!(
            adapter.parse_response(body),
            Err(AiError::InvalidResponse { .. })
        ));
    }
}
