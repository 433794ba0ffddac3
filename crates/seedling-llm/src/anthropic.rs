//! Anthropic Messages API adapter
//!
//! # Examples
//!
//! ```
//! use seedling_llm::{AnthropicAdapter, CompletionRequest, ProviderAdapter};
//!
//! let adapter = AnthropicAdapter::new("https://api.anthropic.com", "claude-sonnet-4-5", "sk-test");
//! let request = CompletionRequest::new("claude-sonnet-4-5", 1024, "Be brief.", "Hello");
//! let http = adapter.build_request(&request);
//! assert_eq!(http.url, "https://api.anthropic.com/v1/messages");
//! ```

use crate::adapter::{Pricing, ProviderAdapter};
use crate::config::ProviderKind;
use crate::error::AiError;
use crate::transport::HttpRequest;
use crate::types::{CompletionRequest, CompletionResponse};
use serde_json::json;

/// API version header value
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Adapter for the Anthropic Messages API
pub struct AnthropicAdapter {
    endpoint: String,
    model: String,
    api_key: String,
}

impl AnthropicAdapter {
    /// Create an adapter
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.into(),
        }
    }
}

impl ProviderAdapter for AnthropicAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Anthropic
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self, request: &CompletionRequest) -> HttpRequest {
        let mut body = json!({
            "model": request.model,
            "max_tokens": request.max_tokens,
            "messages": request.messages,
        });
        if let Some(system) = &request.system {
            body["system"] = json!(system);
        }

        HttpRequest {
            url: format!("{}/v1/messages", self.endpoint),
            headers: vec![
                ("x-api-key".to_string(), self.api_key.clone()),
                ("anthropic-version".to_string(), ANTHROPIC_VERSION.to_string()),
                ("content-type".to_string(), "application/json".to_string()),
            ],
            body,
        }
    }

    fn parse_response(&self, body: &str) -> Result<CompletionResponse, AiError> {
        if body.trim().is_empty() {
            return Err(AiError::invalid_response("Empty response body", body));
        }
        let response: CompletionResponse = serde_json::from_str(body).map_err(|e| {
            AiError::invalid_response(format!("Failed to parse provider response: {}", e), body)
        })?;
        if response.text().trim().is_empty() {
            return Err(AiError::invalid_response("Response contains no text content", body));
        }
        Ok(response)
    }

    fn pricing(&self) -> Pricing {
        let model = self.model.to_lowercase();
        if model.contains("opus") {
            Pricing {
                input_per_million: 15.0,
                output_per_million: 75.0,
            }
        } else if model.contains("haiku") {
            Pricing {
                input_per_million: 0.8,
                output_per_million: 4.0,
            }
        } else {
            Pricing {
                input_per_million: 3.0,
                output_per_million: 15.0,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Role;

    fn adapter() -> AnthropicAdapter {
        AnthropicAdapter::new("https://api.anthropic.com/", "claude-sonnet-4-5", "sk-test")
    }

    #[test]
    fn test_build_request() {
        let request = CompletionRequest::new("claude-sonnet-4-5", 512, "system text", "user text");
        let http = adapter().build_request(&request);

        assert_eq!(http.url, "https://api.anthropic.com/v1/messages");
        assert!(http.headers.contains(&("x-api-key".to_string(), "sk-test".to_string())));
        assert_eq!(http.body["max_tokens"], 512);
        assert_eq!(http.body["system"], "system text");
        assert_eq!(http.body["messages"][0]["role"], "user");
        assert_eq!(http.body["messages"][0]["content"], "user text");
    }

    #[test]
    fn test_parse_response() {
        let body = r#"{
            "id": "msg_01",
            "type": "message",
            "role": "assistant",
            "content": [{"type": "text", "text": "{\"centers\": []}"}],
            "stop_reason": "end_turn",
            "usage": {"input_tokens": 42, "output_tokens": 7}
        }"#;

        let response = adapter().parse_response(body).unwrap();
        assert_eq!(response.id, "msg_01");
        assert_eq!(response.role, Role::Assistant);
        assert_eq!(response.usage.input_tokens, 42);
        assert_eq!(response.text(), "{\"centers\": []}");
    }

    #[test]
    fn test_parse_empty_body() {
        let result = adapter().parse_response("  ");
        assert!(matches!(result, Err(AiError::InvalidResponse { .. })));
    }

    #[test]
    fn test_parse_malformed_body() {
        let result = adapter().parse_response("<html>bad gateway</html>");
        match result {
            Err(AiError::InvalidResponse { preview, .. }) => assert!(preview.contains("bad gateway")),
            other => panic!("Expected InvalidResponse, got {:?}", other),
        }
    }

    #[test]
    fn test_pricing_by_family() {
        let opus = AnthropicAdapter::new("e", "claude-opus-4", "k");
        assert_eq!(opus.pricing().output_per_million, 75.0);
        let haiku = AnthropicAdapter::new("e", "claude-haiku-4-5", "k");
        assert_eq!(haiku.pricing().input_per_million, 0.8);
        assert_eq!(adapter().pricing().input_per_million, 3.0);
    }
}
