//! Provider configuration

use crate::retry::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Supported backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Anthropic Messages API
    Anthropic,
    /// Local Ollama chat API
    Ollama,
}

impl ProviderKind {
    /// Default endpoint for the backend
    pub fn default_endpoint(&self) -> &'static str {
        match self {
            ProviderKind::Anthropic => "https://api.anthropic.com",
            ProviderKind::Ollama => "http://localhost:11434",
        }
    }
}

/// Configuration for the provider layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Backend to use
    pub kind: ProviderKind,

    /// Model identifier
    pub model: String,

    /// Endpoint override; backend default when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Maximum output tokens per request
    pub max_output_tokens: u32,

    /// Time budget for a single HTTP attempt (seconds)
    pub timeout_secs: u64,

    /// Attempts per call, including the first
    pub max_attempts: u32,

    /// First backoff delay (milliseconds), doubled per attempt
    pub base_backoff_ms: u64,
}

fn default_api_key_env() -> String {
    "ANTHROPIC_API_KEY".to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::Anthropic,
            model: "claude-sonnet-4-5".to_string(),
            endpoint: None,
            api_key_env: default_api_key_env(),
            max_output_tokens: 4096,
            timeout_secs: 60,
            max_attempts: 3,
            base_backoff_ms: 1000,
        }
    }
}

impl ProviderConfig {
    /// Endpoint to use
    pub fn endpoint_or_default(&self) -> String {
        self.endpoint
            .clone()
            .unwrap_or_else(|| self.kind.default_endpoint().to_string())
    }

    /// Per-attempt timeout as a Duration
    pub fn attempt_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Retry policy described by this configuration
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, Duration::from_millis(self.base_backoff_ms))
    }

    /// Read the API key from the configured environment variable
    pub fn api_key_from_env(&self) -> Option<String> {
        std::env::var(&self.api_key_env).ok()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("model must not be empty".to_string());
        }
        if self.max_output_tokens == 0 {
            return Err("max_output_tokens must be greater than 0".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }
        if self.max_attempts == 0 {
            return Err("max_attempts must be at least 1".to_string());
        }
        Ok(())
    }

    /// Aggressive preset: fail fast
    pub fn aggressive() -> Self {
        Self {
            timeout_secs: 20,
            max_attempts: 2,
            base_backoff_ms: 500,
            ..Self::default()
        }
    }

    /// Lenient preset: patient with slow or flaky backends
    pub fn lenient() -> Self {
        Self {
            timeout_secs: 180,
            max_attempts: 5,
            base_backoff_ms: 2000,
            ..Self::default()
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ProviderConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.endpoint_or_default(), "https://api.anthropic.com");
    }

    #[test]
    fn test_presets_are_valid() {
        assert!(ProviderConfig::aggressive().validate().is_ok());
        assert!(ProviderConfig::lenient().validate().is_ok());
    }

    #[test]
    fn test_invalid_attempts() {
        let mut config = ProviderConfig::default();
        config.max_attempts = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = ProviderConfig::default();
        config.kind = ProviderKind::Ollama;
        config.endpoint = Some("http://gpu-box:11434".into());

        let parsed = ProviderConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed.kind, ProviderKind::Ollama);
        assert_eq!(parsed.endpoint.as_deref(), Some("http://gpu-box:11434"));
        assert_eq!(parsed.api_key_env, "ANTHROPIC_API_KEY");
    }

    #[test]
    fn test_toml_defaults_api_key_env() {
        let parsed = ProviderConfig::from_toml(
            r#"
            kind = "anthropic"
            model = "claude-haiku-4-5"
            max_output_tokens = 2048
            timeout_secs = 30
            max_attempts = 3
            base_backoff_ms = 1000
            "#,
        )
        .unwrap();
        assert_eq!(parsed.api_key_env, "ANTHROPIC_API_KEY");
        assert_eq!(parsed.attempt_timeout(), Duration::from_secs(30));
    }
}
