//! Configuration for the orchestrator
//!
//! Controls the response cache TTL and the sliding-window rate limit.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for [`crate::AiOrchestrator`]
///
/// # Examples
///
/// ```
/// use seedling_orchestrator::OrchestratorConfig;
///
/// let config = OrchestratorConfig::default();
/// assert_eq!(config.cache_ttl_hours, 24);
/// assert_eq!(config.rate_limit_per_minute, 60);
///
/// let config = OrchestratorConfig::aggressive();
/// assert_eq!(config.rate_limit_per_minute, 20);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Cache successful replies
    /// Default: true
    #[serde(default = "default_true")]
    pub cache_enabled: bool,

    /// How long a cached reply stays valid (in hours)
    /// Default: 24
    pub cache_ttl_hours: u64,

    /// Maximum provider-bound calls per window
    /// Default: 60
    pub rate_limit_per_minute: u32,

    /// Length of the sliding window (in seconds)
    /// Default: 60
    #[serde(default = "default_window_secs")]
    pub rate_limit_window_secs: u64,
}

fn default_true() -> bool {
    true
}

fn default_window_secs() -> u64 {
    60
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            cache_enabled: true,
            cache_ttl_hours: 24,
            rate_limit_per_minute: 60,
            rate_limit_window_secs: default_window_secs(),
        }
    }
}

impl OrchestratorConfig {
    /// Cache TTL as a Duration
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_hours.saturating_mul(3600))
    }

    /// Rate-limit window as a Duration
    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit_window_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.cache_enabled && self.cache_ttl_hours == 0 {
            return Err("cache_ttl_hours must be greater than 0 when caching is enabled".to_string());
        }
        if self.rate_limit_per_minute == 0 {
            return Err("rate_limit_per_minute must be greater than 0".to_string());
        }
        if self.rate_limit_window_secs == 0 {
            return Err("rate_limit_window_secs must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Aggressive preset: short cache, tight limit (shared or metered keys)
    pub fn aggressive() -> Self {
        Self {
            cache_enabled: true,
            cache_ttl_hours: 6,
            rate_limit_per_minute: 20,
            rate_limit_window_secs: 60,
        }
    }

    /// Lenient preset: long cache, generous limit (local models)
    pub fn lenient() -> Self {
        Self {
            cache_enabled: true,
            cache_ttl_hours: 72,
            rate_limit_per_minute: 120,
            rate_limit_window_secs: 60,
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
