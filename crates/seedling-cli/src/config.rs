//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use seedling_discovery::DiscoveryConfig;
use seedling_llm::ProviderConfig;
use seedling_orchestrator::OrchestratorConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// CLI configuration.
///
/// The API key is never stored here; it is read from the environment
/// variable named by `provider.api_key_env`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedlingConfig {
    /// Provider selection and retry behavior
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Cache and rate-limit settings
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,

    /// Discovery size limits and hints
    #[serde(default)]
    pub discovery: DiscoveryConfig,

    /// Output settings
    #[serde(default)]
    pub settings: Settings,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Colored text and tables
    Table,
    /// JSON format
    Json,
    /// Quiet (names only)
    Quiet,
}

impl SeedlingConfig {
    /// Default configuration file path (`~/.seedling/config.toml`).
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".seedling").join("config.toml"))
    }

    /// Load from `path`, or defaults when the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        let config: SeedlingConfig = toml::from_str(&contents)?;
        config.validate()?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load from the default path.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path()?)
    }

    /// Save to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        self.provider
            .validate()
            .map_err(|e| CliError::Config(format!("[provider] {}", e)))?;
        self.orchestrator
            .validate()
            .map_err(|e| CliError::Config(format!("[orchestrator] {}", e)))?;
        self.discovery
            .validate()
            .map_err(|e| CliError::Config(format!("[discovery] {}", e)))?;
        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

#[cfg(test)]
mod tests {
    use super::*;
    use seedling_llm::ProviderKind;

    #[test]
    fn test_default_config() {
        let config = SeedlingConfig::default();
        assert!(config.settings.color);
        assert_eq!(config.settings.format, OutputFormat::Table);
        assert_eq!(config.orchestrator.cache_ttl_hours, 24);
        assert_eq!(config.discovery.moc_max_notes, 50);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = SeedlingConfig::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.provider.kind, ProviderKind::Anthropic);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = SeedlingConfig::default();
        config.provider.kind = ProviderKind::Ollama;
        config.provider.model = "llama3.1".to_string();
        config.orchestrator.rate_limit_per_minute = 10;
        config.settings.format = OutputFormat::Json;
        config.save_to(&path).unwrap();

        let loaded = SeedlingConfig::load_from(&path).unwrap();
        assert_eq!(loaded.provider.kind, ProviderKind::Ollama);
        assert_eq!(loaded.provider.model, "llama3.1");
        assert_eq!(loaded.orchestrator.rate_limit_per_minute, 10);
        assert_eq!(loaded.settings.format, OutputFormat::Json);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[settings]\ncolor = false\n").unwrap();

        let config = SeedlingConfig::load_from(&path).unwrap();
        assert!(!config.settings.color);
        assert_eq!(config.discovery.min_seeds, 2);
    }

    #[test]
    fn test_invalid_section_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = SeedlingConfig::default();
        config.orchestrator.rate_limit_per_minute = 0;
        config.save_to(&path).unwrap();

        let err = SeedlingConfig::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("[orchestrator]"));
    }
}
