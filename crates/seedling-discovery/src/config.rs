//! Configuration for center discovery

use serde::{Deserialize, Serialize};

/// Size limits and context options for [`crate::CenterDiscoveryCoordinator`]
///
/// # Examples
///
/// ```
/// use seedling_discovery::DiscoveryConfig;
///
/// let config = DiscoveryConfig::default();
/// assert_eq!(config.min_seeds, 2);
/// assert_eq!((config.moc_min_notes, config.moc_max_notes), (5, 50));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Minimum notes for ad-hoc seed discovery
    /// Default: 2
    pub min_seeds: usize,

    /// Minimum readable notes behind a map of content
    /// Default: 5
    pub moc_min_notes: usize,

    /// Maximum readable notes behind a map of content
    /// Default: 50
    pub moc_max_notes: usize,

    /// Log a warning above this many map-of-content notes
    /// Default: 30
    pub moc_warn_notes: usize,

    /// Send anonymized relationship hints and clusters with the seeds
    /// Default: true
    #[serde(default = "default_true")]
    pub include_relationship_hints: bool,

    /// Minimum edge strength for clusters sent as hints
    /// Default: 0.5
    pub cluster_threshold: f64,
}

fn default_true() -> bool {
    true
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            min_seeds: 2,
            moc_min_notes: 5,
            moc_max_notes: 50,
            moc_warn_notes: 30,
            include_relationship_hints: true,
            cluster_threshold: 0.5,
        }
    }
}

impl DiscoveryConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.min_seeds < 2 {
            return Err("min_seeds must be at least 2".to_string());
        }
        if self.moc_min_notes == 0 {
            return Err("moc_min_notes must be greater than 0".to_string());
        }
        if self.moc_min_notes > self.moc_max_notes {
            return Err("moc_min_notes cannot exceed moc_max_notes".to_string());
        }
        if self.moc_warn_notes > self.moc_max_notes {
            return Err("moc_warn_notes cannot exceed moc_max_notes".to_string());
        }
        if !(0.0..=1.0).contains(&self.cluster_threshold) {
            return Err("cluster_threshold must be between 0.0 and 1.0".to_string());
        }
        Ok(())
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
        assert!(DiscoveryConfig::default().validate().is_ok());
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let config = DiscoveryConfig {
            moc_min_notes: 60,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = DiscoveryConfig {
            cluster_threshold: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = DiscoveryConfig {
            include_relationship_hints: false,
            ..Default::default()
        };
        let parsed = DiscoveryConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }
}
