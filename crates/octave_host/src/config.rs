//! Bridge configuration
//!
//! Loaded from an optional TOML file bundled with the app. Every field has a
//! default, so an empty file (or no file) gives the stock behavior.
//!
//! ```toml
//! multicast_lock_tag = "Octave"
//! multicast_reference_counted = true
//! platform_tier = "immersive"   # override the detected tier
//! log_tag = "Octave"
//! log_level = "debug"
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::chrome::PlatformTier;
use crate::error::{HostError, Result};
use crate::multicast::DEFAULT_LOCK_TAG;

/// Host bridge configuration
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Label the multicast lock is registered under
    pub multicast_lock_tag: String,
    /// Create the multicast lock in reference-counted mode
    pub multicast_reference_counted: bool,
    /// Force a platform tier instead of deriving it from the API level
    pub platform_tier: Option<PlatformTier>,
    /// Tag for platform log output
    pub log_tag: String,
    /// Maximum log level (`error`, `warn`, `info`, `debug`, `trace`)
    pub log_level: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            multicast_lock_tag: DEFAULT_LOCK_TAG.to_string(),
            multicast_reference_counted: true,
            platform_tier: None,
            log_tag: "Octave".to_string(),
            log_level: "debug".to_string(),
        }
    }
}

impl BridgeConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| HostError::Config(e.to_string()))
    }

    /// Load a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| HostError::Config(format!("failed to read {}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Serialize back to TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| HostError::Config(e.to_string()))
    }

    /// Tier to run with: the override if set, otherwise derived from `api_level`
    pub fn resolve_tier(&self, api_level: i32) -> PlatformTier {
        self.platform_tier
            .unwrap_or_else(|| PlatformTier::from_api_level(api_level))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = BridgeConfig::from_toml_str("").unwrap();
        assert_eq!(config, BridgeConfig::default());
        assert_eq!(config.multicast_lock_tag, "Octave");
        assert!(config.multicast_reference_counted);
    }

    #[test]
    fn test_partial_config() {
        let config = BridgeConfig::from_toml_str(
            r#"
            multicast_lock_tag = "LanDiscovery"
            platform_tier = "low_profile"
            "#,
        )
        .unwrap();

        assert_eq!(config.multicast_lock_tag, "LanDiscovery");
        assert_eq!(config.platform_tier, Some(PlatformTier::LowProfile));
        assert_eq!(config.log_tag, "Octave");
    }

    #[test]
    fn test_resolve_tier() {
        let config = BridgeConfig::default();
        assert_eq!(config.resolve_tier(30), PlatformTier::Immersive);
        assert_eq!(config.resolve_tier(12), PlatformTier::StatusBarOnly);

        let forced = BridgeConfig {
            platform_tier: Some(PlatformTier::Unsupported),
            ..Default::default()
        };
        assert_eq!(forced.resolve_tier(30), PlatformTier::Unsupported);
    }

    #[test]
    fn test_invalid_config_is_config_error() {
        let err = BridgeConfig::from_toml_str("platform_tier = \"holographic\"").unwrap_err();
        assert!(matches!(err, HostError::Config(_)));
    }

    #[test]
    fn test_roundtrip_through_toml() {
        let config = BridgeConfig {
            platform_tier: Some(PlatformTier::Immersive),
            log_level: "info".to_string(),
            ..Default::default()
        };
        let text = config.to_toml_string().unwrap();
        assert_eq!(BridgeConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_missing_file() {
        let err = BridgeConfig::load("/nonexistent/octave_host.toml").unwrap_err();
        assert!(matches!(err, HostError::Config(_)));
    }
}
