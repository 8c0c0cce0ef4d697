// Network State - Application Configuration
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Application configuration model.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::error::{Error, Result};
use super::CONFIG_DIR_NAME;

/// Connectivity prober configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectivityConfig {
    /// Ordered endpoints probed for reachability. Empty means the
    /// built-in default list.
    #[serde(default)]
    pub check_urls: Vec<String>,

    /// Probe interval in seconds.
    #[serde(default = "default_check_interval")]
    pub check_interval_secs: u64,
}

impl Default for ConnectivityConfig {
    fn default() -> Self {
        Self {
            check_urls: Vec::new(),
            check_interval_secs: default_check_interval(),
        }
    }
}

fn default_check_interval() -> u64 {
    // Five minutes between periodic reachability checks.
    300
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Connectivity prober settings.
    #[serde(default)]
    pub connectivity: ConnectivityConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            connectivity: ConnectivityConfig::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    /// Default configuration file path under the XDG config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join("config.toml"))
    }

    /// Load configuration from a TOML file.
    pub fn load_from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::ConfigReadFailed(e.to_string()))?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load from the default path, falling back to defaults when the file
    /// is missing.
    pub fn load_or_default() -> Self {
        match Self::default_path() {
            Some(path) if path.exists() => match Self::load_from_file(&path) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    Self::default()
                }
            },
            _ => Self::default(),
        }
    }

    /// Save configuration to a TOML file.
    #[allow(dead_code)]
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert!(config.connectivity.check_urls.is_empty());
        assert_eq!(config.connectivity.check_interval_secs, 300);
    }

    #[test]
    fn test_parse_partial_toml() {
        let config: AppConfig = toml::from_str(
            r#"
            log_level = "debug"

            [connectivity]
            check_urls = ["https://example.com/generate_204"]
            "#,
        )
        .unwrap();

        assert_eq!(config.log_level, "debug");
        assert_eq!(config.connectivity.check_urls.len(), 1);
        // Unset fields take their defaults.
        assert_eq!(config.connectivity.check_interval_secs, 300);
    }
}
