//! Persistent verification configuration
//!
//! Stores where the channel recordings live and how to estimate, in a JSON
//! file (`phasesync.json` in the working directory unless given explicitly).
//! Command-line flags override the stored values.

use anyhow::Context;
use phasesync_core::signal::loader::LoaderConfig;
use phasesync_core::EstimatorConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file name
pub const CONFIG_FILE: &str = "phasesync.json";

/// Recordings are compared as unsigned phase magnitudes unless told otherwise
fn default_estimator() -> EstimatorConfig {
    EstimatorConfig {
        discard_sign: true,
        ..Default::default()
    }
}

/// Persistent application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Channel recordings to compare
    #[serde(default)]
    pub loader: LoaderConfig,
    /// Estimator settings
    #[serde(default = "default_estimator")]
    pub estimator: EstimatorConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            loader: LoaderConfig::default(),
            estimator: default_estimator(),
        }
    }
}

impl AppConfig {
    /// Default config path: `./phasesync.json`
    pub fn path() -> PathBuf {
        PathBuf::from(CONFIG_FILE)
    }

    /// Load config from disk, falling back to defaults on any error
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    tracing::info!(path = %path.display(), "Loaded config from disk");
                    config
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                tracing::info!(path = %path.display(), "No config file found, using defaults");
                Self::default()
            }
        }
    }

    /// Save config to disk, creating parent directories if needed
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        tracing::info!(path = %path.display(), "Config saved to disk");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phasesync_core::estimate::fft::BinSelection;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.estimator.discard_sign);
        assert_eq!(config.estimator.period, None);
        assert_eq!(config.loader.samples, 4096);
        assert_eq!(config.loader.header_rows, 3);
        assert_eq!(config.loader.sample_rate, 65536.0);
    }

    #[test]
    fn test_round_trip() {
        let mut config = AppConfig::default();
        config.loader.file1 = "Master(192.168.200.98).csv".to_string();
        config.loader.column = 2;
        config.estimator.bin_selection = BinSelection::Strict;
        config.estimator.period = Some(1.0 / 1024.0);

        let json = serde_json::to_string(&config).unwrap();
        let loaded: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let json = r#"{"loader": {"column": 3}}"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.loader.column, 3);
        assert_eq!(config.loader.samples, 4096);
        assert!(config.estimator.discard_sign);
    }

    #[test]
    fn test_empty_json_uses_defaults() {
        let config: AppConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);

        let mut config = AppConfig::default();
        config.loader.samples = 2048;
        config.estimator.discard_sign = false;
        config.save(&path).unwrap();

        let loaded = AppConfig::load(&path);
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_invalid_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "not json").unwrap();

        assert_eq!(AppConfig::load(&path), AppConfig::default());
        assert_eq!(
            AppConfig::load(&dir.path().join("absent.json")),
            AppConfig::default()
        );
    }
}
