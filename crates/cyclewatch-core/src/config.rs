//! TOML-based application configuration.
//!
//! Stores the event-store hosts and default query parameters.
//! Configuration is stored at `~/.config/cyclewatch/config.toml`; the
//! `CYCLEWATCH_CONFIG` environment variable overrides the path. A missing
//! file yields the defaults, a malformed file is an error.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;

/// Event-store connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub hosts: Vec<String>,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            hosts: Vec::new(),
            page_size: default_page_size(),
        }
    }
}

/// Default query parameters, applied when CLI flags are omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_engine")]
    pub engine: String,
    #[serde(default = "default_stream")]
    pub stream: String,
    #[serde(default = "default_production_type")]
    pub production_type: String,
    #[serde(default = "default_production_name")]
    pub production_name: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            engine: default_engine(),
            stream: default_stream(),
            production_type: default_production_type(),
            production_name: default_production_name(),
        }
    }
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/cyclewatch/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

impl Config {
    /// Resolved configuration file path.
    pub fn path() -> Result<PathBuf, ConfigError> {
        if let Ok(path) = std::env::var("CYCLEWATCH_CONFIG") {
            return Ok(PathBuf::from(path));
        }
        dirs::config_dir()
            .map(|dir| dir.join("cyclewatch").join("config.toml"))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Load from the resolved path; defaults when the file does not exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    pub fn load_from(path: &PathBuf) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        toml::from_str(&contents).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }
}

fn default_page_size() -> usize {
    20
}

fn default_engine() -> String {
    "native".to_string()
}

fn default_stream() -> String {
    "oper".to_string()
}

fn default_production_type() -> String {
    "grib2".to_string()
}

fn default_production_name() -> String {
    "orig".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.store.hosts.is_empty());
        assert_eq!(config.store.page_size, 20);
        assert_eq!(config.defaults.engine, "native");
        assert_eq!(config.defaults.stream, "oper");
    }

    #[test]
    fn test_load_from_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            "[store]\nhosts = [\"http://es01:9200\"]\n\n[defaults]\nengine = \"monitor\"\n"
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.store.hosts, vec!["http://es01:9200".to_string()]);
        // Omitted fields fall back to serde defaults.
        assert_eq!(config.store.page_size, 20);
        assert_eq!(config.defaults.engine, "monitor");
        assert_eq!(config.defaults.production_name, "orig");
    }

    #[test]
    fn test_load_from_malformed_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "store = 12").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::ParseFailed(_))
        ));
    }

    #[test]
    fn test_load_from_missing_file_fails() {
        let path = PathBuf::from("/nonexistent/cyclewatch/config.toml");
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::LoadFailed { .. })
        ));
    }
}
