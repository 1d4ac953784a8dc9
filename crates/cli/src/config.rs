//! Configuration management for the CLI

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Server URL; when set, predict/route/bin go over HTTP
    pub api_url: Option<String>,
    /// Forecast model artifact for local mode
    pub model_path: Option<PathBuf>,
    /// Default output format
    pub default_format: Option<String>,
}

impl Config {
    /// Load configuration from the default location, if present
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific file; a missing file is empty config
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// `~/.config/ecoflow/config.json`
    fn config_path() -> Option<PathBuf> {
        dirs_next::home_dir().map(|home| home.join(".config").join("ecoflow").join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_partial_config() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"api_url": "http://localhost:5000", "default_format": "json"}}"#
        )
        .unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.api_url.as_deref(), Some("http://localhost:5000"));
        assert_eq!(config.default_format.as_deref(), Some("json"));
        assert!(config.model_path.is_none());
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "api_url = 'toml is not json'").unwrap();

        assert!(Config::load_from(file.path()).is_err());
    }
}
