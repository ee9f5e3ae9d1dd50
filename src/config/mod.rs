//! Configuration management for intervu

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub model: ModelConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub base_url: String,
    pub model: String,
    /// Retries after the initial attempt of each generation call
    pub max_retries: u32,
    /// Base delay for linear backoff; the n-th retry waits n times this
    pub retry_delay_ms: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "llama3.2".to_string(),
            max_retries: 3,
            retry_delay_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Questions asked per practice session in the CLI
    pub questions_per_session: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            questions_per_session: 5,
        }
    }
}

impl Config {
    /// Load from the user config file, falling back to defaults when it
    /// does not exist.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn config_path() -> Result<PathBuf> {
        let dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join("intervu");
        Ok(dir.join("config.toml"))
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.model.base_url, "http://localhost:11434");
        assert_eq!(config.model.max_retries, 3);
        assert_eq!(config.model.retry_delay_ms, 1000);
        assert_eq!(config.session.questions_per_session, 5);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str("[model]\nmodel = \"qwen2.5:3b\"\n").unwrap();
        assert_eq!(config.model.model, "qwen2.5:3b");
        assert_eq!(config.model.max_retries, 3);
        assert_eq!(config.session.questions_per_session, 5);
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut config = Config::default();
        config.model.max_retries = 7;
        config.session.questions_per_session = 2;

        let serialized = toml::to_string_pretty(&config).unwrap();
        let back: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(back.model.max_retries, 7);
        assert_eq!(back.session.questions_per_session, 2);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[model]\nretry_delay_ms = 250\n").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let config: Config = toml::from_str(&content).unwrap();
        assert_eq!(config.model.retry_delay_ms, 250);
    }
}
