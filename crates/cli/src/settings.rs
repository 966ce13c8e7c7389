//! CLI configuration
//!
//! Layered as: built-in defaults, optional config file, `CONTRACT_MANAGER_*`
//! environment variables, then command-line flags.

use anyhow::{bail, Result};
use config::{Config, Environment, File as ConfigFile};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const ENV_PREFIX: &str = "CONTRACT_MANAGER";
pub const DEFAULT_STATE_PATH: &str = "contract-manager.json";
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_LOG_FORMAT: &str = "pretty";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CliConfig {
    /// Registry snapshot file
    pub state_path: PathBuf,
    pub log_level: String,
    /// `pretty` or `json`
    pub log_format: String,
}

impl CliConfig {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, None)
    }

    /// Load with an explicit environment map instead of the process
    /// environment when `env` is `Some`.
    pub fn load_with_env(path: Option<&Path>, env: Option<HashMap<String, String>>) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("state_path", DEFAULT_STATE_PATH)?
            .set_default("log_level", DEFAULT_LOG_LEVEL)?
            .set_default("log_format", DEFAULT_LOG_FORMAT)?;

        if let Some(path) = path {
            if !path.exists() {
                bail!(
                    "Configuration file {} not found (specified via --config)",
                    path.display()
                );
            }
            builder = builder.add_source(ConfigFile::from(path));
        }

        builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).source(env));

        let config: CliConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn apply_overrides(
        &mut self,
        state_path: Option<PathBuf>,
        log_level: Option<String>,
        log_format: Option<String>,
    ) -> Result<()> {
        if let Some(state_path) = state_path {
            self.state_path = state_path;
        }
        if let Some(log_level) = log_level {
            self.log_level = log_level;
        }
        if let Some(log_format) = log_format {
            self.log_format = log_format;
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<()> {
        if !matches!(self.log_format.as_str(), "pretty" | "json") {
            bail!(
                "Unsupported log format '{}' (expected 'pretty' or 'json')",
                self.log_format
            );
        }
        if self.state_path.as_os_str().is_empty() {
            bail!("state_path must not be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn defaults_apply_without_sources() {
        let config = CliConfig::load_with_env(None, Some(HashMap::new())).unwrap();
        assert_eq!(config.state_path, PathBuf::from(DEFAULT_STATE_PATH));
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
        assert_eq!(config.log_format, DEFAULT_LOG_FORMAT);
    }

    #[test]
    fn file_then_env_then_flags() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("contract-manager.toml");
        fs::write(
            &path,
            "state_path = \"from-file.json\"\nlog_level = \"debug\"\n",
        )
        .unwrap();

        let mut env = HashMap::new();
        env.insert("CONTRACT_MANAGER_LOG_LEVEL".to_string(), "warn".to_string());

        let mut config = CliConfig::load_with_env(Some(&path), Some(env)).unwrap();
        assert_eq!(config.state_path, PathBuf::from("from-file.json"));
        assert_eq!(config.log_level, "warn");

        config
            .apply_overrides(Some(PathBuf::from("flag.json")), None, Some("json".into()))
            .unwrap();
        assert_eq!(config.state_path, PathBuf::from("flag.json"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_format, "json");
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = CliConfig::load_with_env(Some(&dir.path().join("nope.toml")), Some(HashMap::new()))
            .unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn unknown_log_format_rejected() {
        let mut config = CliConfig::load_with_env(None, Some(HashMap::new())).unwrap();
        assert!(config
            .apply_overrides(None, None, Some("xml".into()))
            .is_err());
    }
}
