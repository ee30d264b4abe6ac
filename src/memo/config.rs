use crate::error::{MemoError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_API_URL: &str = "https://api.github.com";
const DEFAULT_BRANCH: &str = "master";

/// Client configuration, stored in `<data dir>/config.json`.
///
/// User settings (token, repository, manifest) live in the synced store, see
/// [`crate::options`]. This file only holds how to reach the remote.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MemoConfig {
    /// Base URL of the GitHub REST API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Branch that commits are appended to
    #[serde(default = "default_branch")]
    pub branch: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_branch() -> String {
    DEFAULT_BRANCH.to_string()
}

fn default_user_agent() -> String {
    format!("osmos-memo/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for MemoConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            branch: default_branch(),
            user_agent: default_user_agent(),
        }
    }
}

impl MemoConfig {
    pub const KEYS: [&'static str; 3] = ["api-url", "branch", "user-agent"];

    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(MemoError::Io)?;
        let config: MemoConfig =
            serde_json::from_str(&content).map_err(MemoError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(MemoError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(MemoError::Serialization)?;
        fs::write(config_path, content).map_err(MemoError::Io)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "api-url" => Some(self.api_url.clone()),
            "branch" => Some(self.branch.clone()),
            "user-agent" => Some(self.user_agent.clone()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        match key {
            "api-url" => self.api_url = value.trim_end_matches('/').to_string(),
            "branch" => {
                if value.is_empty() {
                    return Err("branch cannot be empty".to_string());
                }
                self.branch = value.to_string();
            }
            "user-agent" => self.user_agent = value.to_string(),
            _ => return Err(format!("Unknown config key: {}", key)),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = MemoConfig::default();
        assert_eq!(config.api_url, "https://api.github.com");
        assert_eq!(config.branch, "master");
        assert!(config.user_agent.starts_with("osmos-memo/"));
    }

    #[test]
    fn test_load_missing_config() {
        let dir = TempDir::new().unwrap();
        let config = MemoConfig::load(dir.path().join("nope")).unwrap();
        assert_eq!(config, MemoConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let mut config = MemoConfig::default();
        config.set("branch", "main").unwrap();
        config.set("api-url", "http://localhost:8080/").unwrap();
        config.save(dir.path()).unwrap();

        let loaded = MemoConfig::load(dir.path()).unwrap();
        assert_eq!(loaded.branch, "main");
        assert_eq!(loaded.api_url, "http://localhost:8080");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("config.json"), r#"{"branch": "notes"}"#).unwrap();
        let loaded = MemoConfig::load(dir.path()).unwrap();
        assert_eq!(loaded.branch, "notes");
        assert_eq!(loaded.api_url, "https://api.github.com");
    }

    #[test]
    fn test_set_rejects_unknown_and_empty() {
        let mut config = MemoConfig::default();
        assert!(config.set("colour", "red").is_err());
        assert!(config.set("branch", "").is_err());
        assert_eq!(config.get("branch").unwrap(), "master");
    }
}
